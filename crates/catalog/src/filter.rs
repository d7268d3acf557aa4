//! Spatial/type filtering of event records.

use foundation::MineBounds;

use crate::records::Event;

/// Wildcard that disables type filtering.
pub const TYPE_ALL: &str = "all";

/// Keeps events inside the mine bounds (inclusive on every face) and, when
/// `type_filter` is not [`TYPE_ALL`], of exactly that event type.
///
/// Key properties:
/// - Input order is preserved.
/// - The input is never mutated; this is a single pass returning references.
pub fn filter_events<'a>(
    bounds: &MineBounds,
    events: &'a [Event],
    type_filter: &str,
) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|e| bounds.contains(e.x, e.y, e.z))
        .filter(|e| type_filter == TYPE_ALL || e.event_type == type_filter)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_events, TYPE_ALL};
    use crate::records::Event;
    use foundation::MineBounds;

    fn event(id: &str, x: f64, y: f64, z: f64, kind: &str) -> Event {
        Event {
            event_resource_id: id.to_string(),
            x,
            y,
            z,
            magnitude: 1.0,
            time_epoch: 0,
            uncertainty: None,
            uncertainty_vector_x: None,
            uncertainty_vector_y: None,
            uncertainty_vector_z: None,
            event_type: kind.to_string(),
            preferred_origin_id: String::new(),
        }
    }

    #[test]
    fn keeps_in_bounds_preserving_order() {
        let bounds = MineBounds::new([-100.0, -100.0, -50.0], [100.0, 100.0, 50.0]).unwrap();
        let events = vec![
            event("a", 50.0, 0.0, 0.0, "earthquake"),
            event("b", 150.0, 0.0, 0.0, "earthquake"),
            event("c", -100.0, 100.0, 50.0, "earthquake"),
        ];
        let kept = filter_events(&bounds, &events, TYPE_ALL);
        let ids: Vec<&str> = kept.iter().map(|e| e.event_resource_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn type_filter_requires_exact_match() {
        let bounds = MineBounds::new([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]).unwrap();
        let events = vec![
            event("q", 0.0, 0.0, 0.0, "earthquake"),
            event("b", 0.0, 0.0, 0.0, "explosion"),
        ];
        let kept = filter_events(&bounds, &events, "explosion");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].event_resource_id, "b");

        let kept = filter_events(&bounds, &events, TYPE_ALL);
        assert_eq!(kept.len(), 2);
    }
}
