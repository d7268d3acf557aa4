//! Pick resolution from renderer selections back to event records.

use foundation::TIME_RATIO;

use crate::buffers::EventBuffers;
use crate::event_index::{EventIndex, RefreshHandle};
use crate::visibility::EventLayer;

/// What the renderer reports for a pick: which prop, and the vertex offset
/// within that prop's buffers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PickRef {
    pub layer: EventLayer,
    pub composite_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickedEvent {
    pub local_id: u32,
    pub magnitude: f64,
    /// Nanoseconds since epoch, recovered from the render-time scalar.
    pub time_epoch: f64,
    pub uncertainty: f64,
    pub event_resource_id: String,
    pub world_position: [f32; 3],
}

/// Resolves a selection against one layer's buffers.
///
/// Returns `None` when the composite id is out of range or the refresh
/// handle has gone stale (a pick raced a refresh); stale picks are expected
/// and not an error.
pub fn resolve_pick(
    buffers: &EventBuffers,
    index: &EventIndex,
    handle: RefreshHandle,
    composite_id: u32,
) -> Option<PickedEvent> {
    let i = composite_id as usize;
    if i >= buffers.len() {
        return None;
    }
    let local_id = buffers.local_ids[i];
    let event_resource_id = index.resolve(handle, local_id).ok()?.to_string();
    Some(PickedEvent {
        local_id,
        magnitude: buffers.magnitudes[i] as f64,
        time_epoch: buffers.times[i] * TIME_RATIO,
        uncertainty: buffers.uncertainties[i] as f64,
        event_resource_id,
        world_position: buffers.positions[i],
    })
}

#[cfg(test)]
mod tests {
    use super::resolve_pick;
    use crate::buffers::EventBuffers;
    use crate::event_index::EventIndex;
    use catalog::records::Event;

    fn event(id: &str, magnitude: f64) -> Event {
        Event {
            event_resource_id: id.to_string(),
            x: 1.0,
            y: 2.0,
            z: 3.0,
            magnitude,
            time_epoch: 20_000_000_000,
            uncertainty: Some(4.0),
            uncertainty_vector_x: None,
            uncertainty_vector_y: None,
            uncertainty_vector_z: None,
            event_type: "earthquake".to_string(),
            preferred_origin_id: String::new(),
        }
    }

    #[test]
    fn resolves_records_through_the_index() {
        let events = vec![event("a", 1.0), event("b", 2.0)];
        let refs: Vec<&Event> = events.iter().collect();
        let mut index = EventIndex::new();
        let h = index.begin_refresh();
        let buffers = EventBuffers::build(&refs, [0.0; 3], &mut index, h).unwrap();

        let picked = resolve_pick(&buffers, &index, h, 1).expect("pick");
        assert_eq!(picked.event_resource_id, "b");
        assert_eq!(picked.magnitude, 2.0);
        assert_eq!(picked.time_epoch, 20_000_000_000.0);
        assert_eq!(picked.uncertainty, 4.0);

        assert!(resolve_pick(&buffers, &index, h, 2).is_none());
    }

    #[test]
    fn pick_racing_a_refresh_resolves_to_none() {
        let events = vec![event("a", 1.0)];
        let refs: Vec<&Event> = events.iter().collect();
        let mut index = EventIndex::new();
        let h = index.begin_refresh();
        let buffers = EventBuffers::build(&refs, [0.0; 3], &mut index, h).unwrap();

        index.begin_refresh();
        assert!(resolve_pick(&buffers, &index, h, 0).is_none());
    }
}
