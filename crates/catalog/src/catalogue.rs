//! Year/month/day catalogue tree for the event browser.

use foundation::{Clock, MineClock};

use crate::records::Event;

/// Display tag for a catalogue leaf. Known quakeML types map onto the two
/// scene layers; anything else passes through untouched.
fn layer_tag(event_type: &str) -> String {
    match event_type {
        "earthquake" => "seismicEvents".to_string(),
        "explosion" => "blasts".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogueNode {
    /// Path key: `"2019"`, `"2019/03"`, `"2019/03/04"`, or the event
    /// resource id at the leaves.
    pub id: String,
    /// Display name: year/month/day component, or `HH:MM:SS` mine time.
    pub name: String,
    pub children: Vec<CatalogueNode>,
    /// Leaf only.
    pub tag: Option<String>,
    /// Leaf only; absent when the event has no computed magnitude.
    pub magnitude: Option<f64>,
}

impl CatalogueNode {
    fn branch(id: String, name: String) -> Self {
        CatalogueNode {
            id,
            name,
            children: Vec::new(),
            tag: None,
            magnitude: None,
        }
    }
}

fn sort_desc(nodes: &mut Vec<CatalogueNode>) {
    nodes.sort_by(|a, b| b.name.cmp(&a.name));
    for n in nodes.iter_mut() {
        sort_desc(&mut n.children);
    }
}

fn child_index(parent: &mut Vec<CatalogueNode>, id: &str, name: &str) -> usize {
    if let Some(i) = parent.iter().position(|n| n.id == id) {
        return i;
    }
    parent.push(CatalogueNode::branch(id.to_string(), name.to_string()));
    parent.len() - 1
}

/// Builds the catalogue tree, newest first at every level.
pub fn build_catalogue<C: Clock>(events: &[Event], clock: &MineClock<C>) -> Vec<CatalogueNode> {
    let mut roots: Vec<CatalogueNode> = Vec::new();

    for event in events {
        let date = clock.format_epoch_date(event.time_epoch);
        let time = clock.format_epoch_time(event.time_epoch);
        let mut parts = date.split('/');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        let yi = child_index(&mut roots, year, year);
        let mi = child_index(
            &mut roots[yi].children,
            &format!("{year}/{month}"),
            month,
        );
        let di = child_index(
            &mut roots[yi].children[mi].children,
            &format!("{year}/{month}/{day}"),
            day,
        );

        roots[yi].children[mi].children[di]
            .children
            .push(CatalogueNode {
                id: event.event_resource_id.clone(),
                name: time,
                children: Vec::new(),
                tag: Some(layer_tag(&event.event_type)),
                magnitude: event.has_magnitude().then_some(event.magnitude),
            });
    }

    sort_desc(&mut roots);
    roots
}

/// Resource id of the most recent event in the tree, if any.
pub fn most_recent_event_id(catalogue: &[CatalogueNode]) -> Option<&str> {
    let day = catalogue.first()?.children.first()?.children.first()?;
    day.children.first().map(|n| n.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::{FixedClock, UtcOffset};
    use pretty_assertions::assert_eq;

    fn event(id: &str, epoch_ns: i64, kind: &str, magnitude: f64) -> Event {
        Event {
            event_resource_id: id.to_string(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            magnitude,
            time_epoch: epoch_ns,
            uncertainty: None,
            uncertainty_vector_x: None,
            uncertainty_vector_y: None,
            uncertainty_vector_z: None,
            event_type: kind.to_string(),
            preferred_origin_id: String::new(),
        }
    }

    #[test]
    fn groups_by_mine_local_date_newest_first() {
        let clock = MineClock::new(FixedClock(0), UtcOffset::UTC);
        // 2019-03-04T05:06:07Z and 2019-03-05T01:00:00Z.
        let events = vec![
            event("a", 1_551_675_967_000_000_000, "earthquake", 1.2),
            event("b", 1_551_747_600_000_000_000, "explosion", -999.0),
        ];
        let tree = build_catalogue(&events, &clock);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "2019");
        let month = &tree[0].children[0];
        assert_eq!(month.id, "2019/03");
        let days: Vec<&str> = month.children.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(days, vec!["05", "04"]);

        let leaf = &month.children[1].children[0];
        assert_eq!(leaf.id, "a");
        assert_eq!(leaf.name, "05:06:07");
        assert_eq!(leaf.tag.as_deref(), Some("seismicEvents"));
        assert_eq!(leaf.magnitude, Some(1.2));

        let blast = &month.children[0].children[0];
        assert_eq!(blast.tag.as_deref(), Some("blasts"));
        assert_eq!(blast.magnitude, None);

        assert_eq!(most_recent_event_id(&tree), Some("b"));
    }
}
