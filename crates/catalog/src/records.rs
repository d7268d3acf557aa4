//! Wire records served by the seismic catalog API.
//!
//! Records are plain serde structs; they are replaced wholesale on every
//! refresh and never mutated in place (station signal status is the one
//! exception, and that lives in the render buffers, not here).

use serde::{Deserialize, Serialize};

/// Magnitude value meaning "no magnitude computed for this event".
pub const MAGNITUDE_UNKNOWN: f64 = -999.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_resource_id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default = "magnitude_unknown")]
    pub magnitude: f64,
    /// Nanoseconds since the Unix epoch.
    pub time_epoch: i64,
    #[serde(default)]
    pub uncertainty: Option<f64>,
    #[serde(default)]
    pub uncertainty_vector_x: Option<f64>,
    #[serde(default)]
    pub uncertainty_vector_y: Option<f64>,
    #[serde(default)]
    pub uncertainty_vector_z: Option<f64>,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub preferred_origin_id: String,
}

fn magnitude_unknown() -> f64 {
    MAGNITUDE_UNKNOWN
}

impl Event {
    pub fn has_magnitude(&self) -> bool {
        self.magnitude > MAGNITUDE_UNKNOWN
    }

    /// Uncertainty glyph direction, defaulting to +Z when absent.
    pub fn uncertainty_direction(&self) -> [f64; 3] {
        [
            self.uncertainty_vector_x.unwrap_or(0.0),
            self.uncertainty_vector_y.unwrap_or(0.0),
            self.uncertainty_vector_z.unwrap_or(1.0),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub orientation_x: f64,
    #[serde(default)]
    pub orientation_y: f64,
    #[serde(default)]
    pub orientation_z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub location_x: f64,
    pub location_y: f64,
    pub location_z: f64,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Station {
    /// Sensor orientation: the component with the largest z orientation
    /// among components with a non-empty code, else straight up.
    pub fn orientation(&self) -> [f64; 3] {
        let mut best: Option<&Component> = None;
        for c in &self.components {
            if c.code.is_empty() {
                continue;
            }
            match best {
                Some(b) if b.orientation_z >= c.orientation_z => {}
                _ => best = Some(c),
            }
        }
        match best {
            Some(c) => [c.orientation_x, c.orientation_y, c.orientation_z],
            None => [0.0, 0.0, 1.0],
        }
    }
}

/// One page of the station listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPage {
    #[serde(default)]
    pub results: Vec<Station>,
    /// Absolute URL of the next page, when there is one.
    #[serde(default)]
    pub next: Option<String>,
}

/// Travel-path polyline for one phase of one origin of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub arrival: bool,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub nodes: Vec<[f64; 3]>,
}

/// One sample of an event's location-uncertainty scatter cloud.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Monitoring site descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub networks: Vec<Network>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    pub code: String,
}

/// Station health sample from the live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalQuality {
    pub station_code: String,
    /// In [0, 1]; 0.5 is the neutral starting point.
    pub integrity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn event_decodes_with_missing_optionals() {
        let e: Event = serde_json::from_str(
            r#"{
                "event_resource_id": "smi:local/abc",
                "x": 1.0, "y": 2.0, "z": 3.0,
                "time_epoch": 1551675967000000000
            }"#,
        )
        .expect("decode");
        assert!(!e.has_magnitude());
        assert_eq!(e.uncertainty, None);
        assert_eq!(e.uncertainty_direction(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn orientation_prefers_steepest_named_component() {
        let s = Station {
            code: "ST01".into(),
            name: String::new(),
            location_x: 0.0,
            location_y: 0.0,
            location_z: 0.0,
            components: vec![
                Component {
                    code: String::new(),
                    orientation_x: 0.0,
                    orientation_y: 0.0,
                    orientation_z: 9.0,
                },
                Component {
                    code: "Z".into(),
                    orientation_x: 0.1,
                    orientation_y: 0.2,
                    orientation_z: 0.9,
                },
                Component {
                    code: "N".into(),
                    orientation_x: 1.0,
                    orientation_y: 0.0,
                    orientation_z: 0.0,
                },
            ],
        };
        assert_eq!(s.orientation(), [0.1, 0.2, 0.9]);
    }

    #[test]
    fn orientation_defaults_up_without_components() {
        let s = Station {
            code: "ST02".into(),
            name: String::new(),
            location_x: 0.0,
            location_y: 0.0,
            location_z: 0.0,
            components: vec![],
        };
        assert_eq!(s.orientation(), [0.0, 0.0, 1.0]);
    }
}
