//! Wire types for the remote render service.
//!
//! Requests are method-tagged JSON; the service answers each with a JSON
//! value (often just `null`). The live feed is a separate stream of
//! type-tagged messages.

use serde::{Deserialize, Serialize};

/// One RPC to the render service. The `method` tag mirrors the service's
/// routing table; parameters ride in `params`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum RpcRequest {
    #[serde(rename = "camera.reset")]
    CameraReset,
    #[serde(rename = "camera.snap")]
    CameraSnap,
    #[serde(rename = "camera.center_rotation")]
    CenterRotation { position: [f64; 3] },
    #[serde(rename = "render")]
    Render,
    #[serde(rename = "data.update")]
    DataUpdate {
        now: String,
        focus_time: String,
        historical_time: String,
        status: String,
        monitor_live: bool,
    },
    #[serde(rename = "mine.get")]
    MineGet,
    #[serde(rename = "stations.update")]
    StationsUpdate,
    #[serde(rename = "scaling.update")]
    ScalingUpdate {
        magnitude_range: [f64; 2],
        scaling_range: [f64; 2],
    },
    #[serde(rename = "uncertainty.scaling.update")]
    UncertaintyScalingUpdate { factor: f64 },
    #[serde(rename = "color.preset.update")]
    ColorPresetUpdate { name: String },
    #[serde(rename = "visibility.update")]
    VisibilityUpdate {
        mine: bool,
        seismic_events: bool,
        blasts: bool,
        historic_events: bool,
        ray: bool,
        uncertainty: bool,
    },
    #[serde(rename = "mine.visibility.update")]
    MineVisibilityUpdate { visible_ids: Vec<String> },
    #[serde(rename = "event.show_ray")]
    ShowRay { event_resource_id: String },
    #[serde(rename = "event.show_scatter")]
    ShowScatter { event_resource_id: String },
    #[serde(rename = "event.hide_scatter")]
    HideScatter,
    #[serde(rename = "ray.filter.update")]
    RayFilterUpdate { mode: u8 },
    #[serde(rename = "view.pick")]
    Pick {
        layer: Option<String>,
        composite_id: Option<u32>,
    },
    #[serde(rename = "event.activate")]
    ActivateEvent { event_resource_id: String },
}

/// `view.pick` response payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PickResponse {
    pub local_id: u32,
    pub magnitude: f64,
    pub time_epoch: f64,
    pub uncertainty: f64,
    pub event_resource_id: String,
    pub world_position: [f32; 3],
}

/// `event.show_ray` response payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShowRayResponse {
    pub has_rays: bool,
}

/// `event.show_scatter` response payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShowScatterResponse {
    pub has_points: bool,
}

/// One message from the live feed. Messages with a tag this build does not
/// know about decode as `Unknown` instead of failing the stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    Heartbeat,
    SignalQuality { samples: Vec<FeedSignalQuality> },
    EventsChanged,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedSignalQuality {
    pub station_code: String,
    pub integrity: f64,
}
