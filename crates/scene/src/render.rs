//! Renderer seam.
//!
//! The actual 3D renderer lives outside this workspace; the pipeline only
//! ever talks to this object-safe trait. Tests use [`RecordingSink`].

use catalog::mineplan::MinePiece;

use crate::buffers::{EventBuffers, RayBuffers, RayPiece, ScatterBuffers, StationBuffers};
use crate::visibility::EventLayer;

/// Fixed props the pipeline toggles visibility on. Mine pieces are addressed
/// separately by id.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SceneProp {
    Events(EventLayer),
    Uncertainty(EventLayer),
    Stations,
    Ray(RayPiece),
    Scatter,
    ActiveMarker,
}

pub trait RenderSink {
    fn upload_events(&mut self, layer: EventLayer, buffers: &EventBuffers);
    fn upload_stations(&mut self, buffers: &StationBuffers);
    fn upload_rays(&mut self, buffers: &RayBuffers);
    fn upload_scatter(&mut self, buffers: &ScatterBuffers);
    fn upload_active_marker(&mut self, points: [[f32; 3]; 6]);

    fn set_prop_visibility(&mut self, prop: SceneProp, visible: bool);
    fn set_mine_piece_visibility(&mut self, piece_id: &str, visible: bool);

    fn set_color_range(&mut self, layer: EventLayer, range: [f64; 2]);
    fn set_color_preset(&mut self, name: &str);

    fn load_mine_piece(&mut self, piece: &MinePiece, translate: [f64; 3]);

    fn set_center_of_rotation(&mut self, position: [f64; 3]);

    fn reset_camera(&mut self);
    /// Captures a snapshot of the current view.
    fn snap(&mut self);
    fn render(&mut self);
}

/// Records every call for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub event_uploads: Vec<(EventLayer, usize)>,
    pub station_uploads: Vec<usize>,
    pub ray_uploads: Vec<usize>,
    pub scatter_uploads: Vec<usize>,
    pub marker_uploads: Vec<[[f32; 3]; 6]>,
    pub center_rotations: Vec<[f64; 3]>,
    pub prop_visibility: Vec<(SceneProp, bool)>,
    pub mine_piece_visibility: Vec<(String, bool)>,
    pub color_ranges: Vec<(EventLayer, [f64; 2])>,
    pub color_presets: Vec<String>,
    pub loaded_pieces: Vec<String>,
    pub camera_resets: usize,
    pub snaps: usize,
    pub renders: usize,
}

impl RenderSink for RecordingSink {
    fn upload_events(&mut self, layer: EventLayer, buffers: &EventBuffers) {
        self.event_uploads.push((layer, buffers.len()));
    }

    fn upload_stations(&mut self, buffers: &StationBuffers) {
        self.station_uploads.push(buffers.len());
    }

    fn upload_rays(&mut self, buffers: &RayBuffers) {
        self.ray_uploads.push(buffers.ray_count());
    }

    fn upload_scatter(&mut self, buffers: &ScatterBuffers) {
        self.scatter_uploads.push(buffers.len());
    }

    fn upload_active_marker(&mut self, points: [[f32; 3]; 6]) {
        self.marker_uploads.push(points);
    }

    fn set_prop_visibility(&mut self, prop: SceneProp, visible: bool) {
        self.prop_visibility.push((prop, visible));
    }

    fn set_mine_piece_visibility(&mut self, piece_id: &str, visible: bool) {
        self.mine_piece_visibility
            .push((piece_id.to_string(), visible));
    }

    fn set_color_range(&mut self, layer: EventLayer, range: [f64; 2]) {
        self.color_ranges.push((layer, range));
    }

    fn set_color_preset(&mut self, name: &str) {
        self.color_presets.push(name.to_string());
    }

    fn load_mine_piece(&mut self, piece: &MinePiece, _translate: [f64; 3]) {
        self.loaded_pieces.push(piece.label.clone());
    }

    fn set_center_of_rotation(&mut self, position: [f64; 3]) {
        self.center_rotations.push(position);
    }

    fn reset_camera(&mut self) {
        self.camera_resets += 1;
    }

    fn snap(&mut self) {
        self.snaps += 1;
    }

    fn render(&mut self) {
        self.renders += 1;
    }
}
