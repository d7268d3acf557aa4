//! Headless render sink.
//!
//! This binary has no 3D view attached; scene updates are logged so the
//! pipeline can run end to end against a live API.

use catalog::mineplan::MinePiece;
use scene::buffers::{EventBuffers, RayBuffers, ScatterBuffers, StationBuffers};
use scene::render::{RenderSink, SceneProp};
use scene::visibility::EventLayer;
use tracing::debug;

#[derive(Debug, Default)]
pub struct HeadlessSink {
    pub renders: u64,
}

impl RenderSink for HeadlessSink {
    fn upload_events(&mut self, layer: EventLayer, buffers: &EventBuffers) {
        debug!(?layer, count = buffers.len(), "events uploaded");
    }

    fn upload_stations(&mut self, buffers: &StationBuffers) {
        debug!(count = buffers.len(), "stations uploaded");
    }

    fn upload_rays(&mut self, buffers: &RayBuffers) {
        debug!(count = buffers.ray_count(), "rays uploaded");
    }

    fn upload_scatter(&mut self, buffers: &ScatterBuffers) {
        debug!(count = buffers.len(), "scatter uploaded");
    }

    fn upload_active_marker(&mut self, points: [[f32; 3]; 6]) {
        debug!(?points, "active marker uploaded");
    }

    fn set_prop_visibility(&mut self, prop: SceneProp, visible: bool) {
        debug!(?prop, visible, "prop visibility");
    }

    fn set_mine_piece_visibility(&mut self, piece_id: &str, visible: bool) {
        debug!(piece_id, visible, "mine piece visibility");
    }

    fn set_color_range(&mut self, layer: EventLayer, range: [f64; 2]) {
        debug!(?layer, ?range, "color range");
    }

    fn set_color_preset(&mut self, name: &str) {
        debug!(name, "color preset");
    }

    fn load_mine_piece(&mut self, piece: &MinePiece, _translate: [f64; 3]) {
        debug!(label = %piece.label, file = %piece.file, "mine piece loaded");
    }

    fn set_center_of_rotation(&mut self, position: [f64; 3]) {
        debug!(?position, "center of rotation");
    }

    fn reset_camera(&mut self) {
        debug!("camera reset");
    }

    fn snap(&mut self) {
        debug!("view snapshot");
    }

    fn render(&mut self) {
        self.renders += 1;
    }
}
