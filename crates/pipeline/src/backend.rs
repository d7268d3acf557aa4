//! Render backend seam.
//!
//! The view layer drives one [`RenderBackend`] and never cares whether the
//! scene is computed in-process ([`LocalBackend`]) or by a remote render
//! service. Both implementations expose the same operations with the same
//! argument shapes.

use catalog::source::{CatalogSource, EventQuery};
use foundation::parse_iso_utc_ms;
use scene::picking::{PickRef, PickedEvent};
use scene::render::RenderSink;
use scene::visibility::{LayerVisibility, RayFilterMode};

use crate::sync::{PipelineError, SceneSyncPipeline};

/// One event refresh request: three UTC ISO instants bracketing the focus
/// window `[focus_time, now]` and the historical window
/// `[historical_time, focus_time]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWindow {
    pub now: String,
    pub focus_time: String,
    pub historical_time: String,
    /// Workflow status filter, e.g. `accepted`.
    pub status: String,
    pub monitor_live: bool,
}

impl EventWindow {
    pub fn focus_query(&self) -> EventQuery {
        EventQuery {
            start_time: self.focus_time.clone(),
            end_time: self.now.clone(),
            status: self.status.clone(),
        }
    }

    pub fn historical_query(&self) -> EventQuery {
        EventQuery {
            start_time: self.historical_time.clone(),
            end_time: self.focus_time.clone(),
            status: self.status.clone(),
        }
    }

    /// Color range in the scaled-time unit the event buffers carry
    /// (epoch nanoseconds / 1e10 == epoch milliseconds / 1e4).
    pub fn color_range(&self) -> [f64; 2] {
        let lo = parse_iso_utc_ms(&self.focus_time).unwrap_or(0) as f64 / 1.0e4;
        let hi = parse_iso_utc_ms(&self.now).unwrap_or(0) as f64 / 1.0e4;
        [lo, hi]
    }
}

#[allow(async_fn_in_trait)]
pub trait RenderBackend {
    type Error: std::error::Error;

    async fn update_events(&mut self, window: &EventWindow) -> Result<(), Self::Error>;
    async fn update_mine(&mut self) -> Result<(), Self::Error>;
    async fn update_stations(&mut self) -> Result<(), Self::Error>;

    async fn update_scaling(
        &mut self,
        magnitude_range: [f64; 2],
        scaling_range: [f64; 2],
    ) -> Result<(), Self::Error>;
    async fn update_uncertainty_scaling(&mut self, factor: f64) -> Result<(), Self::Error>;
    async fn update_color_preset(&mut self, name: &str) -> Result<(), Self::Error>;

    async fn update_visibility(&mut self, visibility: LayerVisibility)
        -> Result<(), Self::Error>;
    async fn update_mine_visibility(
        &mut self,
        visible_ids: Vec<String>,
    ) -> Result<(), Self::Error>;

    /// Returns whether the event has any rays.
    async fn show_ray(&mut self, event_resource_id: &str) -> Result<bool, Self::Error>;
    async fn update_ray_filter(&mut self, mode: RayFilterMode) -> Result<(), Self::Error>;

    /// Returns whether the event's scatter cloud has any in-bounds points.
    async fn show_scatter(&mut self, event_resource_id: &str) -> Result<bool, Self::Error>;
    async fn hide_scatter(&mut self) -> Result<(), Self::Error>;

    async fn pick(&mut self, pick: Option<PickRef>)
        -> Result<Option<PickedEvent>, Self::Error>;
    async fn activate_event(&mut self, resource_id: &str) -> Result<(), Self::Error>;

    async fn reset_camera(&mut self) -> Result<(), Self::Error>;
    async fn set_center_of_rotation(&mut self, position: [f64; 3]) -> Result<(), Self::Error>;
    /// Captures a snapshot of the current view.
    async fn snap(&mut self) -> Result<(), Self::Error>;
    async fn render(&mut self) -> Result<(), Self::Error>;
}

/// In-process backend: a pipeline, a catalog source, and a render sink.
#[derive(Debug)]
pub struct LocalBackend<S, K> {
    pub pipeline: SceneSyncPipeline,
    source: S,
    sink: K,
}

impl<S: CatalogSource, K: RenderSink> LocalBackend<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        LocalBackend {
            pipeline: SceneSyncPipeline::new(),
            source,
            sink,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Loads one queued mine piece; returns whether more remain.
    pub fn load_next_piece(&mut self) -> Result<bool, PipelineError> {
        self.pipeline.load_next_piece(&mut self.sink)
    }
}

impl<S: CatalogSource, K: RenderSink> RenderBackend for LocalBackend<S, K> {
    type Error = PipelineError;

    async fn update_events(&mut self, window: &EventWindow) -> Result<(), PipelineError> {
        self.pipeline
            .refresh_events(
                &self.source,
                &window.focus_query(),
                &window.historical_query(),
                window.color_range(),
                &mut self.sink,
            )
            .await
    }

    async fn update_mine(&mut self) -> Result<(), PipelineError> {
        let plans = self.source.fetch_mine_plans().await?;
        if let Some(plan) = plans.first() {
            self.pipeline.apply_mine_plan(plan)?;
        }
        Ok(())
    }

    async fn update_stations(&mut self) -> Result<(), PipelineError> {
        self.pipeline
            .refresh_stations(&self.source, &mut self.sink)
            .await
            .map(|_| ())
    }

    async fn update_scaling(
        &mut self,
        magnitude_range: [f64; 2],
        scaling_range: [f64; 2],
    ) -> Result<(), PipelineError> {
        self.pipeline
            .update_scaling(magnitude_range, scaling_range, &mut self.sink)
    }

    async fn update_uncertainty_scaling(&mut self, factor: f64) -> Result<(), PipelineError> {
        self.pipeline
            .update_uncertainty_scaling(factor, &mut self.sink);
        Ok(())
    }

    async fn update_color_preset(&mut self, name: &str) -> Result<(), PipelineError> {
        self.pipeline.update_color_preset(name, &mut self.sink);
        Ok(())
    }

    async fn update_visibility(
        &mut self,
        visibility: LayerVisibility,
    ) -> Result<(), PipelineError> {
        self.pipeline.set_visibility(visibility, &mut self.sink);
        Ok(())
    }

    async fn update_mine_visibility(
        &mut self,
        visible_ids: Vec<String>,
    ) -> Result<(), PipelineError> {
        self.pipeline.set_mine_visibility(visible_ids, &mut self.sink);
        Ok(())
    }

    async fn show_ray(&mut self, event_resource_id: &str) -> Result<bool, PipelineError> {
        self.pipeline
            .show_ray(event_resource_id, &self.source, &mut self.sink)
            .await
    }

    async fn update_ray_filter(&mut self, mode: RayFilterMode) -> Result<(), PipelineError> {
        self.pipeline.update_ray_filter(mode, &mut self.sink);
        Ok(())
    }

    async fn show_scatter(&mut self, event_resource_id: &str) -> Result<bool, PipelineError> {
        self.pipeline
            .show_scatter(event_resource_id, &self.source, &mut self.sink)
            .await
    }

    async fn hide_scatter(&mut self) -> Result<(), PipelineError> {
        self.pipeline.hide_scatter(&mut self.sink);
        Ok(())
    }

    async fn pick(
        &mut self,
        pick: Option<PickRef>,
    ) -> Result<Option<PickedEvent>, PipelineError> {
        Ok(self.pipeline.update_picked(pick).cloned())
    }

    async fn activate_event(&mut self, resource_id: &str) -> Result<(), PipelineError> {
        self.pipeline.activate_event(resource_id, &mut self.sink)
    }

    async fn reset_camera(&mut self) -> Result<(), PipelineError> {
        self.sink.reset_camera();
        self.sink.render();
        Ok(())
    }

    async fn set_center_of_rotation(&mut self, position: [f64; 3]) -> Result<(), PipelineError> {
        self.sink.set_center_of_rotation(position);
        self.sink.render();
        Ok(())
    }

    async fn snap(&mut self) -> Result<(), PipelineError> {
        self.sink.snap();
        Ok(())
    }

    async fn render(&mut self) -> Result<(), PipelineError> {
        self.sink.render();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::EventWindow;
    use pretty_assertions::assert_eq;

    #[test]
    fn window_splits_into_adjacent_queries() {
        let window = EventWindow {
            now: "2019-03-04T05:06:07.000Z".into(),
            focus_time: "2019-03-01T00:00:00.000Z".into(),
            historical_time: "2019-01-01T00:00:00.000Z".into(),
            status: "accepted".into(),
            monitor_live: true,
        };
        let focus = window.focus_query();
        let historical = window.historical_query();
        assert_eq!(focus.start_time, window.focus_time);
        assert_eq!(focus.end_time, window.now);
        assert_eq!(historical.end_time, focus.start_time);
        assert_eq!(historical.start_time, window.historical_time);
    }

    #[test]
    fn color_range_is_scaled_epoch_time() {
        let window = EventWindow {
            now: "1970-01-01T00:00:10.000Z".into(),
            focus_time: "1970-01-01T00:00:00.000Z".into(),
            historical_time: "1969-01-01T00:00:00.000Z".into(),
            status: "accepted".into(),
            monitor_live: false,
        };
        assert_eq!(window.color_range(), [0.0, 1.0]);
    }
}
