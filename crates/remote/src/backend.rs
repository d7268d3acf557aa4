//! Remote render backend.
//!
//! Same [`RenderBackend`] surface as the in-process pipeline, but every
//! operation becomes an RPC to the render service. Event refreshes and
//! renders are coalesced; the busy counter tracks outstanding calls for the
//! progress indicator.

use pipeline::backend::{EventWindow, RenderBackend};
use scene::picking::{PickRef, PickedEvent};
use scene::visibility::{EventLayer, LayerVisibility, RayFilterMode};
use tracing::warn;

use crate::busy::BusyTracker;
use crate::coalescer::{CoalescedAction, RequestCoalescer};
use crate::protocol::{PickResponse, RpcRequest, ShowRayResponse, ShowScatterResponse};
use crate::session::{RemoteSession, SessionError};

fn layer_name(layer: EventLayer) -> &'static str {
    match layer {
        EventLayer::SeismicEvents => "seismic_events",
        EventLayer::Blasts => "blasts",
        EventLayer::HistoricEvents => "historic_events",
    }
}

fn ray_mode_index(mode: RayFilterMode) -> u8 {
    match mode {
        RayFilterMode::PreferredOriginArrival => 0,
        RayFilterMode::PreferredOrigin => 1,
        RayFilterMode::All => 2,
    }
}

#[derive(Debug)]
pub struct RemoteBackend<S> {
    session: S,
    busy: BusyTracker,
    data_updates: CoalescedAction<EventWindow>,
    renders: RequestCoalescer,
}

impl<S: RemoteSession> RemoteBackend<S> {
    pub fn new(session: S) -> Self {
        RemoteBackend {
            session,
            busy: BusyTracker::new(),
            data_updates: CoalescedAction::new(),
            renders: RequestCoalescer::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    async fn call(&mut self, request: &RpcRequest) -> Result<serde_json::Value, SessionError> {
        self.busy.begin();
        let result = self.session.call(request).await;
        self.busy.end();
        result
    }

    fn data_request(window: &EventWindow) -> RpcRequest {
        RpcRequest::DataUpdate {
            now: window.now.clone(),
            focus_time: window.focus_time.clone(),
            historical_time: window.historical_time.clone(),
            status: window.status.clone(),
            monitor_live: window.monitor_live,
        }
    }
}

impl<S: RemoteSession> RenderBackend for RemoteBackend<S> {
    type Error = SessionError;

    /// Sends at most one `data.update` at a time; windows arriving while
    /// one is in flight collapse into a single follow-up with the latest
    /// window.
    async fn update_events(&mut self, window: &EventWindow) -> Result<(), SessionError> {
        let Some(mut window) = self.data_updates.trigger(window.clone()) else {
            return Ok(());
        };
        loop {
            match self.call(&Self::data_request(&window)).await {
                Ok(_) => match self.data_updates.complete() {
                    Some(next) => window = next,
                    None => return Ok(()),
                },
                Err(e) => {
                    warn!(error = %e, "event window update failed");
                    self.data_updates.fail();
                    return Err(e);
                }
            }
        }
    }

    async fn update_mine(&mut self) -> Result<(), SessionError> {
        self.call(&RpcRequest::MineGet).await.map(|_| ())
    }

    async fn update_stations(&mut self) -> Result<(), SessionError> {
        self.call(&RpcRequest::StationsUpdate).await.map(|_| ())
    }

    async fn update_scaling(
        &mut self,
        magnitude_range: [f64; 2],
        scaling_range: [f64; 2],
    ) -> Result<(), SessionError> {
        self.call(&RpcRequest::ScalingUpdate {
            magnitude_range,
            scaling_range,
        })
        .await
        .map(|_| ())
    }

    async fn update_uncertainty_scaling(&mut self, factor: f64) -> Result<(), SessionError> {
        self.call(&RpcRequest::UncertaintyScalingUpdate { factor })
            .await
            .map(|_| ())
    }

    async fn update_color_preset(&mut self, name: &str) -> Result<(), SessionError> {
        self.call(&RpcRequest::ColorPresetUpdate {
            name: name.to_string(),
        })
        .await
        .map(|_| ())
    }

    async fn update_visibility(
        &mut self,
        visibility: LayerVisibility,
    ) -> Result<(), SessionError> {
        self.call(&RpcRequest::VisibilityUpdate {
            mine: visibility.mine,
            seismic_events: visibility.seismic_events,
            blasts: visibility.blasts,
            historic_events: visibility.historic_events,
            ray: visibility.ray,
            uncertainty: visibility.uncertainty,
        })
        .await
        .map(|_| ())
    }

    async fn update_mine_visibility(
        &mut self,
        visible_ids: Vec<String>,
    ) -> Result<(), SessionError> {
        self.call(&RpcRequest::MineVisibilityUpdate { visible_ids })
            .await
            .map(|_| ())
    }

    async fn show_ray(&mut self, event_resource_id: &str) -> Result<bool, SessionError> {
        let reply = self
            .call(&RpcRequest::ShowRay {
                event_resource_id: event_resource_id.to_string(),
            })
            .await?;
        let decoded: ShowRayResponse =
            serde_json::from_value(reply).map_err(|e| SessionError::Decode(e.to_string()))?;
        Ok(decoded.has_rays)
    }

    async fn update_ray_filter(&mut self, mode: RayFilterMode) -> Result<(), SessionError> {
        self.call(&RpcRequest::RayFilterUpdate {
            mode: ray_mode_index(mode),
        })
        .await
        .map(|_| ())
    }

    async fn show_scatter(&mut self, event_resource_id: &str) -> Result<bool, SessionError> {
        let reply = self
            .call(&RpcRequest::ShowScatter {
                event_resource_id: event_resource_id.to_string(),
            })
            .await?;
        let decoded: ShowScatterResponse =
            serde_json::from_value(reply).map_err(|e| SessionError::Decode(e.to_string()))?;
        Ok(decoded.has_points)
    }

    async fn hide_scatter(&mut self) -> Result<(), SessionError> {
        self.call(&RpcRequest::HideScatter).await.map(|_| ())
    }

    async fn pick(
        &mut self,
        pick: Option<PickRef>,
    ) -> Result<Option<PickedEvent>, SessionError> {
        let reply = self
            .call(&RpcRequest::Pick {
                layer: pick.map(|p| layer_name(p.layer).to_string()),
                composite_id: pick.map(|p| p.composite_id),
            })
            .await?;
        if reply.is_null() {
            return Ok(None);
        }
        let decoded: PickResponse =
            serde_json::from_value(reply).map_err(|e| SessionError::Decode(e.to_string()))?;
        Ok(Some(PickedEvent {
            local_id: decoded.local_id,
            magnitude: decoded.magnitude,
            time_epoch: decoded.time_epoch,
            uncertainty: decoded.uncertainty,
            event_resource_id: decoded.event_resource_id,
            world_position: decoded.world_position,
        }))
    }

    async fn activate_event(&mut self, resource_id: &str) -> Result<(), SessionError> {
        self.call(&RpcRequest::ActivateEvent {
            event_resource_id: resource_id.to_string(),
        })
        .await
        .map(|_| ())
    }

    /// Renders coalesce without arguments: many triggers during one
    /// round-trip produce exactly one follow-up.
    async fn reset_camera(&mut self) -> Result<(), SessionError> {
        self.call(&RpcRequest::CameraReset).await.map(|_| ())
    }

    async fn set_center_of_rotation(&mut self, position: [f64; 3]) -> Result<(), SessionError> {
        self.call(&RpcRequest::CenterRotation { position })
            .await
            .map(|_| ())
    }

    async fn snap(&mut self) -> Result<(), SessionError> {
        self.call(&RpcRequest::CameraSnap).await.map(|_| ())
    }

    async fn render(&mut self) -> Result<(), SessionError> {
        if !self.renders.trigger() {
            return Ok(());
        }
        loop {
            match self.call(&RpcRequest::Render).await {
                Ok(_) => {
                    if !self.renders.complete() {
                        return Ok(());
                    }
                }
                Err(e) => {
                    self.renders.fail();
                    warn!(error = %e, "render call failed");
                    return Err(e);
                }
            }
        }
    }
}
