//! Data-to-scene synchronization.
//!
//! One `SceneSyncPipeline` owns everything derived from catalog data: the
//! per-layer buffers, the local-id indexes, the mine tree, and the session
//! context. Refreshes are guarded by per-class sequence numbers so a late
//! response for a superseded request is rejected instead of overwriting
//! newer data.
//!
//! Ordering contract:
//! - `begin_*` allocates a sequence; only the most recently issued sequence
//!   for that class may apply.
//! - Focus quakes and blasts share one index refresh (quakes first), so
//!   their local ids form a single dense space.
//! - Failures are reported on the event bus and leave prior state intact.

use std::collections::VecDeque;

use catalog::filter::{TYPE_ALL, filter_events};
use catalog::mineplan::{MinePiece, MinePlan, MineTree, STATIONS_PIECE_ID};
use catalog::records::{Event, SignalQuality, Station};
use catalog::source::{CatalogSource, EventQuery, SourceError};
use foundation::{BoundsError, MineBounds, ScaleError, ScaleMap};
use scene::buffers::{
    EventBuffers, RayBuffers, ScatterBuffers, StationBuffers, active_marker_points,
};
use scene::event_index::{EventIndex, IndexError, RefreshHandle};
use scene::picking::{PickRef, PickedEvent, resolve_pick};
use scene::render::{RenderSink, SceneProp};
use scene::visibility::{EventLayer, LayerVisibility, RayFilterMode};
use tracing::{error, info, warn};

use crate::bus::{DataClass, SceneEvent, SceneEventBus};
use crate::context::SessionContext;

pub const QUAKE_TYPE: &str = "earthquake";
pub const BLAST_TYPE: &str = "explosion";

/// Glyph scale factor applied on top of the scaling range.
pub const SCALING_FACTOR: f64 = 50.0;

pub const DEFAULT_MAGNITUDE_RANGE: [f64; 2] = [-2.0, 3.0];
pub const DEFAULT_SCALING_RANGE: [f64; 2] = [0.1, 1.0];
pub const DEFAULT_UNCERTAINTY_FACTOR: f64 = 1.0;

// The historical layer keeps its own wider mapping and is not affected by
// the user scaling controls.
const HISTORICAL_MAGNITUDE_RANGE: [f64; 2] = [-3.0, 5.0];
const HISTORICAL_SCALING_RANGE: [f64; 2] = [0.001, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// No mine plan applied yet; nothing spatial can be derived.
    MissingBounds,
    Bounds(BoundsError),
    Scale(ScaleError),
    Index(IndexError),
    Source(SourceError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::MissingBounds => write!(f, "no mine bounds set yet"),
            PipelineError::Bounds(e) => write!(f, "bad mine bounds: {e}"),
            PipelineError::Scale(e) => write!(f, "bad scaling configuration: {e}"),
            PipelineError::Index(e) => write!(f, "event index failure: {e}"),
            PipelineError::Source(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<BoundsError> for PipelineError {
    fn from(e: BoundsError) -> Self {
        PipelineError::Bounds(e)
    }
}

impl From<ScaleError> for PipelineError {
    fn from(e: ScaleError) -> Self {
        PipelineError::Scale(e)
    }
}

impl From<IndexError> for PipelineError {
    fn from(e: IndexError) -> Self {
        PipelineError::Index(e)
    }
}

impl From<SourceError> for PipelineError {
    fn from(e: SourceError) -> Self {
        PipelineError::Source(e)
    }
}

/// Whether a response was applied or rejected as superseded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Stale,
}

#[derive(Debug, Default)]
struct SeqGuard {
    issued: u64,
}

impl SeqGuard {
    fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn is_current(&self, seq: u64) -> bool {
        seq == self.issued
    }
}

#[derive(Debug, Default)]
pub struct SceneSyncPipeline {
    geometry: Option<(MineBounds, [f64; 3])>,

    ctx: SessionContext,
    bus: SceneEventBus,

    focus_seq: SeqGuard,
    historical_seq: SeqGuard,
    stations_seq: SeqGuard,

    focus_index: EventIndex,
    focus_handle: Option<RefreshHandle>,
    historical_index: EventIndex,
    historical_handle: Option<RefreshHandle>,

    quake_buffers: EventBuffers,
    blast_buffers: EventBuffers,
    historical_buffers: EventBuffers,
    station_buffers: StationBuffers,
    ray_buffers: RayBuffers,
    active_ray_event: Option<String>,
    scatter_buffers: ScatterBuffers,
    active_scatter_event: Option<String>,

    last_focus_events: Vec<Event>,

    visibility: LayerVisibility,
    ray_filter: RayFilterMode,
    magnitude_range: [f64; 2],
    scaling_range: [f64; 2],
    uncertainty_factor: f64,
    color_preset: String,

    mine_tree: Option<MineTree>,
    mine_visibility: Vec<String>,
    pieces_pending: VecDeque<MinePiece>,
    mine_ready: bool,

    picked: Option<PickedEvent>,
}

impl SceneSyncPipeline {
    pub fn new() -> Self {
        SceneSyncPipeline {
            magnitude_range: DEFAULT_MAGNITUDE_RANGE,
            scaling_range: DEFAULT_SCALING_RANGE,
            uncertainty_factor: DEFAULT_UNCERTAINTY_FACTOR,
            color_preset: "coolwarm".to_string(),
            ..Default::default()
        }
    }

    fn geometry(&self) -> Result<(MineBounds, [f64; 3]), PipelineError> {
        self.geometry.ok_or(PipelineError::MissingBounds)
    }

    pub fn bounds(&self) -> Option<MineBounds> {
        self.geometry.map(|(b, _)| b)
    }

    pub fn events_bus(&self) -> &SceneEventBus {
        &self.bus
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.bus.drain()
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn visibility(&self) -> LayerVisibility {
        self.visibility
    }

    pub fn ray_filter(&self) -> RayFilterMode {
        self.ray_filter
    }

    pub fn color_preset(&self) -> &str {
        &self.color_preset
    }

    /// Raw events of the last applied focus response, for catalogue
    /// building.
    pub fn last_focus_events(&self) -> &[Event] {
        &self.last_focus_events
    }

    pub fn picked(&self) -> Option<&PickedEvent> {
        self.picked.as_ref()
    }

    // ----------------------------------------------------------------- mine

    /// Applies a mine plan: derives bounds and translate, builds the piece
    /// tree, and queues declared pieces for loading. Everything derived
    /// from previous bounds must be refreshed afterwards.
    pub fn apply_mine_plan(&mut self, plan: &MinePlan) -> Result<(), PipelineError> {
        let bounds = MineBounds::from_extents(plan.boundaries)?;
        self.geometry = Some((bounds, bounds.translate()));

        let tree = MineTree::from_plan(plan);
        self.mine_visibility = tree.default_visibility.clone();
        self.pieces_pending = tree.pieces_to_load.iter().cloned().collect();
        self.mine_ready = false;
        info!(
            pieces = tree.pieces_to_load.len(),
            "mine plan applied, bounds {:?}", plan.boundaries
        );
        self.bus.emit(SceneEvent::MineLoaded {
            piece_count: tree.pieces_to_load.len(),
        });
        self.mine_tree = Some(tree);
        Ok(())
    }

    /// Loads exactly one queued piece. Returns whether more remain; on the
    /// transition to empty it applies default visibility and resets the
    /// camera. The caller owns the pacing (one call per tick).
    pub fn load_next_piece<K: RenderSink + ?Sized>(
        &mut self,
        sink: &mut K,
    ) -> Result<bool, PipelineError> {
        let (_, translate) = self.geometry()?;
        match self.pieces_pending.pop_front() {
            Some(piece) => {
                sink.load_mine_piece(&piece, translate);
                self.bus.emit(SceneEvent::MinePieceLoaded {
                    piece_id: piece.label,
                });
                Ok(true)
            }
            None => {
                if !self.mine_ready {
                    self.mine_ready = true;
                    self.apply_mine_visibility(sink);
                    sink.reset_camera();
                    sink.render();
                }
                Ok(false)
            }
        }
    }

    pub fn mine_tree(&self) -> Option<&MineTree> {
        self.mine_tree.as_ref()
    }

    pub fn set_mine_visibility<K: RenderSink + ?Sized>(
        &mut self,
        visible_ids: Vec<String>,
        sink: &mut K,
    ) {
        self.mine_visibility = visible_ids;
        self.apply_mine_visibility(sink);
        sink.render();
    }

    fn apply_mine_visibility<K: RenderSink + ?Sized>(&self, sink: &mut K) {
        if let Some(tree) = &self.mine_tree {
            for id in tree.flatten_ids() {
                let visible = self.visibility.mine && self.mine_visibility.contains(&id);
                sink.set_mine_piece_visibility(&id, visible);
            }
        }
        let stations_on = self
            .mine_visibility
            .iter()
            .any(|id| id == STATIONS_PIECE_ID);
        sink.set_prop_visibility(SceneProp::Stations, stations_on);
    }

    // --------------------------------------------------------------- events

    /// Allocates a new focus-refresh sequence, superseding any in flight.
    pub fn begin_focus_refresh(&mut self) -> u64 {
        self.focus_seq.begin()
    }

    pub fn begin_historical_refresh(&mut self) -> u64 {
        self.historical_seq.begin()
    }

    /// Applies a focus response: filters by bounds and type, rebuilds the
    /// quake and blast buffers sharing one id space, and pushes them to the
    /// renderer. A superseded sequence is rejected untouched.
    pub fn apply_focus_events<K: RenderSink + ?Sized>(
        &mut self,
        seq: u64,
        events: Vec<Event>,
        color_range: [f64; 2],
        sink: &mut K,
    ) -> Result<ApplyOutcome, PipelineError> {
        let (bounds, translate) = self.geometry()?;
        if !self.focus_seq.is_current(seq) {
            warn!(seq, current = self.focus_seq.issued, "dropping stale focus response");
            self.bus.emit(SceneEvent::RefreshRejected {
                class: DataClass::FocusEvents,
                seq,
            });
            return Ok(ApplyOutcome::Stale);
        }

        let handle = self.focus_index.begin_refresh();
        self.focus_handle = Some(handle);

        let quakes = filter_events(&bounds, &events, QUAKE_TYPE);
        let blasts = filter_events(&bounds, &events, BLAST_TYPE);
        let count = quakes.len() + blasts.len();
        self.ctx.remember_origins(
            quakes.iter().chain(blasts.iter()).map(|e| {
                (
                    e.event_resource_id.as_str(),
                    e.preferred_origin_id.as_str(),
                )
            }),
        );

        self.quake_buffers = EventBuffers::build(&quakes, translate, &mut self.focus_index, handle)?;
        self.blast_buffers = EventBuffers::build(&blasts, translate, &mut self.focus_index, handle)?;

        let scale = ScaleMap::new(self.magnitude_range, self.scaling_range, SCALING_FACTOR)?;
        for buffers in [&mut self.quake_buffers, &mut self.blast_buffers] {
            buffers.rescale_magnitudes(&scale);
            buffers.rescale_uncertainties(self.uncertainty_factor);
        }

        sink.upload_events(EventLayer::SeismicEvents, &self.quake_buffers);
        sink.upload_events(EventLayer::Blasts, &self.blast_buffers);
        sink.set_color_range(EventLayer::SeismicEvents, color_range);
        sink.set_color_range(EventLayer::Blasts, color_range);
        sink.render();

        info!(count, "focus events refreshed");
        self.last_focus_events = events;
        self.bus.emit(SceneEvent::EventsRefreshed {
            class: DataClass::FocusEvents,
            count,
        });
        Ok(ApplyOutcome::Applied)
    }

    /// Applies a historical response (all event types, bounds filter only).
    pub fn apply_historical_events<K: RenderSink + ?Sized>(
        &mut self,
        seq: u64,
        events: Vec<Event>,
        sink: &mut K,
    ) -> Result<ApplyOutcome, PipelineError> {
        let (bounds, translate) = self.geometry()?;
        if !self.historical_seq.is_current(seq) {
            warn!(
                seq,
                current = self.historical_seq.issued,
                "dropping stale historical response"
            );
            self.bus.emit(SceneEvent::RefreshRejected {
                class: DataClass::HistoricalEvents,
                seq,
            });
            return Ok(ApplyOutcome::Stale);
        }

        let handle = self.historical_index.begin_refresh();
        self.historical_handle = Some(handle);

        let kept = filter_events(&bounds, &events, TYPE_ALL);
        let count = kept.len();
        self.ctx.remember_origins(kept.iter().map(|e| {
            (
                e.event_resource_id.as_str(),
                e.preferred_origin_id.as_str(),
            )
        }));

        self.historical_buffers =
            EventBuffers::build(&kept, translate, &mut self.historical_index, handle)?;
        let scale = ScaleMap::new(
            HISTORICAL_MAGNITUDE_RANGE,
            HISTORICAL_SCALING_RANGE,
            SCALING_FACTOR,
        )?;
        self.historical_buffers.rescale_magnitudes(&scale);
        self.historical_buffers
            .rescale_uncertainties(self.uncertainty_factor);

        sink.upload_events(EventLayer::HistoricEvents, &self.historical_buffers);
        sink.render();

        info!(count, "historical events refreshed");
        self.bus.emit(SceneEvent::EventsRefreshed {
            class: DataClass::HistoricalEvents,
            count,
        });
        Ok(ApplyOutcome::Applied)
    }

    /// Runs the two time-windowed fetches concurrently and applies each as
    /// it lands. Either may fail or be superseded independently; a failure
    /// is logged and reported without touching that class's prior state.
    pub async fn refresh_events<S, K>(
        &mut self,
        source: &S,
        focus_query: &EventQuery,
        historical_query: &EventQuery,
        focus_color_range: [f64; 2],
        sink: &mut K,
    ) -> Result<(), PipelineError>
    where
        S: CatalogSource,
        K: RenderSink + ?Sized,
    {
        // Fail fast before issuing any request.
        self.geometry()?;

        let focus_seq = self.begin_focus_refresh();
        let historical_seq = self.begin_historical_refresh();

        let (focus, historical) = futures_util::future::join(
            source.fetch_events(focus_query),
            source.fetch_events(historical_query),
        )
        .await;

        match focus {
            Ok(events) => {
                self.apply_focus_events(focus_seq, events, focus_color_range, sink)?;
            }
            Err(e) => {
                error!(error = %e, "focus event fetch failed");
                self.bus.emit(SceneEvent::FetchFailed {
                    class: DataClass::FocusEvents,
                    message: e.to_string(),
                });
            }
        }

        match historical {
            Ok(events) => {
                self.apply_historical_events(historical_seq, events, sink)?;
            }
            Err(e) => {
                error!(error = %e, "historical event fetch failed");
                self.bus.emit(SceneEvent::FetchFailed {
                    class: DataClass::HistoricalEvents,
                    message: e.to_string(),
                });
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------- stations

    /// Fetches all station pages and rebuilds the station buffers. An error
    /// mid-pagination keeps the pages gathered so far; losing already
    /// fetched stations helps nobody.
    pub async fn refresh_stations<S, K>(
        &mut self,
        source: &S,
        sink: &mut K,
    ) -> Result<ApplyOutcome, PipelineError>
    where
        S: CatalogSource,
        K: RenderSink + ?Sized,
    {
        let (_, translate) = self.geometry()?;
        let seq = self.stations_seq.begin();

        let mut stations: Vec<Station> = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            match source.fetch_stations_page(cursor.as_deref()).await {
                Ok(page) => {
                    stations.extend(page.results);
                    match page.next {
                        Some(next) => cursor = Some(next),
                        None => break,
                    }
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        gathered = stations.len(),
                        "station pagination failed, using partial listing"
                    );
                    self.bus.emit(SceneEvent::FetchFailed {
                        class: DataClass::Stations,
                        message: e.to_string(),
                    });
                    break;
                }
            }
        }

        if !self.stations_seq.is_current(seq) {
            self.bus.emit(SceneEvent::RefreshRejected {
                class: DataClass::Stations,
                seq,
            });
            return Ok(ApplyOutcome::Stale);
        }

        self.station_buffers = StationBuffers::build(&stations, translate);
        sink.upload_stations(&self.station_buffers);
        sink.render();
        info!(count = stations.len(), "stations refreshed");
        self.bus.emit(SceneEvent::StationsRefreshed {
            count: stations.len(),
        });
        Ok(ApplyOutcome::Applied)
    }

    /// Updates station health in place from live feed samples.
    pub fn apply_signal_quality<K: RenderSink + ?Sized>(
        &mut self,
        samples: &[SignalQuality],
        sink: &mut K,
    ) {
        self.station_buffers.apply_signal_quality(samples);
        sink.upload_stations(&self.station_buffers);
        sink.render();
    }

    // -------------------------------------------------------------- scaling

    /// Recomputes glyph sizes in place; no data is re-fetched. A degenerate
    /// magnitude range is a configuration error and changes nothing.
    pub fn update_scaling<K: RenderSink + ?Sized>(
        &mut self,
        magnitude_range: [f64; 2],
        scaling_range: [f64; 2],
        sink: &mut K,
    ) -> Result<(), PipelineError> {
        let scale = ScaleMap::new(magnitude_range, scaling_range, SCALING_FACTOR)?;
        self.magnitude_range = magnitude_range;
        self.scaling_range = scaling_range;
        for buffers in [&mut self.quake_buffers, &mut self.blast_buffers] {
            buffers.rescale_magnitudes(&scale);
        }
        sink.upload_events(EventLayer::SeismicEvents, &self.quake_buffers);
        sink.upload_events(EventLayer::Blasts, &self.blast_buffers);
        sink.render();
        Ok(())
    }

    pub fn update_uncertainty_scaling<K: RenderSink + ?Sized>(
        &mut self,
        factor: f64,
        sink: &mut K,
    ) {
        self.uncertainty_factor = factor;
        for buffers in [&mut self.quake_buffers, &mut self.blast_buffers] {
            buffers.rescale_uncertainties(factor);
        }
        sink.upload_events(EventLayer::SeismicEvents, &self.quake_buffers);
        sink.upload_events(EventLayer::Blasts, &self.blast_buffers);
        sink.render();
    }

    pub fn update_color_preset<K: RenderSink + ?Sized>(&mut self, name: &str, sink: &mut K) {
        self.color_preset = name.to_string();
        sink.set_color_preset(name);
        sink.render();
    }

    // ----------------------------------------------------------- visibility

    /// Applies layer visibility to props. Pure visibility; no data touched.
    pub fn set_visibility<K: RenderSink + ?Sized>(
        &mut self,
        visibility: LayerVisibility,
        sink: &mut K,
    ) {
        self.visibility = visibility;
        for layer in [
            EventLayer::SeismicEvents,
            EventLayer::Blasts,
            EventLayer::HistoricEvents,
        ] {
            sink.set_prop_visibility(
                SceneProp::Events(layer),
                visibility.event_prop_visible(layer),
            );
            sink.set_prop_visibility(
                SceneProp::Uncertainty(layer),
                visibility.uncertainty_prop_visible(layer),
            );
        }
        self.apply_ray_visibility(sink);
        self.apply_mine_visibility(sink);
        sink.render();
    }

    pub fn update_ray_filter<K: RenderSink + ?Sized>(
        &mut self,
        mode: RayFilterMode,
        sink: &mut K,
    ) {
        self.ray_filter = mode;
        self.apply_ray_visibility(sink);
        sink.render();
    }

    fn apply_ray_visibility<K: RenderSink + ?Sized>(&self, sink: &mut K) {
        for piece in scene::buffers::RayPiece::ALL {
            sink.set_prop_visibility(
                SceneProp::Ray(piece),
                self.ray_filter.piece_visible(&self.visibility, piece),
            );
        }
    }

    // ----------------------------------------------------------------- rays

    /// Shows rays for an event, fetching them once and serving the session
    /// cache afterwards. Returns whether the event has any rays; when it
    /// does and the ray layer is off, the layer is switched on.
    pub async fn show_ray<S, K>(
        &mut self,
        event_resource_id: &str,
        source: &S,
        sink: &mut K,
    ) -> Result<bool, PipelineError>
    where
        S: CatalogSource,
        K: RenderSink + ?Sized,
    {
        let (_, translate) = self.geometry()?;

        if !self.ctx.ray_data.contains_key(event_resource_id) {
            let rays = source.fetch_rays(event_resource_id).await?;
            self.ctx
                .ray_counts
                .insert(event_resource_id.to_string(), rays.len());
            self.ctx
                .ray_data
                .insert(event_resource_id.to_string(), rays);
        }

        let rays = &self.ctx.ray_data[event_resource_id];
        let has_rays = !rays.is_empty();
        self.ray_buffers =
            RayBuffers::build(rays, self.ctx.preferred_origin(event_resource_id), translate);
        self.active_ray_event = Some(event_resource_id.to_string());
        sink.upload_rays(&self.ray_buffers);

        if has_rays && !self.visibility.ray {
            let mut visibility = self.visibility;
            visibility.ray = true;
            self.set_visibility(visibility, sink);
        } else {
            self.apply_ray_visibility(sink);
            sink.render();
        }

        self.bus.emit(SceneEvent::RaysShown {
            event_resource_id: event_resource_id.to_string(),
            count: self.ctx.ray_counts[event_resource_id],
        });
        Ok(has_rays)
    }

    pub fn ray_count_for(&self, event_resource_id: &str) -> Option<usize> {
        self.ctx.ray_counts.get(event_resource_id).copied()
    }

    /// Event whose rays are currently uploaded, if any.
    pub fn active_ray_event(&self) -> Option<&str> {
        self.active_ray_event.as_deref()
    }

    // -------------------------------------------------------------- scatter

    /// Shows the location-uncertainty scatter cloud for an event, fetching
    /// it once and serving the session cache afterwards. Samples outside
    /// the mine bounds are dropped at build time. Returns whether any
    /// in-bounds points remain.
    pub async fn show_scatter<S, K>(
        &mut self,
        event_resource_id: &str,
        source: &S,
        sink: &mut K,
    ) -> Result<bool, PipelineError>
    where
        S: CatalogSource,
        K: RenderSink + ?Sized,
    {
        let (bounds, translate) = self.geometry()?;

        if !self.ctx.scatter_data.contains_key(event_resource_id) {
            let samples = source.fetch_scatters(event_resource_id).await?;
            self.ctx
                .scatter_data
                .insert(event_resource_id.to_string(), samples);
        }

        let samples = &self.ctx.scatter_data[event_resource_id];
        self.scatter_buffers = ScatterBuffers::build(samples, &bounds, translate);
        let has_points = !self.scatter_buffers.is_empty();
        self.active_scatter_event = Some(event_resource_id.to_string());
        sink.upload_scatter(&self.scatter_buffers);
        sink.set_prop_visibility(SceneProp::Scatter, has_points);
        sink.render();

        self.bus.emit(SceneEvent::ScatterShown {
            event_resource_id: event_resource_id.to_string(),
            count: self.scatter_buffers.len(),
        });
        Ok(has_points)
    }

    /// Hides the scatter cloud, keeping the cache for the next toggle.
    pub fn hide_scatter<K: RenderSink + ?Sized>(&mut self, sink: &mut K) {
        self.active_scatter_event = None;
        sink.set_prop_visibility(SceneProp::Scatter, false);
        sink.render();
    }

    /// Event whose scatter cloud is currently shown, if any.
    pub fn active_scatter_event(&self) -> Option<&str> {
        self.active_scatter_event.as_deref()
    }

    // -------------------------------------------------------------- picking

    /// Resolves a renderer selection against the owning layer's buffers.
    /// Picks racing a refresh resolve to `None`.
    pub fn resolve_selection(&self, pick: PickRef) -> Option<PickedEvent> {
        match pick.layer {
            EventLayer::SeismicEvents => {
                let handle = self.focus_handle?;
                resolve_pick(
                    &self.quake_buffers,
                    &self.focus_index,
                    handle,
                    pick.composite_id,
                )
            }
            EventLayer::Blasts => {
                let handle = self.focus_handle?;
                resolve_pick(
                    &self.blast_buffers,
                    &self.focus_index,
                    handle,
                    pick.composite_id,
                )
            }
            EventLayer::HistoricEvents => {
                let handle = self.historical_handle?;
                resolve_pick(
                    &self.historical_buffers,
                    &self.historical_index,
                    handle,
                    pick.composite_id,
                )
            }
        }
    }

    /// Stores the picked selection (or clears it) and notifies the bus.
    pub fn update_picked(&mut self, pick: Option<PickRef>) -> Option<&PickedEvent> {
        self.picked = pick.and_then(|p| self.resolve_selection(p));
        self.bus.emit(SceneEvent::PickedChanged {
            event_resource_id: self
                .picked
                .as_ref()
                .map(|p| p.event_resource_id.clone()),
        });
        self.picked.as_ref()
    }

    // ----------------------------------------------------------- activation

    /// Highlights an event from the current focus refresh with the bounds
    /// crosshair, or hides the marker when the event is not in the scene.
    pub fn activate_event<K: RenderSink + ?Sized>(
        &mut self,
        resource_id: &str,
        sink: &mut K,
    ) -> Result<(), PipelineError> {
        let (bounds, translate) = self.geometry()?;

        let position = self.focus_handle.and_then(|handle| {
            let idx = self.focus_index.position_of(handle, resource_id).ok()??;
            let idx = idx as usize;
            let quakes = self.quake_buffers.len();
            if idx < quakes {
                Some(self.quake_buffers.positions[idx])
            } else {
                self.blast_buffers.positions.get(idx - quakes).copied()
            }
        });

        match position {
            Some(p) => {
                sink.upload_active_marker(active_marker_points(&bounds, translate, p));
                sink.set_prop_visibility(SceneProp::ActiveMarker, true);
            }
            None => {
                sink.set_prop_visibility(SceneProp::ActiveMarker, false);
            }
        }
        sink.render();
        Ok(())
    }
}
