//! Drain-style change notification for the view layer.
//!
//! The pipeline emits structured events; the view polls and drains. Nothing
//! outside the pipeline mutates scene state to find out what changed.

/// The data classes refreshed independently of each other.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataClass {
    FocusEvents,
    HistoricalEvents,
    Stations,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    EventsRefreshed { class: DataClass, count: usize },
    /// A response arrived for a superseded request and was dropped.
    RefreshRejected { class: DataClass, seq: u64 },
    FetchFailed { class: DataClass, message: String },
    StationsRefreshed { count: usize },
    MineLoaded { piece_count: usize },
    MinePieceLoaded { piece_id: String },
    PickedChanged { event_resource_id: Option<String> },
    RaysShown { event_resource_id: String, count: usize },
    ScatterShown { event_resource_id: String, count: usize },
}

#[derive(Debug, Default)]
pub struct SceneEventBus {
    events: Vec<SceneEvent>,
}

impl SceneEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}
