//! Session-scoped caches.
//!
//! These used to be natural candidates for module-level statics; instead
//! every pipeline owns its context so two sessions can never bleed cached
//! rays or origin mappings into each other.

use std::collections::HashMap;

use catalog::records::{Ray, ScatterSample};

#[derive(Debug, Default)]
pub struct SessionContext {
    /// Fetched rays by event resource id. Filled once per event, never
    /// evicted within a session.
    pub ray_data: HashMap<String, Vec<Ray>>,
    /// Known ray counts by event resource id (also covers events whose
    /// fetch returned zero rays).
    pub ray_counts: HashMap<String, usize>,
    /// Fetched scatter clouds by event resource id, unfiltered. Bounds
    /// filtering happens at buffer-build time.
    pub scatter_data: HashMap<String, Vec<ScatterSample>>,
    /// Event resource id to preferred origin id. Grows additively across
    /// refreshes; an event seen once keeps its mapping even after it ages
    /// out of the focus window.
    pub preferred_origins: HashMap<String, String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember_origins<'a>(
        &mut self,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        for (event_id, origin_id) in pairs {
            self.preferred_origins
                .insert(event_id.to_string(), origin_id.to_string());
        }
    }

    pub fn preferred_origin(&self, event_id: &str) -> &str {
        self.preferred_origins
            .get(event_id)
            .map(String::as_str)
            .unwrap_or("")
    }
}
