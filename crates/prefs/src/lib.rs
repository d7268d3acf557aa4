//! Persisted UI preferences.
//!
//! Preferences are namespaced string key/value pairs with a typed codec per
//! key: booleans as `"0"`/`"1"`, numbers as decimal strings, ranges as JSON
//! two-element arrays, strings as-is. A value that fails to decode falls
//! back to its default; settings storage is never a fatal error.

use std::collections::BTreeMap;

pub const KEY_PREFIX: &str = "quake.config.";

pub const KEY_LIVE_MODE: &str = "livemode";
pub const KEY_DARK_MODE: &str = "darkmode";
pub const KEY_REFRESH_RATE: &str = "refreshrate";
pub const KEY_SCALING_RANGE: &str = "scalingrange";
pub const KEY_MAGNITUDE_RANGE: &str = "magnituderange";
pub const KEY_UNCERTAINTY_SCALE: &str = "uncertaintyscale";
pub const KEY_COLOR_PRESET: &str = "preset";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefError {
    StorageUnavailable,
    Io(String),
}

impl std::fmt::Display for PrefError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefError::StorageUnavailable => write!(f, "preference storage unavailable"),
            PrefError::Io(msg) => write!(f, "preference storage error: {msg}"),
        }
    }
}

impl std::error::Error for PrefError {}

/// Raw namespaced storage. Keys passed in are bare; implementations apply
/// [`KEY_PREFIX`].
pub trait PrefStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, PrefError>;
    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), PrefError>;
    fn remove(&mut self, key: &str) -> Result<bool, PrefError>;
}

#[derive(Debug, Default)]
pub struct InMemoryPrefStore {
    values: BTreeMap<String, String>,
}

impl InMemoryPrefStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for InMemoryPrefStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, PrefError> {
        Ok(self.values.get(&format!("{KEY_PREFIX}{key}")).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), PrefError> {
        self.values
            .insert(format!("{KEY_PREFIX}{key}"), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, PrefError> {
        Ok(self.values.remove(&format!("{KEY_PREFIX}{key}")).is_some())
    }
}

fn decode_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

fn decode_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn decode_range(raw: &str) -> Option<[f64; 2]> {
    let values: Vec<f64> = serde_json::from_str(raw).ok()?;
    match values[..] {
        [a, b] => Some([a, b]),
        _ => None,
    }
}

fn encode_range(range: [f64; 2]) -> String {
    // serde_json renders f64 whole numbers as "1.0"; that round-trips fine.
    serde_json::to_string(&range).unwrap_or_else(|_| "[0.0,0.0]".to_string())
}

/// Typed accessors over any raw store. All getters fall back to the given
/// default when the key is missing, unreadable, or undecodable.
pub fn get_bool(store: &dyn PrefStore, key: &str, default: bool) -> bool {
    match store.get_raw(key) {
        Ok(Some(raw)) => decode_bool(&raw).unwrap_or(default),
        _ => default,
    }
}

pub fn set_bool(store: &mut dyn PrefStore, key: &str, value: bool) -> Result<(), PrefError> {
    store.set_raw(key, if value { "1" } else { "0" })
}

pub fn get_number(store: &dyn PrefStore, key: &str, default: f64) -> f64 {
    match store.get_raw(key) {
        Ok(Some(raw)) => decode_number(&raw).unwrap_or(default),
        _ => default,
    }
}

pub fn set_number(store: &mut dyn PrefStore, key: &str, value: f64) -> Result<(), PrefError> {
    store.set_raw(key, &value.to_string())
}

pub fn get_range(store: &dyn PrefStore, key: &str, default: [f64; 2]) -> [f64; 2] {
    match store.get_raw(key) {
        Ok(Some(raw)) => decode_range(&raw).unwrap_or(default),
        _ => default,
    }
}

pub fn set_range(store: &mut dyn PrefStore, key: &str, value: [f64; 2]) -> Result<(), PrefError> {
    store.set_raw(key, &encode_range(value))
}

pub fn get_string(store: &dyn PrefStore, key: &str, default: &str) -> String {
    match store.get_raw(key) {
        Ok(Some(raw)) => raw,
        _ => default.to_string(),
    }
}

pub fn set_string(store: &mut dyn PrefStore, key: &str, value: &str) -> Result<(), PrefError> {
    store.set_raw(key, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bool_round_trips_as_zero_one() {
        let mut store = InMemoryPrefStore::new();
        set_bool(&mut store, KEY_LIVE_MODE, true).unwrap();
        assert_eq!(store.get_raw(KEY_LIVE_MODE).unwrap().as_deref(), Some("1"));
        assert!(get_bool(&store, KEY_LIVE_MODE, false));

        set_bool(&mut store, KEY_LIVE_MODE, false).unwrap();
        assert!(!get_bool(&store, KEY_LIVE_MODE, true));
    }

    #[test]
    fn range_round_trips_as_json_array() {
        let mut store = InMemoryPrefStore::new();
        set_range(&mut store, KEY_MAGNITUDE_RANGE, [-2.0, 3.0]).unwrap();
        assert_eq!(
            get_range(&store, KEY_MAGNITUDE_RANGE, [0.0, 1.0]),
            [-2.0, 3.0]
        );
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let mut store = InMemoryPrefStore::new();
        store.set_raw(KEY_REFRESH_RATE, "ten").unwrap();
        store.set_raw(KEY_SCALING_RANGE, "{\"oops\":1}").unwrap();
        store.set_raw(KEY_DARK_MODE, "yes").unwrap();

        assert_eq!(get_number(&store, KEY_REFRESH_RATE, 10.0), 10.0);
        assert_eq!(get_range(&store, KEY_SCALING_RANGE, [0.1, 1.0]), [0.1, 1.0]);
        assert!(!get_bool(&store, KEY_DARK_MODE, false));
        assert_eq!(get_string(&store, KEY_COLOR_PRESET, "coolwarm"), "coolwarm");
    }

    #[test]
    fn keys_are_namespaced() {
        let mut store = InMemoryPrefStore::new();
        set_number(&mut store, KEY_REFRESH_RATE, 5.0).unwrap();
        assert!(store.values.contains_key("quake.config.refreshrate"));
        assert!(store.remove(KEY_REFRESH_RATE).unwrap());
        assert!(!store.remove(KEY_REFRESH_RATE).unwrap());
    }
}
