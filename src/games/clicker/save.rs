//! Idle Clicker user data persistence.
//!
//! Everything lives in one JSON record under a single storage key. Saving
//! merges the new record over whatever is already stored, so top-level keys
//! written by other versions of the game survive a save.
//!
//! Older records missing fields load with defaults for those fields, and so
//! do fields that are `null` or of the wrong type; the rest of the record is
//! kept. Only a record that is not a JSON object is discarded.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::i18n::Language;
use crate::storage::{KeyValueStore, StorageError};

use super::achievements;
use super::catalog::Catalog;
use super::state::ClickerState;

pub const SAVE_VERSION: &str = "1.2";

/// Field deserializer: `null` or a value of the wrong type becomes the default.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        log::warn!("ignoring malformed saved field: {e}");
        T::default()
    }))
}

/// Like [`or_default`] for lists, but only malformed entries are dropped.
fn lossy_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("dropping malformed saved entry: {e}");
                None
            }
        })
        .collect())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedUpgrade {
    pub id: u32,
    pub level: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SavedSettings {
    #[serde(deserialize_with = "or_default_language")]
    pub language: String,
    #[serde(deserialize_with = "or_default")]
    pub show_extended_points: bool,
}

fn or_default_language<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let language: String = or_default(deserializer)?;
    if language.is_empty() {
        Ok(SavedSettings::default().language)
    } else {
        Ok(language)
    }
}

impl Default for SavedSettings {
    fn default() -> Self {
        Self {
            language: Language::default().code().to_string(),
            show_extended_points: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserData {
    #[serde(deserialize_with = "or_default")]
    pub version: String,
    #[serde(deserialize_with = "or_default")]
    pub points: f64,
    #[serde(deserialize_with = "lossy_vec")]
    pub upgrades: Vec<SavedUpgrade>,
    #[serde(deserialize_with = "or_default")]
    pub settings: SavedSettings,
    #[serde(deserialize_with = "lossy_vec")]
    pub achievements: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub total_clicks: u64,
    #[serde(deserialize_with = "or_default")]
    pub points_all_time: f64,
}

impl Default for UserData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION.to_string(),
            points: 0.0,
            upgrades: Vec::new(),
            settings: SavedSettings::default(),
            achievements: Vec::new(),
            total_clicks: 0,
            points_all_time: 0.0,
        }
    }
}

/// Read the stored record. Missing, unreadable or corrupt data yields the
/// defaults; this never fails.
pub fn load_user_data(store: &dyn KeyValueStore, key: &str) -> UserData {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return UserData::default(),
        Err(e) => {
            log::error!("could not read user data: {e}");
            return UserData::default();
        }
    };

    let value = match serde_json::from_str::<Value>(&raw) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) => {
            log::error!("stored user data is not an object, starting fresh");
            return UserData::default();
        }
        Err(e) => {
            log::error!("stored user data is corrupt, starting fresh: {e}");
            return UserData::default();
        }
    };

    match serde_json::from_value::<UserData>(value) {
        Ok(data) => {
            if data.version != SAVE_VERSION {
                log::info!(
                    "loading user data from version {} (current {SAVE_VERSION})",
                    data.version
                );
            }
            data
        }
        Err(e) => {
            log::error!("stored user data is corrupt, starting fresh: {e}");
            UserData::default()
        }
    }
}

/// Shallow merge: top-level keys of `update` replace those in `existing`.
/// Non-object data on either side is replaced by `update` wholesale.
pub fn merge_user_data(existing: Value, update: Value) -> Value {
    match (existing, update) {
        (Value::Object(mut base), Value::Object(patch)) => {
            for (k, v) in patch {
                base.insert(k, v);
            }
            Value::Object(base)
        }
        (_, update) => update,
    }
}

pub fn save_user_data(
    store: &dyn KeyValueStore,
    key: &str,
    data: &UserData,
) -> Result<(), StorageError> {
    let existing = match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("overwriting unparsable user data: {e}");
            Value::Null
        }),
        None => Value::Null,
    };
    let merged = merge_user_data(existing, serde_json::to_value(data)?);
    store.set(key, &serde_json::to_string(&merged)?)?;
    log::debug!("user data saved ({} points)", data.points);
    Ok(())
}

pub fn delete_user_data(store: &dyn KeyValueStore, key: &str) -> Result<(), StorageError> {
    store.remove(key)
}

/// Snapshot the persisted part of the state.
pub fn extract_user_data(state: &ClickerState) -> UserData {
    UserData {
        version: SAVE_VERSION.to_string(),
        points: state.points,
        upgrades: state
            .upgrades
            .iter()
            .map(|u| SavedUpgrade {
                id: u.id,
                level: u.level,
            })
            .collect(),
        settings: SavedSettings {
            language: state.settings.language.code().to_string(),
            show_extended_points: state.settings.show_extended_points,
        },
        achievements: state.achievements.clone(),
        total_clicks: state.total_clicks,
        points_all_time: state.points_all_time,
    }
}

fn sanitize_points(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Restore saved progress into `state`, repairing anything out of range.
pub fn apply_user_data(state: &mut ClickerState, data: &UserData, catalog: &Catalog) {
    state.points = sanitize_points(data.points);
    state.points_all_time = sanitize_points(data.points_all_time).max(state.points);
    state.total_clicks = data.total_clicks;

    state.upgrades.clear();
    for saved in &data.upgrades {
        let Some(def) = catalog.get(saved.id) else {
            log::warn!("dropping saved upgrade {}: not in catalog", saved.id);
            continue;
        };
        let level = saved.level.min(def.max_level);
        if level < saved.level {
            log::warn!(
                "clamping {} from level {} to {}",
                def.name,
                saved.level,
                level
            );
        }
        state.set_level(def.id, level);
    }

    state.settings.language = Language::from_code(&data.settings.language).unwrap_or_default();
    state.settings.show_extended_points = data.settings.show_extended_points;

    state.achievements.clear();
    for id in &data.achievements {
        if achievements::find(id).is_some() && !state.has_achievement(id) {
            state.achievements.push(id.clone());
        }
    }
}
