//! Application state container: prediction history, loading flag, current
//! error and user preferences.

use crate::error::AppError;
use crate::lotto::prediction::LottoPrediction;
use crate::storage::impl_fake::StorageFake;
use crate::storage::interface::{Storage, StorageError};
use serde::{Deserialize, Serialize};

pub const STORAGE_KEY: &str = "lottopicture-storage";
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
    pub save_history: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            language: Language::Ko,
            save_history: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
    pub save_history: Option<bool>,
}

impl PreferencesPatch {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.language.is_none() && self.save_history.is_none()
    }
}

/// What survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub predictions: Vec<LottoPrediction>,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub predictions: Vec<LottoPrediction>,
    pub is_loading: bool,
    pub error: Option<AppError>,
    pub preferences: Preferences,
}

impl AppState {
    /// Newest first, at most `HISTORY_LIMIT` entries.
    pub fn add_prediction(&mut self, prediction: LottoPrediction) {
        self.predictions.insert(0, prediction);
        self.predictions.truncate(HISTORY_LIMIT);
        self.error = None;
    }

    pub fn clear_predictions(&mut self) {
        self.predictions.clear();
        self.error = None;
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<AppError>) {
        self.error = error;
        self.is_loading = false;
    }

    pub fn update_preferences(&mut self, patch: &PreferencesPatch) {
        if let Some(theme) = patch.theme {
            self.preferences.theme = theme;
        }
        if let Some(language) = patch.language {
            self.preferences.language = language;
        }
        if let Some(save_history) = patch.save_history {
            self.preferences.save_history = save_history;
        }
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            predictions: if self.preferences.save_history {
                self.predictions.clone()
            } else {
                vec![]
            },
            preferences: self.preferences.clone(),
        }
    }

    /// Loads a snapshot. Predictions made before the snapshot arrived stay in
    /// front of the restored ones.
    pub fn restore(&mut self, persisted: PersistedState) {
        let mut predictions = std::mem::take(&mut self.predictions);
        predictions.extend(persisted.predictions);
        predictions.truncate(HISTORY_LIMIT);
        self.predictions = predictions;
        self.preferences = persisted.preferences;
    }
}

pub fn load_state(storage: &dyn Storage) -> Result<Option<PersistedState>, StorageError> {
    match storage.get_item(STORAGE_KEY)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Corrupt(e.to_string())),
        None => Ok(None),
    }
}

pub fn save_state(storage: &dyn Storage, persisted: &PersistedState) -> Result<(), StorageError> {
    let raw = serde_json::to_string(persisted).map_err(|e| StorageError::Corrupt(e.to_string()))?;
    storage.set_item(STORAGE_KEY, &raw)
}

/// In-memory store seeded with the saved state of `source`. Writes to the
/// copy never reach `source`.
pub fn in_memory_copy(source: &dyn Storage) -> Result<StorageFake, StorageError> {
    let copy = StorageFake::new();
    if let Some(persisted) = load_state(source)? {
        save_state(&copy, &persisted)?;
    }
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lotto::number_set::LottoNumberSet;
    use chrono::{Duration, TimeZone, Utc};

    fn prediction(index: i64) -> LottoPrediction {
        LottoPrediction {
            numbers: LottoNumberSet::new(vec![1, 2, 3, 4, 5, 6]).unwrap(),
            confidence: 0.5,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(index),
            image_id: Some(format!("img-{}", index)),
        }
    }

    #[test]
    fn test_add_prediction_keeps_newest_first_and_at_most_ten() {
        let mut state = AppState::default();
        for i in 0..10 {
            state.add_prediction(prediction(i));
        }
        assert_eq!(state.predictions.len(), 10);
        assert_eq!(state.predictions[0], prediction(9));
        assert_eq!(state.predictions[9], prediction(0));

        state.add_prediction(prediction(10));

        assert_eq!(state.predictions.len(), 10);
        assert_eq!(state.predictions[0], prediction(10));
        assert_eq!(state.predictions[9], prediction(1));
        assert!(!state.predictions.contains(&prediction(0)));
    }

    #[test]
    fn test_add_prediction_clears_error() {
        let mut state = AppState::default();
        state.set_error(Some(AppError::NoImage));

        state.add_prediction(prediction(0));

        assert_eq!(state.error, None);
    }

    #[test]
    fn test_set_error_stops_loading() {
        let mut state = AppState::default();
        state.set_loading(true);
        assert!(state.is_loading);

        state.set_error(Some(AppError::InferenceFailed("bad tensor".to_string())));

        assert!(!state.is_loading);
        assert!(matches!(state.error, Some(AppError::InferenceFailed(_))));
    }

    #[test]
    fn test_clear_predictions() {
        let mut state = AppState::default();
        state.add_prediction(prediction(0));
        state.set_error(Some(AppError::NoImage));

        state.clear_predictions();

        assert!(state.predictions.is_empty());
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_update_preferences_merges() {
        let mut state = AppState::default();

        state.update_preferences(&PreferencesPatch {
            theme: Some(Theme::Dark),
            ..PreferencesPatch::default()
        });
        state.update_preferences(&PreferencesPatch {
            language: Some(Language::En),
            ..PreferencesPatch::default()
        });

        assert_eq!(
            state.preferences,
            Preferences {
                theme: Theme::Dark,
                language: Language::En,
                save_history: true,
            }
        );
    }

    #[test]
    fn test_persisted_drops_history_when_disabled() {
        let mut state = AppState::default();
        state.add_prediction(prediction(0));
        state.update_preferences(&PreferencesPatch {
            save_history: Some(false),
            ..PreferencesPatch::default()
        });

        let persisted = state.persisted();

        assert!(persisted.predictions.is_empty());
        assert!(!persisted.preferences.save_history);
        assert_eq!(state.predictions.len(), 1);
    }

    #[test]
    fn test_persisted_json_schema() {
        let mut state = AppState::default();
        state.add_prediction(prediction(0));

        let json = serde_json::to_value(state.persisted()).unwrap();

        assert_eq!(json["preferences"]["theme"], "system");
        assert_eq!(json["preferences"]["language"], "ko");
        assert_eq!(json["preferences"]["saveHistory"], true);
        assert_eq!(json["predictions"][0]["numbers"], serde_json::json!([1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn test_save_then_load() {
        let storage = StorageFake::new();
        assert_eq!(load_state(&storage).unwrap(), None);

        let mut state = AppState::default();
        state.add_prediction(prediction(3));
        save_state(&storage, &state.persisted()).unwrap();

        let loaded = load_state(&storage).unwrap().unwrap();
        let mut restored = AppState::default();
        restored.restore(loaded);

        assert_eq!(restored.predictions, state.predictions);
        assert_eq!(restored.preferences, state.preferences);
    }

    #[test]
    fn test_restore_truncates() {
        let mut state = AppState::default();
        state.restore(PersistedState {
            predictions: (0..15).map(prediction).collect(),
            preferences: Preferences::default(),
        });

        assert_eq!(state.predictions.len(), HISTORY_LIMIT);
        assert_eq!(state.predictions[0], prediction(0));
    }

    #[test]
    fn test_restore_keeps_session_predictions_in_front() {
        let mut state = AppState::default();
        state.add_prediction(prediction(100));

        state.restore(PersistedState {
            predictions: (0..10).map(prediction).collect(),
            preferences: Preferences::default(),
        });

        assert_eq!(state.predictions.len(), HISTORY_LIMIT);
        assert_eq!(state.predictions[0], prediction(100));
        assert_eq!(state.predictions[1], prediction(0));
    }

    #[test]
    fn test_corrupt_state() {
        let storage = StorageFake::new();
        storage.set_item(STORAGE_KEY, "{not json").unwrap();
        assert!(matches!(load_state(&storage), Err(StorageError::Corrupt(_))));

        storage
            .set_item(STORAGE_KEY, r#"{"predictions":[{"numbers":[1,1,2,3,4,5],"confidence":0.1,"timestamp":"2024-01-01T00:00:00Z"}]}"#)
            .unwrap();
        assert!(matches!(load_state(&storage), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_in_memory_copy_keeps_preferences_and_isolates_writes() {
        let source = StorageFake::new();
        let stored = PersistedState {
            predictions: vec![prediction(1)],
            preferences: Preferences {
                language: Language::En,
                ..Preferences::default()
            },
        };
        save_state(&source, &stored).unwrap();

        let copy = in_memory_copy(&source).unwrap();
        assert_eq!(load_state(&copy).unwrap(), Some(stored.clone()));

        save_state(&copy, &PersistedState::default()).unwrap();
        assert_eq!(load_state(&source).unwrap(), Some(stored));
    }

    #[test]
    fn test_in_memory_copy_of_empty_storage() {
        let copy = in_memory_copy(&StorageFake::new()).unwrap();
        assert_eq!(load_state(&copy).unwrap(), None);

        let source = StorageFake::new();
        source.set_item(STORAGE_KEY, "{not json").unwrap();
        assert!(matches!(in_memory_copy(&source), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let storage = StorageFake::new();
        storage.set_item(STORAGE_KEY, "{}").unwrap();

        let loaded = load_state(&storage).unwrap().unwrap();

        assert!(loaded.predictions.is_empty());
        assert_eq!(loaded.preferences, Preferences::default());
    }
}
