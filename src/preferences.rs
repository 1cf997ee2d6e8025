//! Durable display preferences.
//!
//! Every value is stored under its own key in eframe's per-user storage and
//! flushed as soon as it changes. Reads never fail: a missing or unreadable
//! key resolves to its default.

use eframe::egui::Pos2;
use eframe::Storage;

pub const USE_24_HOUR_KEY: &str = "use24Hour";
pub const SHOW_SECONDS_KEY: &str = "showSeconds";
pub const WINDOW_X_KEY: &str = "windowX";
pub const WINDOW_Y_KEY: &str = "windowY";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preferences {
    pub use_24_hour: bool,
    pub show_seconds: bool,
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            use_24_hour: false,
            show_seconds: true,
            window_x: None,
            window_y: None,
        }
    }
}

impl Preferences {
    /// The saved window origin, only when both coordinates are present.
    pub fn window_position(&self) -> Option<Pos2> {
        Some(Pos2::new(self.window_x?, self.window_y?))
    }
}

/// Owner of the one [`Preferences`] value of the process.
///
/// The storage handle is passed to each setter instead of being held, because
/// eframe only lends it out for the duration of a frame.
#[derive(Debug, Default)]
pub struct PreferenceStore {
    prefs: Preferences,
}

impl PreferenceStore {
    pub fn load(storage: Option<&dyn Storage>) -> Self {
        let defaults = Preferences::default();
        let Some(storage) = storage else {
            log::debug!("no preference storage, using defaults");
            return Self { prefs: defaults };
        };

        let prefs = Preferences {
            use_24_hour: eframe::get_value(storage, USE_24_HOUR_KEY)
                .unwrap_or(defaults.use_24_hour),
            show_seconds: eframe::get_value(storage, SHOW_SECONDS_KEY)
                .unwrap_or(defaults.show_seconds),
            window_x: eframe::get_value(storage, WINDOW_X_KEY),
            window_y: eframe::get_value(storage, WINDOW_Y_KEY),
        };
        log::debug!("loaded preferences: {prefs:?}");
        Self { prefs }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn set_use_24_hour(&mut self, storage: Option<&mut (dyn Storage + '_)>, value: bool) {
        self.prefs.use_24_hour = value;
        write(storage, USE_24_HOUR_KEY, &value);
    }

    pub fn set_show_seconds(&mut self, storage: Option<&mut (dyn Storage + '_)>, value: bool) {
        self.prefs.show_seconds = value;
        write(storage, SHOW_SECONDS_KEY, &value);
    }

    pub fn toggle_use_24_hour(&mut self, storage: Option<&mut (dyn Storage + '_)>) {
        let value = !self.prefs.use_24_hour;
        self.set_use_24_hour(storage, value);
    }

    pub fn toggle_show_seconds(&mut self, storage: Option<&mut (dyn Storage + '_)>) {
        let value = !self.prefs.show_seconds;
        self.set_show_seconds(storage, value);
    }

    /// Records a new window origin. X and Y are written as two independent keys.
    pub fn set_window_position(
        &mut self,
        mut storage: Option<&mut (dyn Storage + '_)>,
        origin: Pos2,
    ) {
        self.prefs.window_x = Some(origin.x);
        self.prefs.window_y = Some(origin.y);
        write(storage.as_deref_mut(), WINDOW_X_KEY, &origin.x);
        write(storage, WINDOW_Y_KEY, &origin.y);
    }
}

/// Best-effort durable write. Without storage the value only lives in memory.
fn write<T: serde::Serialize + std::fmt::Debug>(
    storage: Option<&mut (dyn Storage + '_)>,
    key: &str,
    value: &T,
) {
    match storage {
        Some(storage) => {
            eframe::set_value(storage, key, value);
            storage.flush();
            log::debug!("stored {key} = {value:?}");
        }
        None => log::debug!("dropped write of {key}: no storage"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory stand-in for eframe's file storage.
    #[derive(Default)]
    pub(crate) struct MemoryStorage {
        pub(crate) values: HashMap<String, String>,
        pub(crate) flushes: usize,
    }

    impl Storage for MemoryStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.values.insert(key.to_owned(), value);
        }

        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    #[test]
    fn first_run_uses_defaults() {
        let storage = MemoryStorage::default();
        let store = PreferenceStore::load(Some(&storage));
        assert!(!store.preferences().use_24_hour);
        assert!(store.preferences().show_seconds);
        assert_eq!(store.preferences().window_position(), None);
    }

    #[test]
    fn missing_storage_uses_defaults() {
        let store = PreferenceStore::load(None);
        assert_eq!(*store.preferences(), Preferences::default());
    }

    #[test]
    fn every_set_is_flushed_immediately() {
        let mut storage = MemoryStorage::default();
        let mut store = PreferenceStore::load(Some(&storage));

        store.set_show_seconds(Some(&mut storage), false);
        assert_eq!(storage.flushes, 1);
        store.toggle_use_24_hour(Some(&mut storage));
        assert_eq!(storage.flushes, 2);

        let reloaded = PreferenceStore::load(Some(&storage));
        assert!(reloaded.preferences().use_24_hour);
        assert!(!reloaded.preferences().show_seconds);
    }

    #[test]
    fn window_position_round_trips() {
        let mut storage = MemoryStorage::default();
        let mut store = PreferenceStore::load(Some(&storage));
        store.set_window_position(Some(&mut storage), Pos2::new(100.0, 200.0));

        let reloaded = PreferenceStore::load(Some(&storage));
        assert_eq!(
            reloaded.preferences().window_position(),
            Some(Pos2::new(100.0, 200.0))
        );
    }

    #[test]
    fn half_a_position_is_no_position() {
        let mut storage = MemoryStorage::default();
        eframe::set_value(&mut storage, WINDOW_X_KEY, &40.0f32);
        let store = PreferenceStore::load(Some(&storage));
        assert_eq!(store.preferences().window_x, Some(40.0));
        assert_eq!(store.preferences().window_position(), None);
    }

    #[test]
    fn unreadable_value_falls_back_to_default() {
        let mut storage = MemoryStorage::default();
        storage
            .values
            .insert(SHOW_SECONDS_KEY.to_owned(), "not ron at all (".to_owned());
        let store = PreferenceStore::load(Some(&storage));
        assert!(store.preferences().show_seconds);
    }

    #[test]
    fn writes_without_storage_still_update_memory() {
        let mut store = PreferenceStore::default();
        store.toggle_show_seconds(None);
        assert!(!store.preferences().show_seconds);
    }
}
