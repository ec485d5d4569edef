use folio_core::ThemeStore;
use web_sys::{Storage, Window};

/// `window.localStorage`, or nothing when the browser refuses access.
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new(window: &Window) -> Self {
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            log::warn!("localStorage unavailable, theme choice will not persist");
        }
        Self { storage }
    }
}

impl ThemeStore for LocalStore {
    fn load(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn save(&mut self, key: &str, value: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        if storage.set_item(key, value).is_err() {
            log::warn!("could not persist {key}={value}");
        }
    }
}
