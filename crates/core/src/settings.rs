use std::collections::HashMap;

use folio_protocol::{Effect, Target, Theme};

use crate::config::{DefaultTheme, ThemeConfig};

/// Durable key/value backend for the theme preference.
///
/// Implementations swallow their own failures: a storage medium that refuses
/// writes (private browsing, quota) must not break theme switching.
pub trait ThemeStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

/// In-memory store, used by tests and when no browser storage is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.save(key, value);
        store
    }
}

impl ThemeStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

/// Process-wide visual settings: the current theme plus where it is persisted.
#[derive(Debug)]
pub struct Settings<S> {
    config: ThemeConfig,
    store: S,
    theme: Option<Theme>,
}

impl<S: ThemeStore> Settings<S> {
    pub fn new(config: ThemeConfig, store: S) -> Self {
        Self {
            config,
            store,
            theme: None,
        }
    }

    /// The theme last applied, if any.
    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decide the startup theme: a valid stored value wins, otherwise the
    /// configured default policy.
    pub fn resolve_initial(&self, prefers_dark: bool) -> Theme {
        if let Some(stored) = self
            .store
            .load(&self.config.storage_key)
            .as_deref()
            .and_then(Theme::parse)
        {
            return stored;
        }
        match self.config.default {
            DefaultTheme::Dark => Theme::Dark,
            DefaultTheme::Light => Theme::Light,
            DefaultTheme::System if prefers_dark => Theme::Dark,
            DefaultTheme::System => Theme::Light,
        }
    }

    /// Mark the root with `theme` and persist it.
    pub fn set_theme(&mut self, theme: Theme) -> Effect {
        self.theme = Some(theme);
        self.store.save(&self.config.storage_key, theme.as_str());
        log::debug!("theme -> {}", theme.as_str());
        Effect::SetAttribute {
            target: Target::Root,
            name: self.config.attribute.clone(),
            value: theme.as_str().to_owned(),
        }
    }

    /// Invert whatever the root currently says.
    pub fn toggle(&mut self, root_marker: Option<&str>) -> Effect {
        let next = Theme::from_marker(root_marker).toggled();
        self.set_theme(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(store: MemoryStore) -> Settings<MemoryStore> {
        Settings::new(ThemeConfig::default(), store)
    }

    #[test]
    fn stored_value_wins() {
        let s = settings(MemoryStore::with("theme", "light"));
        assert_eq!(s.resolve_initial(true), Theme::Light);
    }

    #[test]
    fn invalid_or_missing_value_defaults_to_dark() {
        for raw in ["", "Light", "blue", "null"] {
            let s = settings(MemoryStore::with("theme", raw));
            assert_eq!(s.resolve_initial(false), Theme::Dark, "stored {raw:?}");
        }
        assert_eq!(settings(MemoryStore::new()).resolve_initial(false), Theme::Dark);
    }

    #[test]
    fn system_policy_follows_preference() {
        let config = ThemeConfig {
            default: DefaultTheme::System,
            ..ThemeConfig::default()
        };
        let s = Settings::new(config, MemoryStore::new());
        assert_eq!(s.resolve_initial(true), Theme::Dark);
        assert_eq!(s.resolve_initial(false), Theme::Light);
    }

    #[test]
    fn set_theme_persists_and_marks_root() {
        let mut s = settings(MemoryStore::new());
        let effect = s.set_theme(Theme::Light);
        assert_eq!(
            effect,
            Effect::SetAttribute {
                target: Target::Root,
                name: "data-theme".into(),
                value: "light".into(),
            }
        );
        assert_eq!(s.store().load("theme").as_deref(), Some("light"));
        assert_eq!(s.theme(), Some(Theme::Light));
    }

    #[test]
    fn toggle_reads_unknown_marker_as_light() {
        let mut s = settings(MemoryStore::new());
        s.toggle(Some("weird"));
        assert_eq!(s.theme(), Some(Theme::Dark));
        s.toggle(Some("dark"));
        assert_eq!(s.theme(), Some(Theme::Light));
    }
}
