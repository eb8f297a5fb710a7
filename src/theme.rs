//! Light/dark theme toggle

use crate::{constants::THEME_PREFERENCE_KEY, prefs::PreferenceStore, types::Theme};
use std::sync::Arc;

/// Current theme plus where it is persisted
pub struct ThemeToggle {
    theme: Theme,
    store: Arc<dyn PreferenceStore>,
}

impl ThemeToggle {
    /// Reads the persisted preference once
    ///
    /// A missing, unreadable or unrecognised value leaves the default (light).
    pub fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let theme = match store.get(THEME_PREFERENCE_KEY) {
            Ok(Some(value)) => Theme::parse(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "Unknown theme preference, using default");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read theme preference");
                Theme::default()
            }
        };

        Self { theme, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Label for the control: the action a toggle would take next
    pub fn label(&self) -> &'static str {
        match self.theme {
            Theme::Light => "Dark Mode",
            Theme::Dark => "Light Mode",
        }
    }

    /// Flips the theme and persists it
    ///
    /// A failed write is logged; the visual state still flips.
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();

        if let Err(e) = self.store.set(THEME_PREFERENCE_KEY, self.theme.as_str()) {
            tracing::warn!(error = %e, theme = %self.theme, "Failed to persist theme preference");
        }

        tracing::info!(theme = %self.theme, "Theme toggled");
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreferenceError;
    use crate::prefs::MemoryPreferenceStore;

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, PreferenceError> {
            Err(PreferenceError::NoConfigDir)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), PreferenceError> {
            Err(PreferenceError::NoConfigDir)
        }
    }

    #[test]
    fn test_default_is_light() {
        let toggle = ThemeToggle::load(Arc::new(MemoryPreferenceStore::new()));
        assert_eq!(toggle.theme(), Theme::Light);
        assert_eq!(toggle.label(), "Dark Mode");
    }

    #[test]
    fn test_loads_persisted_dark() {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set(THEME_PREFERENCE_KEY, "dark").unwrap();

        let toggle = ThemeToggle::load(store);
        assert_eq!(toggle.theme(), Theme::Dark);
        assert_eq!(toggle.label(), "Light Mode");
    }

    #[test]
    fn test_toggle_twice_restores_state_and_value() {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set(THEME_PREFERENCE_KEY, "light").unwrap();
        let mut toggle = ThemeToggle::load(store.clone());

        assert_eq!(toggle.toggle(), Theme::Dark);
        assert_eq!(
            store.get(THEME_PREFERENCE_KEY).unwrap().as_deref(),
            Some("dark")
        );

        assert_eq!(toggle.toggle(), Theme::Light);
        assert_eq!(toggle.theme(), Theme::Light);
        assert_eq!(
            store.get(THEME_PREFERENCE_KEY).unwrap().as_deref(),
            Some("light")
        );
    }

    #[test]
    fn test_unknown_value_falls_back_to_light() {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set(THEME_PREFERENCE_KEY, "solarized").unwrap();
        assert_eq!(ThemeToggle::load(store).theme(), Theme::Light);
    }

    #[test]
    fn test_broken_store_still_toggles() {
        let mut toggle = ThemeToggle::load(Arc::new(BrokenStore));
        assert_eq!(toggle.theme(), Theme::Light);
        assert_eq!(toggle.toggle(), Theme::Dark);
    }
}
