use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// Storage key for the theme flag.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Parse a stored value; anything other than the two known strings is
    /// `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ThemePreference::Dark)
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin-scoped string storage. Writes are fire-and-forget: implementations
/// log failures instead of returning them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Process-local store, used in tests and when browser storage is
/// unavailable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// The persisted theme flag.
pub struct PreferenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored theme, or `Light` if nothing (or garbage) is stored.
    pub fn get(&self) -> ThemePreference {
        match self.store.get(THEME_KEY) {
            Some(raw) => ThemePreference::parse(&raw).unwrap_or_else(|| {
                log::warn!("Ignoring unrecognized stored theme {:?}", raw);
                ThemePreference::default()
            }),
            None => ThemePreference::default(),
        }
    }

    pub fn set(&self, value: ThemePreference) {
        self.store.set(THEME_KEY, value.as_str());
    }

    /// Flip the stored theme and return the new value.
    pub fn toggle(&self) -> ThemePreference {
        let next = self.get().toggled();
        self.set(next);
        next
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_light_when_empty() {
        let prefs = PreferenceStore::new(MemoryStore::new());
        assert_eq!(prefs.get(), ThemePreference::Light);
        assert_eq!(prefs.get(), ThemePreference::Light);
    }

    #[test]
    fn test_returns_last_set_value() {
        let prefs = PreferenceStore::new(MemoryStore::new());
        prefs.set(ThemePreference::Dark);
        assert_eq!(prefs.get(), ThemePreference::Dark);
        assert_eq!(prefs.get(), ThemePreference::Dark);
        prefs.set(ThemePreference::Light);
        assert_eq!(prefs.get(), ThemePreference::Light);
        assert_eq!(prefs.inner().get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_unrecognized_value_reads_as_light() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "sepia");
        let prefs = PreferenceStore::new(store);
        assert_eq!(prefs.get(), ThemePreference::Light);
    }

    #[test]
    fn test_toggle_flips_and_persists() {
        let prefs = PreferenceStore::new(MemoryStore::new());
        assert_eq!(prefs.toggle(), ThemePreference::Dark);
        assert_eq!(prefs.inner().get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(prefs.toggle(), ThemePreference::Light);
    }

    #[test]
    fn test_parse_roundtrip() {
        for theme in [ThemePreference::Light, ThemePreference::Dark] {
            assert_eq!(ThemePreference::parse(theme.as_str()), Some(theme));
            assert_eq!(theme.to_string(), theme.as_str());
        }
        assert_eq!(ThemePreference::parse("Dark"), None);
    }
}
