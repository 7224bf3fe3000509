//! Cookie consent preferences.
//!
//! [`ConsentStore`] owns the visitor's opt-ins for the four cookie categories
//! and writes them through to a [`StorageBackend`] on every change. The record
//! lives under a single key; each write replaces the whole record.
//!
//! The essential category is always on. No code path, including loading a
//! hand-edited record, can turn it off.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use libraryms_storage::StorageBackend;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConsentError;

/// Storage key of the preference record.
pub const STORAGE_KEY: &str = "cookie-preferences";

/// A class of cookies the visitor can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsentCategory {
    Essential,
    Analytics,
    Marketing,
    Personalization,
}

impl ConsentCategory {
    /// All categories in settings-panel order.
    pub const ALL: [Self; 4] = [
        Self::Essential,
        Self::Analytics,
        Self::Marketing,
        Self::Personalization,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Analytics => "analytics",
            Self::Marketing => "marketing",
            Self::Personalization => "personalization",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Essential => "Essential Cookies",
            Self::Analytics => "Analytics Cookies",
            Self::Marketing => "Marketing Cookies",
            Self::Personalization => "Personalization Cookies",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Essential => "Required for basic site functionality and security.",
            Self::Analytics => "Help us understand how visitors use our website.",
            Self::Marketing => "Used to deliver personalized advertisements.",
            Self::Personalization => "Customize your experience based on your preferences.",
        }
    }

    #[must_use]
    pub fn examples(self) -> &'static [&'static str] {
        match self {
            Self::Essential => &[
                "Authentication and login status",
                "Session management",
                "Security tokens",
                "Language settings",
            ],
            Self::Analytics => &[
                "Page views and interactions",
                "Popular content detection",
                "Performance tracking",
            ],
            Self::Marketing => &[
                "Ad targeting",
                "Social media integration",
                "Campaign effectiveness",
            ],
            Self::Personalization => &[
                "Theme preferences",
                "Search history",
                "Book recommendations",
            ],
        }
    }

    /// Whether the category is always on and cannot be switched off.
    #[must_use]
    pub fn is_required(self) -> bool {
        matches!(self, Self::Essential)
    }
}

impl fmt::Display for ConsentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text names no cookie category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cookie category '{0}' (expected essential, analytics, marketing or personalization)")]
pub struct UnknownCategory(pub String);

impl FromStr for ConsentCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// The visitor's opt-ins, one flag per category.
///
/// `essential` is not settable; it is always `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredPreferences")]
pub struct ConsentPreferences {
    essential: bool,
    analytics: bool,
    marketing: bool,
    personalization: bool,
}

/// On-disk shape. Missing flags take their default; `essential` is read
/// only to be discarded.
#[derive(Deserialize)]
struct StoredPreferences {
    #[serde(default)]
    analytics: bool,
    #[serde(default)]
    marketing: bool,
    #[serde(default)]
    personalization: bool,
}

impl From<StoredPreferences> for ConsentPreferences {
    fn from(stored: StoredPreferences) -> Self {
        Self {
            essential: true,
            analytics: stored.analytics,
            marketing: stored.marketing,
            personalization: stored.personalization,
        }
    }
}

impl Default for ConsentPreferences {
    fn default() -> Self {
        Self::essential_only()
    }
}

impl ConsentPreferences {
    /// Only essential cookies.
    #[must_use]
    pub const fn essential_only() -> Self {
        Self {
            essential: true,
            analytics: false,
            marketing: false,
            personalization: false,
        }
    }

    /// Every category enabled.
    #[must_use]
    pub const fn all_enabled() -> Self {
        Self {
            essential: true,
            analytics: true,
            marketing: true,
            personalization: true,
        }
    }

    #[must_use]
    pub fn get(&self, category: ConsentCategory) -> bool {
        match category {
            ConsentCategory::Essential => self.essential,
            ConsentCategory::Analytics => self.analytics,
            ConsentCategory::Marketing => self.marketing,
            ConsentCategory::Personalization => self.personalization,
        }
    }

    /// Set one optional flag. Returns `false`, leaving the record unchanged,
    /// when asked to touch the essential category.
    pub fn set(&mut self, category: ConsentCategory, value: bool) -> bool {
        match category {
            ConsentCategory::Essential => return false,
            ConsentCategory::Analytics => self.analytics = value,
            ConsentCategory::Marketing => self.marketing = value,
            ConsentCategory::Personalization => self.personalization = value,
        }
        true
    }
}

/// The consent record of one profile, plus whether the first-visit banner
/// should be showing.
pub struct ConsentStore {
    storage: Arc<dyn StorageBackend>,
    preferences: ConsentPreferences,
    show_banner: bool,
}

impl fmt::Debug for ConsentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsentStore")
            .field("preferences", &self.preferences)
            .field("show_banner", &self.show_banner)
            .finish_non_exhaustive()
    }
}

impl ConsentStore {
    /// Read the stored record.
    ///
    /// With no record the defaults are used and the banner is shown. A record
    /// that cannot be read or parsed is treated the same way; the failure is
    /// logged and never surfaced.
    pub async fn load(storage: Arc<dyn StorageBackend>) -> Self {
        let stored = match storage.get(STORAGE_KEY).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "cannot read consent record, using defaults");
                None
            }
        };

        let preferences = stored.and_then(|raw| {
            serde_json::from_str::<ConsentPreferences>(&raw)
                .map_err(|e| warn!(error = %e, "malformed consent record, using defaults"))
                .ok()
        });

        match preferences {
            Some(preferences) => Self {
                storage,
                preferences,
                show_banner: false,
            },
            None => Self {
                storage,
                preferences: ConsentPreferences::default(),
                show_banner: true,
            },
        }
    }

    #[must_use]
    pub fn preferences(&self) -> ConsentPreferences {
        self.preferences
    }

    /// Whether the first-visit banner should be displayed.
    #[must_use]
    pub fn show_banner(&self) -> bool {
        self.show_banner
    }

    /// Whether cookies of `category` may be set.
    #[must_use]
    pub fn is_allowed(&self, category: ConsentCategory) -> bool {
        self.preferences.get(category)
    }

    /// Toggle one category and persist immediately.
    ///
    /// Returns `Ok(false)` without writing anything for the essential
    /// category. The banner is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError`] if the record cannot be written.
    pub async fn set_one(
        &mut self,
        category: ConsentCategory,
        value: bool,
    ) -> Result<bool, ConsentError> {
        if !self.preferences.set(category, value) {
            debug!(%category, "ignoring change to a required cookie category");
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    /// Enable every category, persist, and dismiss the banner.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError`] if the record cannot be written.
    pub async fn accept_all(&mut self) -> Result<(), ConsentError> {
        self.preferences = ConsentPreferences::all_enabled();
        self.persist().await?;
        self.show_banner = false;
        Ok(())
    }

    /// Keep only essential cookies, persist, and dismiss the banner.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError`] if the record cannot be written.
    pub async fn reject_optional(&mut self) -> Result<(), ConsentError> {
        self.preferences = ConsentPreferences::essential_only();
        self.persist().await?;
        self.show_banner = false;
        Ok(())
    }

    /// Persist the current record as is and dismiss the banner.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError`] if the record cannot be written.
    pub async fn save(&mut self) -> Result<(), ConsentError> {
        self.persist().await?;
        self.show_banner = false;
        Ok(())
    }

    /// Clear the stored record. The defaults come back and the banner shows
    /// again, as on a first visit.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError`] if the record cannot be removed. The in-memory
    /// state is left as it was.
    pub async fn reset(&mut self) -> Result<(), ConsentError> {
        self.storage.delete(STORAGE_KEY).await?;
        self.preferences = ConsentPreferences::default();
        self.show_banner = true;
        Ok(())
    }

    async fn persist(&self) -> Result<(), ConsentError> {
        let raw = serde_json::to_string(&self.preferences).map_err(|e| {
            ConsentError::Serialize {
                reason: e.to_string(),
            }
        })?;
        self.storage.put(STORAGE_KEY, &raw).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use libraryms_storage::{MemoryBackend, StorageError};

    fn memory() -> (MemoryBackend, Arc<dyn StorageBackend>) {
        let backend = MemoryBackend::new();
        let shared: Arc<dyn StorageBackend> = Arc::new(backend.clone());
        (backend, shared)
    }

    /// Backend whose every call fails.
    struct BrokenBackend;

    #[async_trait::async_trait]
    impl StorageBackend for BrokenBackend {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Read {
                key: key.to_owned(),
                reason: "disk on fire".to_owned(),
            })
        }

        async fn put(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_owned(),
                reason: "disk on fire".to_owned(),
            })
        }

        async fn delete(&self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::Delete {
                key: key.to_owned(),
                reason: "disk on fire".to_owned(),
            })
        }
    }

    #[tokio::test]
    async fn first_load_uses_defaults_and_shows_banner() {
        let (_, storage) = memory();
        let store = ConsentStore::load(storage).await;
        assert_eq!(store.preferences(), ConsentPreferences::essential_only());
        assert!(store.show_banner());
    }

    #[tokio::test]
    async fn essential_cannot_be_disabled() {
        let (backend, storage) = memory();
        let mut store = ConsentStore::load(storage).await;

        assert!(!store.set_one(ConsentCategory::Essential, false).await.unwrap());
        assert!(store.is_allowed(ConsentCategory::Essential));
        // Nothing was written for the rejected toggle.
        assert_eq!(backend.get(STORAGE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_one_writes_through_without_dismissing_banner() {
        let (backend, storage) = memory();
        let mut store = ConsentStore::load(storage).await;

        assert!(store.set_one(ConsentCategory::Analytics, true).await.unwrap());
        assert!(store.show_banner());

        let raw = backend.get(STORAGE_KEY).await.unwrap().unwrap();
        let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            stored,
            serde_json::json!({
                "essential": true,
                "analytics": true,
                "marketing": false,
                "personalization": false,
            })
        );
    }

    #[tokio::test]
    async fn accept_all_survives_reload() {
        let (backend, storage) = memory();
        let mut store = ConsentStore::load(storage).await;
        store.accept_all().await.unwrap();
        assert!(!store.show_banner());

        let reloaded = ConsentStore::load(Arc::new(backend)).await;
        assert_eq!(reloaded.preferences(), ConsentPreferences::all_enabled());
        assert!(!reloaded.show_banner());
    }

    #[tokio::test]
    async fn reject_optional_survives_reload() {
        let (backend, storage) = memory();
        let mut store = ConsentStore::load(storage).await;
        store.accept_all().await.unwrap();
        store.reject_optional().await.unwrap();

        let reloaded = ConsentStore::load(Arc::new(backend)).await;
        for category in ConsentCategory::ALL {
            assert_eq!(reloaded.is_allowed(category), category.is_required());
        }
    }

    #[tokio::test]
    async fn every_flag_combination_round_trips() {
        for bits in 0u8..8 {
            let (backend, storage) = memory();
            let mut store = ConsentStore::load(storage).await;
            store.set_one(ConsentCategory::Analytics, bits & 1 != 0).await.unwrap();
            store.set_one(ConsentCategory::Marketing, bits & 2 != 0).await.unwrap();
            store
                .set_one(ConsentCategory::Personalization, bits & 4 != 0)
                .await
                .unwrap();
            store.save().await.unwrap();

            let reloaded = ConsentStore::load(Arc::new(backend)).await;
            assert_eq!(reloaded.preferences(), store.preferences(), "bits={bits:03b}");
        }
    }

    #[tokio::test]
    async fn save_persists_defaults_and_dismisses_banner() {
        let (backend, storage) = memory();
        let mut store = ConsentStore::load(storage).await;
        store.save().await.unwrap();
        assert!(!store.show_banner());

        let reloaded = ConsentStore::load(Arc::new(backend)).await;
        assert!(!reloaded.show_banner());
        assert_eq!(reloaded.preferences(), ConsentPreferences::essential_only());
    }

    #[tokio::test]
    async fn malformed_record_falls_back_to_defaults() {
        let (backend, storage) = memory();
        backend.put(STORAGE_KEY, "{not json").await.unwrap();

        let store = ConsentStore::load(storage).await;
        assert_eq!(store.preferences(), ConsentPreferences::default());
        assert!(store.show_banner());
    }

    #[tokio::test]
    async fn stored_essential_false_is_coerced() {
        let (backend, storage) = memory();
        backend
            .put(STORAGE_KEY, r#"{"essential":false,"marketing":true}"#)
            .await
            .unwrap();

        let store = ConsentStore::load(storage).await;
        assert!(store.is_allowed(ConsentCategory::Essential));
        assert!(store.is_allowed(ConsentCategory::Marketing));
        assert!(!store.is_allowed(ConsentCategory::Analytics));
        assert!(!store.show_banner());
    }

    #[tokio::test]
    async fn unreadable_storage_falls_back_and_write_errors_surface() {
        let mut store = ConsentStore::load(Arc::new(BrokenBackend)).await;
        assert!(store.show_banner());

        let err = store.accept_all().await.unwrap_err();
        assert!(matches!(err, ConsentError::Storage(_)));
        assert!(store.show_banner());
    }

    #[tokio::test]
    async fn reset_clears_record_and_brings_banner_back() {
        let (backend, storage) = memory();
        let mut store = ConsentStore::load(storage).await;
        store.accept_all().await.unwrap();

        store.reset().await.unwrap();
        assert!(store.show_banner());
        assert_eq!(store.preferences(), ConsentPreferences::essential_only());
        assert_eq!(backend.get(STORAGE_KEY).await.unwrap(), None);

        let reloaded = ConsentStore::load(Arc::new(backend)).await;
        assert!(reloaded.show_banner());
    }

    #[tokio::test]
    async fn failed_reset_keeps_current_choice() {
        let mut store = ConsentStore {
            storage: Arc::new(BrokenBackend),
            preferences: ConsentPreferences::all_enabled(),
            show_banner: false,
        };

        let err = store.reset().await.unwrap_err();
        assert!(matches!(err, ConsentError::Storage(StorageError::Delete { .. })));
        assert_eq!(store.preferences(), ConsentPreferences::all_enabled());
        assert!(!store.show_banner());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(
            "Marketing".parse::<ConsentCategory>(),
            Ok(ConsentCategory::Marketing)
        );
        assert!("cookies".parse::<ConsentCategory>().is_err());
    }
}
