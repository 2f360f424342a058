//! Credentials for the generation provider and the record store.
//!
//! Seeded from the environment at startup, overridable at runtime through
//! [`CredentialRegistry::set`]. Each operation works on a snapshot taken when
//! it starts, so a concurrent override never changes an in-flight request.

use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub google_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl Credentials {
    /// Reads `GOOGLE_API_KEY`, `SUPABASE_URL` and `SUPABASE_KEY`. Blank values
    /// count as unset.
    pub fn from_env() -> Self {
        Self {
            google_api_key: non_blank(std::env::var("GOOGLE_API_KEY").ok()),
            supabase_url: non_blank(std::env::var("SUPABASE_URL").ok()),
            supabase_key: non_blank(std::env::var("SUPABASE_KEY").ok()),
        }
    }

    /// The generation key is always replaced; store fields only when given.
    pub fn set_api_keys(
        &mut self,
        google_api_key: &str,
        supabase_url: Option<&str>,
        supabase_key: Option<&str>,
    ) {
        self.google_api_key = non_blank(Some(google_api_key.to_string()));
        if let Some(url) = non_blank(supabase_url.map(str::to_string)) {
            self.supabase_url = Some(url);
        }
        if let Some(key) = non_blank(supabase_key.map(str::to_string)) {
            self.supabase_key = Some(key);
        }
    }

    pub fn has_generation(&self) -> bool {
        self.google_api_key.is_some()
    }

    /// Store writes need both the URL and the key.
    pub fn has_store(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_key.is_some()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("google_api_key", &redact(&self.google_api_key))
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &redact(&self.supabase_key))
            .finish()
    }
}

/// Shared handle to the current credentials.
#[derive(Clone, Default)]
pub struct CredentialRegistry {
    inner: Arc<RwLock<Credentials>>,
}

impl CredentialRegistry {
    pub fn new(initial: Credentials) -> Self {
        Self { inner: Arc::new(RwLock::new(initial)) }
    }

    pub fn snapshot(&self) -> Credentials {
        self.inner.read().clone()
    }

    pub fn set(&self, google_api_key: &str, supabase_url: Option<&str>, supabase_key: Option<&str>) {
        self.inner
            .write()
            .set_api_keys(google_api_key, supabase_url, supabase_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setter_keeps_store_fields_when_omitted() {
        let mut c = Credentials {
            google_api_key: Some("old".into()),
            supabase_url: Some("https://x.supabase.co".into()),
            supabase_key: Some("anon".into()),
        };
        c.set_api_keys("new", None, Some(""));
        assert_eq!(c.google_api_key.as_deref(), Some("new"));
        assert_eq!(c.supabase_url.as_deref(), Some("https://x.supabase.co"));
        assert_eq!(c.supabase_key.as_deref(), Some("anon"));
    }

    #[test]
    fn store_needs_both_fields() {
        let mut c = Credentials::default();
        assert!(!c.has_store());
        c.set_api_keys("k", Some("https://x.supabase.co"), None);
        assert!(c.has_generation());
        assert!(!c.has_store());
        c.set_api_keys("k", None, Some("anon"));
        assert!(c.has_store());
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut c = Credentials::default();
        c.set_api_keys("secret-key", None, Some("secret-anon"));
        let out = format!("{c:?}");
        assert!(!out.contains("secret"));
    }

    #[test]
    fn snapshot_is_detached() {
        let reg = CredentialRegistry::default();
        let before = reg.snapshot();
        reg.set("k", None, None);
        assert!(!before.has_generation());
        assert!(reg.snapshot().has_generation());
    }
}
