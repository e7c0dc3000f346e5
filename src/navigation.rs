//! Host navigation seam.
//!
//! The session controller needs four things from its host: the URL the page was
//! entered with, a history-replacing rewrite of that URL (so handled OAuth
//! callback parameters are not replayed on reload), a full top-level navigation
//! (leaving the application for the OAuth provider), and a full reload
//! (discarding all in-memory state on logout). A browser shell maps these onto
//! `window.location`/`window.history`; the CLI and tests use the in-memory
//! implementation below.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use url::Url;

pub trait Navigator: Send + Sync {
    /// URL the application was entered with
    fn current_url(&self) -> Url;

    /// Replace the visible URL without adding a history entry
    fn replace_url(&self, url: &Url);

    /// Top-level navigation away from the application
    fn navigate(&self, url: &str);

    /// Full page reload
    fn reload(&self);
}

/// Strip the query string (and fragment) from a URL, keeping the path
pub fn scrubbed(url: &Url) -> Url {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.set_fragment(None);
    clean
}

/// In-memory navigator that records navigations and reloads
#[derive(Debug)]
pub struct MemoryNavigator {
    current: Mutex<Url>,
    navigations: Mutex<Vec<String>>,
    reloads: AtomicUsize,
}

impl MemoryNavigator {
    pub fn new(entry_url: Url) -> Self {
        Self {
            current: Mutex::new(entry_url),
            navigations: Mutex::new(Vec::new()),
            reloads: AtomicUsize::new(0),
        }
    }

    /// Convenience constructor from a string, for shells that read the entry
    /// URL from arguments or environment
    pub fn parse(entry_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(entry_url)?))
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl Navigator for MemoryNavigator {
    fn current_url(&self) -> Url {
        self.current.lock().unwrap().clone()
    }

    fn replace_url(&self, url: &Url) {
        *self.current.lock().unwrap() = url.clone();
    }

    fn navigate(&self, url: &str) {
        self.navigations.lock().unwrap().push(url.to_string());
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrubbed_removes_query_and_fragment() {
        let url = Url::parse("https://insight.example/?auth=success#top").unwrap();
        let clean = scrubbed(&url);
        assert_eq!(clean.as_str(), "https://insight.example/");
        assert!(clean.query().is_none());
    }

    #[test]
    fn test_memory_navigator_records_actions() {
        let nav = MemoryNavigator::parse("https://insight.example/?auth=success").unwrap();
        assert_eq!(nav.current_url().query(), Some("auth=success"));

        nav.replace_url(&scrubbed(&nav.current_url()));
        assert_eq!(nav.current_url().query(), None);

        nav.navigate("https://accounts.google.com/o/oauth2/auth");
        nav.reload();
        assert_eq!(nav.navigations().len(), 1);
        assert_eq!(nav.reload_count(), 1);
    }
}
