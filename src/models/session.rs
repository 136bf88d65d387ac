use serde::{Deserialize, Serialize};

/// Per-session browsing state owned by the presentation layer
///
/// Holds the titles the user asked recommendations for and the titles they
/// saved for later. Lives only as long as the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    /// Queried titles, oldest first
    pub history: Vec<String>,
    /// Saved titles in insertion order
    pub watchlist: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a title the user asked recommendations for
    pub fn record_query(&mut self, title: &str) {
        self.history.push(title.to_string());
    }

    /// Adds a title to the watchlist; returns false if it was already there
    pub fn add_to_watchlist(&mut self, title: &str) -> bool {
        if self.watchlist.iter().any(|t| t == title) {
            return false;
        }
        self.watchlist.push(title.to_string());
        true
    }

    /// Removes a title from the watchlist; returns false if it was not there
    pub fn remove_from_watchlist(&mut self, title: &str) -> bool {
        let before = self.watchlist.len();
        self.watchlist.retain(|t| t != title);
        self.watchlist.len() != before
    }
}
