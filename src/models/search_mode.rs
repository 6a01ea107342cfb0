//! Retrieval mode for the analyze query.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// How the analyze query scopes its candidate documents.
///
/// The wire form is the uppercase string. Unknown strings deserialize
/// to the [`SearchMode::NotFound`] sentinel, which the query builder
/// treats exactly like [`SearchMode::All`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Message similarity across the whole project, launch name as a
    /// should-boost.
    #[default]
    All,
    /// Hard filter to documents from the same launch name.
    LaunchName,
    /// Hard filter to the same launch id, with a relaxed doc-frequency
    /// floor.
    CurrentLaunch,
    /// Sentinel for unknown wire values.
    NotFound,
}

impl SearchMode {
    pub fn as_wire(&self) -> &'static str {
        match self {
            SearchMode::All => "ALL",
            SearchMode::LaunchName => "LAUNCH_NAME",
            SearchMode::CurrentLaunch => "CURRENT_LAUNCH",
            SearchMode::NotFound => "NOT_FOUND",
        }
    }

    pub fn from_wire(value: &str) -> Self {
        match value {
            "ALL" => SearchMode::All,
            "LAUNCH_NAME" => SearchMode::LaunchName,
            "CURRENT_LAUNCH" => SearchMode::CurrentLaunch,
            _ => SearchMode::NotFound,
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for SearchMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for SearchMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(SearchMode::from_wire(&value))
    }
}
