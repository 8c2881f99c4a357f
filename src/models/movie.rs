use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lifecycle status of a movie in the club.
///
/// Only `weekly` and `seen` carry meaning; any other value is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovieStatus {
    Weekly,
    Seen,
    Other(String),
}

impl MovieStatus {
    pub const WEEKLY: &'static str = "weekly";
    pub const SEEN: &'static str = "seen";

    /// Parses a raw status value. Blank input means "no status".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" => None,
            Self::WEEKLY => Some(Self::Weekly),
            Self::SEEN => Some(Self::Seen),
            other => Some(Self::Other(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Weekly => Self::WEEKLY,
            Self::Seen => Self::SEEN,
            Self::Other(value) => value,
        }
    }

    #[must_use]
    pub const fn is_weekly(&self) -> bool {
        matches!(self, Self::Weekly)
    }
}

impl fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MovieStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MovieStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("status cannot be blank"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub id: i32,
    pub tmdb_id: Option<i32>,
    pub title: String,
    pub date_watched: String,
    pub status: Option<MovieStatus>,
}

impl Movie {
    #[must_use]
    pub fn is_weekly(&self) -> bool {
        self.status.as_ref().is_some_and(MovieStatus::is_weekly)
    }

    /// Case-insensitive substring match on the title. An empty needle matches everything.
    #[must_use]
    pub fn title_contains(&self, needle: &str) -> bool {
        let needle = needle.trim();
        needle.is_empty() || self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub tmdb_id: Option<i32>,
    pub title: String,
    pub date_watched: String,
    pub status: Option<MovieStatus>,
}

impl NewMovie {
    /// A movie typed in by hand: no metadata link and no status.
    #[must_use]
    pub fn manual(title: impl Into<String>, date_watched: impl Into<String>) -> Self {
        Self {
            tmdb_id: None,
            title: title.into(),
            date_watched: date_watched.into(),
            status: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MovieSort {
    /// Insertion order (by local id).
    #[default]
    Insertion,
    DateDesc,
    DateAsc,
    Title,
}

impl MovieSort {
    /// Maps the admin `sort` parameter. Unknown values fall back to newest first.
    #[must_use]
    pub fn from_param(raw: &str) -> Self {
        match raw {
            "date_asc" => Self::DateAsc,
            "title" => Self::Title,
            _ => Self::DateDesc,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub status: Option<MovieStatus>,
    pub watched_from: Option<String>,
    pub watched_to: Option<String>,
    pub sort: MovieSort,
}

impl MovieFilter {
    #[must_use]
    pub fn with_status(status: MovieStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
