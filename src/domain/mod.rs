//! Domain primitives for the film club.
//!
//! Newtypes keep local movie ids apart from TMDB ids and keep rating scores
//! inside the range the star display understands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Local identifier of a movie row (not the TMDB id).
///
/// # Examples
///
/// ```rust
/// use filmclub::domain::MovieId;
///
/// let id = MovieId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MovieId(i32);

impl MovieId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for MovieId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<MovieId> for i32 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

/// A rating score between 0 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 5.0;

    /// Returns `None` for NaN, infinities and values outside `0..=5`.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && (Self::MIN..=Self::MAX).contains(&value)).then_some(Self(value))
    }

    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "score must be between {} and {}",
                Self::MIN,
                Self::MAX
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_id_round_trips_through_i32() {
        let id = MovieId::from(12);
        assert_eq!(i32::from(id), 12);
    }

    #[test]
    fn test_score_bounds() {
        assert!(Score::new(0.0).is_some());
        assert!(Score::new(4.5).is_some());
        assert!(Score::new(5.0).is_some());
        assert!(Score::new(5.01).is_none());
        assert!(Score::new(-0.5).is_none());
        assert!(Score::new(f64::NAN).is_none());
        assert!(Score::new(f64::INFINITY).is_none());
    }

    #[test]
    fn test_score_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Score>("3.5").is_ok());
        assert!(serde_json::from_str::<Score>("7").is_err());
    }
}
