use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    pub id: i32,
    pub movie_id: i32,
    pub member_name: String,
    pub score: f64,
}

/// Result of a rating submission against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum RateOutcome {
    /// The score was stored; `replaced` is set when an earlier score was overwritten.
    Applied { rating: Rating, replaced: bool },
    MovieNotFound,
    /// Only the current weekly movie accepts ratings.
    Locked,
}
