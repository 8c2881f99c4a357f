use super::ApiError;
use crate::domain::{MovieId, Score};
use crate::models::movie::MovieStatus;

const MAX_NAME_LEN: usize = 100;
const MAX_TITLE_LEN: usize = 300;

pub fn validate_movie_id(id: i32) -> Result<MovieId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid movie ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(MovieId::new(id))
}

pub fn validate_tmdb_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid TMDB ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

/// Parses a submitted TMDB id and checks it is positive.
pub fn parse_tmdb_id(raw: &str) -> Result<i32, ApiError> {
    let id: i32 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::validation(format!("Invalid TMDB ID: '{}'", raw.trim())))?;
    validate_tmdb_id(id)
}

pub fn validate_member_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Member name cannot be empty"));
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::validation(format!(
            "Member name must be {} characters or less",
            MAX_NAME_LEN
        )));
    }

    Ok(trimmed)
}

pub fn validate_title(title: &str) -> Result<&str, ApiError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Title cannot be empty"));
    }

    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::validation(format!(
            "Title must be {} characters or less",
            MAX_TITLE_LEN
        )));
    }

    Ok(trimmed)
}

/// Parses a submitted score. Accepts a decimal comma (`4,5`).
pub fn validate_score(raw: &str) -> Result<Score, ApiError> {
    let value: f64 = raw
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| ApiError::validation(format!("Invalid score: '{}'", raw.trim())))?;

    Score::new(value).ok_or_else(|| {
        ApiError::validation(format!(
            "Invalid score: {}. Score must be between {} and {}",
            value,
            Score::MIN,
            Score::MAX
        ))
    })
}

/// Blank means "no status"; anything else is stored as given.
pub fn validate_status(raw: &str) -> Result<Option<MovieStatus>, ApiError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::validation("Status is too long"));
    }
    Ok(MovieStatus::parse(trimmed))
}
