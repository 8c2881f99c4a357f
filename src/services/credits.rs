use std::collections::HashSet;

use crate::clients::tmdb::{CastMember, Credits, CrewMember};

pub const TOP_CAST_LIMIT: usize = 5;

const DIRECTOR_JOB: &str = "Director";

/// First crew entry whose job is `Director`, in source order.
#[must_use]
pub fn director(credits: &Credits) -> Option<&CrewMember> {
    credits
        .crew
        .iter()
        .find(|member| member.job.as_deref() == Some(DIRECTOR_JOB))
}

/// Up to `limit` cast entries with distinct, non-zero person ids.
///
/// Entries without an id are skipped, as are repeats of an id already taken.
#[must_use]
pub fn top_cast(credits: &Credits, limit: usize) -> Vec<&CastMember> {
    let mut seen = HashSet::new();

    credits
        .cast
        .iter()
        .filter(|member| match member.id {
            Some(id) if id != 0 => seen.insert(id),
            _ => false,
        })
        .take(limit)
        .collect()
}
