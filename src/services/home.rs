//! Ordering rules for the home page history.

use std::cmp::Ordering;

use crate::api::types::MovieEntryDto;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HomeSort {
    /// Average descending, unrated movies last.
    #[default]
    Rating,
    /// Date watched descending, blank dates last.
    Date,
}

impl HomeSort {
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("date") => Self::Date,
            _ => Self::Rating,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Date => "date",
        }
    }
}

fn by_average_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort; entries that compare equal keep their store order.
pub fn sort_entries(entries: &mut [MovieEntryDto], sort: HomeSort) {
    match sort {
        HomeSort::Date => {
            entries.sort_by(|a, b| b.movie.date_watched.cmp(&a.movie.date_watched));
        }
        HomeSort::Rating => entries.sort_by(|a, b| by_average_desc(a.average, b.average)),
    }
}

/// Entry with the strictly highest average; the first one wins a tie.
#[must_use]
pub fn top_rated(entries: &[MovieEntryDto]) -> Option<(&MovieEntryDto, f64)> {
    let mut best: Option<(&MovieEntryDto, f64)> = None;

    for entry in entries {
        if let Some(average) = entry.average
            && best.is_none_or(|(_, top)| average > top)
        {
            best = Some((entry, average));
        }
    }

    best
}
