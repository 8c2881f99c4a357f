//! Rating arithmetic: averages, per-movie summaries and star strings.

use crate::models::rating::Rating;

const STAR_SLOTS: usize = 5;
const FULL_STAR: char = '★';
const HALF_STAR: char = '½';
const EMPTY_STAR: char = '☆';

/// Rounds to two decimals; exact ties go to the even digit (`4.125` → `4.12`).
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Mean of the scores rounded to two decimals; `None` when there are no scores.
#[must_use]
pub fn average_score<I>(scores: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0.0_f64, 0_u32), |(sum, count), score| (sum + score, count + 1));

    (count > 0).then(|| round2(sum / f64::from(count)))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: usize,
    pub highest: Option<Rating>,
    pub lowest: Option<Rating>,
}

impl RatingSummary {
    /// Highest and lowest keep the first rating encountered when scores tie.
    #[must_use]
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let mut highest: Option<&Rating> = None;
        let mut lowest: Option<&Rating> = None;

        for rating in ratings {
            if highest.is_none_or(|h| rating.score > h.score) {
                highest = Some(rating);
            }
            if lowest.is_none_or(|l| rating.score < l.score) {
                lowest = Some(rating);
            }
        }

        Self {
            average: average_score(ratings.iter().map(|r| r.score)),
            count: ratings.len(),
            highest: highest.cloned(),
            lowest: lowest.cloned(),
        }
    }
}

/// Five-glyph star string for an average, or an empty string when there is none.
///
/// Whole stars are the floor of the (clamped) average; a half star is shown
/// when the fractional part is at least 0.5.
#[must_use]
pub fn stars(average: Option<f64>) -> String {
    let Some(average) = average else {
        return String::new();
    };

    let average = if average.is_nan() {
        0.0
    } else {
        average.clamp(0.0, 5.0)
    };

    let whole = average.floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let full = whole as usize;
    let half = usize::from(full < STAR_SLOTS && average - whole >= 0.5);
    let empty = STAR_SLOTS - full - half;

    let mut out = String::with_capacity(STAR_SLOTS * 3);
    out.extend(std::iter::repeat_n(FULL_STAR, full));
    out.extend(std::iter::repeat_n(HALF_STAR, half));
    out.extend(std::iter::repeat_n(EMPTY_STAR, empty));
    out
}
