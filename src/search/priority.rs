//! Frontier priority model for the bidirectional search.
//!
//! Queue order combines the accumulated distance with a birth-year-gap
//! heuristic: people born close in time to the opposite endpoint are likely
//! closer in the family graph, so among entries of equal distance they are
//! explored first. The heuristic is a tie-breaking signal only; correctness
//! rests on the Dijkstra distances.

use std::cmp::Ordering;

use crate::model::PersonId;

/// How close a birth year must be to count as "relevant" for the heuristic.
pub const BIRTH_YEAR_PROXIMITY_THRESHOLD: i64 = 500;
/// Scale applied to a relevant birth-year gap before it nudges the priority.
pub const BIRTH_YEAR_HEURISTIC_FACTOR: f64 = 25.0;
/// Sentinel gap for entries with no recorded birth year.
pub const NO_BIRTH_YEAR_PENALTY: i64 = 9999;
/// Sentinel gap for entries with a birth year when the anchor year is
/// unknown; smaller than the penalty so entries with data sort first.
pub const HAS_BIRTH_YEAR_BONUS: i64 = 5000;

/// One pending expansion in a search frontier.
///
/// Extraction order is ascending `(adjusted_distance, birth_year_gap,
/// person)`. The composite key is total over all entries (the float
/// component is compared with `total_cmp`), so identical inputs always
/// replay identically.
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    pub distance: u32,
    pub person: PersonId,
    pub path: Vec<PersonId>,
    birth_year_gap: i64,
    adjusted_distance: f64,
}

impl FrontierEntry {
    /// Build an entry, computing the heuristic fields once.
    ///
    /// `birth_year` is this person's own recorded year; `anchor_birth_year`
    /// is the opposite endpoint's.
    pub fn new(
        distance: u32,
        person: PersonId,
        path: Vec<PersonId>,
        birth_year: Option<i32>,
        anchor_birth_year: Option<i32>,
    ) -> Self {
        let birth_year_gap = match (birth_year, anchor_birth_year) {
            (Some(by), Some(anchor)) => i64::from(by).abs_diff(i64::from(anchor)) as i64,
            (Some(_), None) => HAS_BIRTH_YEAR_BONUS,
            (None, _) => NO_BIRTH_YEAR_PENALTY,
        };

        let mut adjusted_distance = f64::from(distance);
        if birth_year_gap < BIRTH_YEAR_PROXIMITY_THRESHOLD {
            adjusted_distance += birth_year_gap as f64 / BIRTH_YEAR_HEURISTIC_FACTOR;
        }

        Self {
            distance,
            person,
            path,
            birth_year_gap,
            adjusted_distance,
        }
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.adjusted_distance
            .total_cmp(&other.adjusted_distance)
            .then_with(|| self.birth_year_gap.cmp(&other.birth_year_gap))
            .then_with(|| self.person.cmp(&other.person))
    }
}
