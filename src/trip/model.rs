//! Itinerary data model — the structured result of the planning phase.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::TripError;

/// One day of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based day number. Not required to be contiguous.
    pub day: NonZeroU32,
    /// Activities in the order they should be shown.
    pub activities: Vec<String>,
}

/// A multi-day travel plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Days in itinerary order (as received).
    pub days: Vec<DayPlan>,
    /// Free-form display string, e.g. "$500" or "about 1200 EUR".
    pub estimated_cost: String,
}

impl Itinerary {
    /// Parse the JSON-encoded itinerary carried in the `plan` field of a
    /// planning response.
    pub fn from_plan_json(raw: &str) -> Result<Self, TripError> {
        serde_json::from_str(raw).map_err(|e| TripError::plan_parse(e.to_string()))
    }

    /// Day numbers that appear more than once, in ascending order.
    ///
    /// Duplicates are accepted as-is; this only exists so callers can flag them.
    pub fn duplicate_days(&self) -> Vec<NonZeroU32> {
        let mut seen = BTreeSet::new();
        let mut dupes = BTreeSet::new();
        for day in &self.days {
            if !seen.insert(day.day) {
                dupes.insert(day.day);
            }
        }
        dupes.into_iter().collect()
    }

    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|d| d.activities.len()).sum()
    }
}
