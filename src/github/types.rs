// Contribution calendar data types.
// Structured form of a parsed calendar and its derived streak statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single day cell of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
    /// Intensity bucket (0-4) as rendered by GitHub, when present.
    pub level: Option<u8>,
}

/// A run of consecutive days with contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    /// Number of days in the run.
    pub length: u32,
    /// First and last day of the run. None for an empty streak.
    pub range: Option<(NaiveDate, NaiveDate)>,
}

impl Streak {
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Totals and streaks derived from one calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakSummary {
    pub total_contributions: u64,
    pub current_streak: Streak,
    pub longest_streak: Streak,
    pub last_contributed: Option<NaiveDate>,
}

/// A parsed calendar: days in date order plus the summary over them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Calendar {
    pub days: Vec<ContributionDay>,
    pub summary: StreakSummary,
}
