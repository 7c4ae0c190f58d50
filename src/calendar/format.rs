// Text formatting for calendar summaries and tooltips.
// Date patterns, pluralization, and streak range descriptions.

use chrono::{Days, Months, NaiveDate};

use crate::github::Streak;

/// "Mon D, YYYY", e.g. "Jan 5, 2024".
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "Month D", e.g. "January 5".
pub fn format_month_day(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

/// "1 day" or "N days".
pub fn day_count(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// "No contributions", "1 contribution" or "N contributions".
pub fn contribution_count(count: u32) -> String {
    match count {
        0 => "No contributions".to_string(),
        1 => "1 contribution".to_string(),
        n => format!("{} contributions", n),
    }
}

/// Date range covered by "the last year" ending on `today`.
pub fn last_year_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_months(Months::new(12))
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .unwrap_or(today);
    (start, today)
}

/// Description line under a streak: its range, or a fallback when there is none.
pub fn streak_info(streak: &Streak, last_contributed: Option<NaiveDate>) -> String {
    match (streak.range, last_contributed) {
        (Some((start, end)), _) if !streak.is_empty() => format!(
            "{} &ndash; {}",
            format_month_day(start),
            format_month_day(end)
        ),
        (_, Some(last)) => format!("Last contributed in {}.", format_month_day(last)),
        _ => "No contributions recorded.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(format_short_date(date(2024, 1, 5)), "Jan 5, 2024");
        assert_eq!(format_month_day(date(2024, 9, 21)), "September 21");
    }

    #[test]
    fn test_day_count() {
        assert_eq!(day_count(0), "0 days");
        assert_eq!(day_count(1), "1 day");
        assert_eq!(day_count(2), "2 days");
    }

    #[test]
    fn test_contribution_count() {
        assert_eq!(contribution_count(0), "No contributions");
        assert_eq!(contribution_count(1), "1 contribution");
        assert_eq!(contribution_count(17), "17 contributions");
    }

    #[test]
    fn test_last_year_range() {
        assert_eq!(
            last_year_range(date(2024, 6, 15)),
            (date(2023, 6, 16), date(2024, 6, 15))
        );
        // Leap day clamps to the end of February
        assert_eq!(
            last_year_range(date(2024, 2, 29)),
            (date(2023, 3, 1), date(2024, 2, 29))
        );
    }

    #[test]
    fn test_streak_info() {
        let streak = Streak {
            length: 3,
            range: Some((date(2024, 5, 1), date(2024, 5, 3))),
        };
        assert_eq!(
            streak_info(&streak, Some(date(2024, 5, 3))),
            "May 1 &ndash; May 3"
        );

        let empty = Streak::default();
        assert_eq!(
            streak_info(&empty, Some(date(2024, 4, 9))),
            "Last contributed in April 9."
        );
        assert_eq!(streak_info(&empty, None), "No contributions recorded.");
    }
}
