// Contribution calendar parser.
// Reads day cells out of calendar markup and derives totals and streaks.

use std::collections::HashMap;

use chrono::NaiveDate;
use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::error::{CalendarError, Result};
use crate::github::{Calendar, ContributionDay, Streak, StreakSummary};

use super::dom::{find_all, get_node_attr, get_node_name, has_class, text_content};

/// Class carried by every day cell of the graph.
pub const DAY_CLASS: &str = "ContributionCalendar-day";

/// Tooltip text keyed by the id of the cell it describes.
///
/// Current GitHub markup keeps the count out of the cell and in a sibling
/// `<tool-tip for="contribution-day-component-X-Y">` element.
#[derive(Debug, Default)]
pub struct TooltipIndex {
    by_cell_id: HashMap<String, String>,
}

impl TooltipIndex {
    pub fn build(root: &Handle) -> Self {
        let by_cell_id = find_all(root, &|node: &Handle| get_node_name(node) == Some("tool-tip"))
            .into_iter()
            .filter_map(|tip| get_node_attr(&tip, "for").map(|id| (id, text_content(&tip))))
            .collect();
        Self { by_cell_id }
    }

    pub fn get(&self, cell_id: &str) -> Option<&str> {
        self.by_cell_id.get(cell_id).map(String::as_str)
    }
}

/// All day cells under `root`, in document order.
pub fn day_cells(root: &Handle) -> Vec<Handle> {
    find_all(root, &|node: &Handle| {
        has_class(node, DAY_CLASS) && get_node_attr(node, "data-date").is_some()
    })
}

/// Read one day cell.
pub fn read_day(cell: &Handle, tooltips: &TooltipIndex) -> Result<ContributionDay> {
    let raw_date = get_node_attr(cell, "data-date").unwrap_or_default();
    let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d")
        .map_err(|_| CalendarError::MalformedDay(raw_date.clone()))?;

    let level = get_node_attr(cell, "data-level").and_then(|v| v.trim().parse::<u8>().ok());

    let count = get_node_attr(cell, "data-count")
        .and_then(|v| v.trim().parse::<u32>().ok())
        .or_else(|| {
            get_node_attr(cell, "id")
                .and_then(|id| tooltips.get(&id).and_then(parse_count_text))
        })
        .or_else(|| parse_count_text(&text_content(cell)))
        .unwrap_or_else(|| {
            debug!(%date, "no contribution count on day cell, assuming none");
            0
        });

    Ok(ContributionDay { date, count, level })
}

/// Extract a count from text like "No contributions on ...", "1 contribution on ...",
/// or "1,024 contributions on ...".
pub fn parse_count_text(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.starts_with("No contribution") {
        return Some(0);
    }

    let digits: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Parse a calendar subtree into days (sorted by date) and their summary.
pub fn parse_calendar(root: &Handle) -> Result<Calendar> {
    let tooltips = TooltipIndex::build(root);
    let mut days = day_cells(root)
        .iter()
        .map(|cell| read_day(cell, &tooltips))
        .collect::<Result<Vec<_>>>()?;

    // Newer markup lays cells out by weekday rows, not chronologically
    days.sort_by_key(|day| day.date);
    days.dedup_by_key(|day| day.date);

    let summary = summarize(&days);
    Ok(Calendar { days, summary })
}

/// Compute totals and streaks over days sorted by date.
///
/// The current streak is the run ending on the last day of the calendar, so a
/// day without contributions at the end resets it to zero. On equal length the
/// earlier run is kept as the longest.
pub fn summarize(days: &[ContributionDay]) -> StreakSummary {
    let mut summary = StreakSummary::default();
    let mut run = Streak::default();

    for day in days {
        if day.count == 0 {
            keep_longest(&mut summary.longest_streak, &run);
            run = Streak::default();
            continue;
        }

        summary.total_contributions += u64::from(day.count);
        summary.last_contributed = Some(day.date);

        run = match run.range {
            Some((start, end)) if end.succ_opt() == Some(day.date) => Streak {
                length: run.length + 1,
                range: Some((start, day.date)),
            },
            Some(_) => {
                // Gap in the dates ends the run
                keep_longest(&mut summary.longest_streak, &run);
                Streak {
                    length: 1,
                    range: Some((day.date, day.date)),
                }
            }
            None => Streak {
                length: 1,
                range: Some((day.date, day.date)),
            },
        };
    }

    keep_longest(&mut summary.longest_streak, &run);
    summary.current_streak = run;
    summary
}

fn keep_longest(longest: &mut Streak, run: &Streak) {
    if run.length > longest.length {
        *longest = *run;
    }
}
