// Calendar rendering.
// Turns a raw contributions page into the markup placed in the container.

use chrono::NaiveDate;
use markup5ever_rcdom::Handle;

use crate::error::Result;
use crate::github::StreakSummary;

use super::config::LoaderConfig;
use super::dom::{
    append_child, detach, find_all, find_first, get_node_attr, get_node_name, get_parent_node,
    has_ancestor, has_class, inner_html, parse_fragment_nodes, parse_html, replace_children_with_html,
    set_node_attr, text_content,
};
use super::format::{
    contribution_count, day_count, format_short_date, last_year_range, streak_info,
};
use super::parser::{TooltipIndex, day_cells, parse_calendar, read_day};

/// Class marking the calendar subtree in the contributions page.
pub const CALENDAR_CLASS: &str = "js-yearly-contributions";

const PROMO_LINK_TEXT: &str = "View your contributions in 3D, VR and IRL!";

/// Hover behaviour for labelled day cells: show the shared tooltip above the cell.
///
/// Browsers do not execute `<script>` elements inserted through `innerHTML`, so
/// a host that injects the rendered markup must run this script itself after
/// the insert. It wires every `.day-tooltip` on the page and skips calendars
/// it has already wired, so running it again is harmless.
pub const TOOLTIP_SCRIPT: &str = r#"(function () {
  document.querySelectorAll(".day-tooltip").forEach(function (tooltip) {
    var root = tooltip.parentElement;
    if (!root || root.hasAttribute("data-tooltips-wired")) return;
    root.setAttribute("data-tooltips-wired", "");
    root.querySelectorAll("[data-tooltip]").forEach(function (day) {
      day.addEventListener("mouseenter", function () {
        tooltip.innerHTML = day.getAttribute("data-tooltip");
        tooltip.classList.add("is-visible");
        var size = day.getBoundingClientRect();
        tooltip.style.top = (size.bottom + window.pageYOffset - tooltip.offsetHeight - 2 * size.height) + "px";
        tooltip.style.left = (size.left + window.pageXOffset - tooltip.offsetWidth / 2 + size.width / 2) + "px";
      });
      day.addEventListener("mouseleave", function () {
        tooltip.classList.remove("is-visible");
      });
    });
  });
})();"#;

/// Markup ready for the container plus the numbers behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCalendar {
    pub html: String,
    pub summary: StreakSummary,
}

/// Render a raw contributions page.
///
/// Returns `Ok(None)` when the page has no calendar subtree, which callers
/// treat as transient.
pub fn render_calendar(
    raw: &str,
    username: &str,
    config: &LoaderConfig,
    today: NaiveDate,
) -> Result<Option<RenderedCalendar>> {
    let dom = parse_html(raw);
    let Some(cal) = find_first(&dom.document, &|node: &Handle| has_class(node, CALENDAR_CLASS))
    else {
        return Ok(None);
    };

    strip_page_chrome(&cal);

    if config.responsive {
        make_responsive(&cal);
    }

    set_summary_text(&cal, &config.summary_text_for(username));

    let calendar = parse_calendar(&cal)?;

    if config.global_stats {
        for node in parse_fragment_nodes(&summary_columns(&calendar.summary, today)) {
            append_child(&cal, node);
        }
    }

    if config.tooltips {
        add_tooltips(&cal)?;
    }

    Ok(Some(RenderedCalendar {
        html: inner_html(&cal)?,
        summary: calendar.summary,
    }))
}

/// Remove the heading and promotional link that only make sense on github.com.
pub fn strip_page_chrome(cal: &Handle) {
    let heading = find_first(cal, &|node: &Handle| {
        get_node_name(node) == Some("h2")
            && has_ancestor(node, &|parent: &Handle| has_class(parent, "position-relative"))
    });
    if let Some(heading) = heading {
        detach(&heading);
    }

    let promo_links = find_all(cal, &|node: &Handle| {
        get_node_name(node) == Some("a") && text_content(node).contains(PROMO_LINK_TEXT)
    });
    for link in promo_links {
        if let Some(parent) = get_parent_node(&link) {
            detach(&parent);
        }
    }
}

/// Swap the graph's fixed pixel size for a viewBox so it stretches to the container width.
pub fn make_responsive(cal: &Handle) {
    let graph = find_first(cal, &|node: &Handle| {
        (get_node_name(node) == Some("svg") && has_class(node, "js-calendar-graph-svg"))
            || (get_node_name(node) == Some("table") && has_class(node, "js-calendar-graph-table"))
    });
    let Some(graph) = graph else {
        return;
    };

    let width = get_node_attr(&graph, "width").unwrap_or_default();
    let height = get_node_attr(&graph, "height").unwrap_or_default();
    set_node_attr(&graph, "height", None);
    set_node_attr(&graph, "width", Some("100%"));
    let view_box = format!("0 0 {} {}", width, height);
    set_node_attr(&graph, "viewBox", Some(view_box.as_str()));
}

/// Put the footer text under the graph, when the page has a footer slot for it.
pub fn set_summary_text(cal: &Handle, text: &str) {
    let slot = find_first(cal, &|node: &Handle| has_class(node, "contrib-footer"))
        .and_then(|footer| find_first(&footer, &|node: &Handle| has_class(node, "float-left")));
    if let Some(slot) = slot {
        replace_children_with_html(&slot, text);
    }
}

/// The three statistic columns: total, longest streak, current streak.
pub fn summary_columns(summary: &StreakSummary, today: NaiveDate) -> String {
    let (year_start, year_end) = last_year_range(today);

    let first = column(
        "contrib-column contrib-column-first table-column",
        "Contributions in the last year",
        &format!("{} total", summary.total_contributions),
        &format!(
            "{} &ndash; {}",
            format_short_date(year_start),
            format_short_date(year_end)
        ),
    );
    let second = column(
        "contrib-column table-column",
        "Longest streak",
        &day_count(summary.longest_streak.length),
        &streak_info(&summary.longest_streak, summary.last_contributed),
    );
    let third = column(
        "contrib-column table-column",
        "Current streak",
        &day_count(summary.current_streak.length),
        &streak_info(&summary.current_streak, summary.last_contributed),
    );

    format!("{}{}{}", first, second, third)
}

fn column(class: &str, title: &str, number: &str, info: &str) -> String {
    format!(
        "<div class=\"{}\"><span class=\"text-muted\">{}</span>\
         <span class=\"contrib-number\">{}</span>\
         <span class=\"text-muted\">{}</span></div>",
        class, title, number, info
    )
}

/// Label every day cell with its tooltip text and attach the shared tooltip and hover script.
pub fn add_tooltips(cal: &Handle) -> Result<()> {
    let tooltips = TooltipIndex::build(cal);
    for cell in day_cells(cal) {
        let day = read_day(&cell, &tooltips)?;
        let label = format!(
            "<strong>{}</strong> on {}",
            contribution_count(day.count),
            format_short_date(day.date)
        );
        set_node_attr(&cell, "data-tooltip", Some(label.as_str()));
    }

    let markup = format!(
        "<div class=\"day-tooltip\"></div><script>{}</script>",
        TOOLTIP_SCRIPT
    );
    for node in parse_fragment_nodes(&markup) {
        append_child(cal, node);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Streak;

    const PAGE: &str = r#"
        <div class="js-yearly-contributions">
          <div class="position-relative">
            <h2 class="f4 text-normal mb-2">2 contributions in the last year</h2>
            <div class="js-calendar-graph">
              <table class="ContributionCalendar-grid js-calendar-graph-table" width="722" height="112">
                <tr>
                  <td class="ContributionCalendar-day" data-date="2024-06-14" id="c-0" data-level="1"></td>
                  <td class="ContributionCalendar-day" data-date="2024-06-15" id="c-1" data-level="1"></td>
                </tr>
              </table>
              <tool-tip for="c-0">1 contribution on June 14th.</tool-tip>
              <tool-tip for="c-1">1 contribution on June 15th.</tool-tip>
            </div>
            <div class="contrib-footer"><div class="float-left">Learn how we count contributions</div></div>
          </div>
          <div class="promo"><a href="https://skyline.github.com">View your contributions in 3D, VR and IRL!</a></div>
        </div>
    "#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_calendar_is_none() {
        let rendered =
            render_calendar("<p>rate limited</p>", "alice", &LoaderConfig::new(), date(2024, 6, 15))
                .unwrap();
        assert!(rendered.is_none());
    }

    #[test]
    fn test_render_strips_chrome_and_adds_columns() {
        let rendered = render_calendar(PAGE, "alice", &LoaderConfig::new(), date(2024, 6, 15))
            .unwrap()
            .unwrap();

        assert!(!rendered.html.contains("<h2"));
        assert!(!rendered.html.contains("IRL!"));
        assert!(!rendered.html.contains("class=\"promo\""));
        assert!(rendered.html.contains("https://github.com/alice"));
        assert!(!rendered.html.contains("Learn how we count"));

        assert_eq!(rendered.html.matches("class=\"contrib-column").count(), 3);
        assert!(rendered.html.contains("2 total"));
        assert!(rendered.html.contains("Jun 16, 2023 \u{2013} Jun 15, 2024"));
        assert!(rendered.html.contains("June 14 \u{2013} June 15"));

        assert_eq!(rendered.summary.total_contributions, 2);
        assert_eq!(rendered.summary.longest_streak.length, 2);
        assert_eq!(rendered.summary.current_streak.length, 2);
    }

    #[test]
    fn test_heading_found_past_an_empty_wrapper() {
        let page = r#"
            <div class="js-yearly-contributions">
              <div class="position-relative"><span></span></div>
              <div class="position-relative">
                <div><h2 class="f4">2 contributions in the last year</h2></div>
                <h2>Kept</h2>
              </div>
            </div>
        "#;
        let rendered = render_calendar(page, "alice", &LoaderConfig::new(), date(2024, 6, 15))
            .unwrap()
            .unwrap();

        assert!(!rendered.html.contains("contributions in the last year</h2>"));
        assert!(rendered.html.contains("<h2>Kept</h2>"));
    }

    #[test]
    fn test_heading_outside_wrapper_is_kept() {
        let page = r#"
            <div class="js-yearly-contributions">
              <h2>Activity</h2>
              <div class="position-relative"><span></span></div>
            </div>
        "#;
        let rendered = render_calendar(page, "alice", &LoaderConfig::new(), date(2024, 6, 15))
            .unwrap()
            .unwrap();

        assert!(rendered.html.contains("<h2>Activity</h2>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let config = LoaderConfig::new().with_tooltips(true).with_responsive(true);
        let first = render_calendar(PAGE, "alice", &config, date(2024, 6, 15)).unwrap();
        let second = render_calendar(PAGE, "alice", &config, date(2024, 6, 15)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_without_global_stats() {
        let config = LoaderConfig::new().with_global_stats(false);
        let rendered = render_calendar(PAGE, "alice", &config, date(2024, 6, 15))
            .unwrap()
            .unwrap();
        assert!(!rendered.html.contains("contrib-column"));
    }

    #[test]
    fn test_responsive_graph() {
        let config = LoaderConfig::new().with_responsive(true);
        let rendered = render_calendar(PAGE, "alice", &config, date(2024, 6, 15))
            .unwrap()
            .unwrap();

        assert!(rendered.html.contains("width=\"100%\""));
        assert!(rendered.html.contains("viewBox=\"0 0 722 112\""));
        assert!(!rendered.html.contains("height=\"112\""));
    }

    #[test]
    fn test_tooltips_label_cells() {
        let config = LoaderConfig::new().with_tooltips(true);
        let rendered = render_calendar(PAGE, "alice", &config, date(2024, 6, 15))
            .unwrap()
            .unwrap();

        assert!(rendered.html.contains("class=\"day-tooltip\""));
        assert!(rendered.html.contains("<strong>1 contribution</strong> on Jun 14, 2024"));
        assert!(rendered.html.contains("mouseleave"));
    }

    #[test]
    fn test_tooltip_script_runs_outside_the_fragment() {
        // Hosts run the script after an innerHTML insert, where currentScript is unset
        assert!(!TOOLTIP_SCRIPT.contains("currentScript"));
        assert!(TOOLTIP_SCRIPT.contains("data-tooltips-wired"));

        let config = LoaderConfig::new().with_tooltips(true);
        let rendered = render_calendar(PAGE, "alice", &config, date(2024, 6, 15))
            .unwrap()
            .unwrap();
        let tooltip_at = rendered.html.find("class=\"day-tooltip\"").unwrap();
        let script_at = rendered.html.find("<script>").unwrap();
        assert!(tooltip_at < script_at);
    }

    #[test]
    fn test_summary_columns_without_contributions() {
        let html = summary_columns(&StreakSummary::default(), date(2024, 6, 15));
        assert!(html.contains("0 total"));
        assert_eq!(html.matches("0 days").count(), 2);
        assert_eq!(html.matches("No contributions recorded.").count(), 2);
    }

    #[test]
    fn test_summary_columns_single_day_streak() {
        let summary = StreakSummary {
            total_contributions: 1,
            current_streak: Streak {
                length: 1,
                range: Some((date(2024, 6, 15), date(2024, 6, 15))),
            },
            longest_streak: Streak {
                length: 1,
                range: Some((date(2024, 6, 15), date(2024, 6, 15))),
            },
            last_contributed: Some(date(2024, 6, 15)),
        };
        let html = summary_columns(&summary, date(2024, 6, 15));
        assert_eq!(html.matches(">1 day<").count(), 2);
    }
}
