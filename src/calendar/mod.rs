// Contribution calendar module.
// Loads, parses and renders a user's calendar with streak statistics.

pub mod config;
pub mod dom;
pub mod format;
pub mod loader;
pub mod parser;
pub mod render;

pub use config::{LoaderConfig, MIN_HEIGHT_WITHOUT_STATS_PX, RetryPolicy};
pub use loader::{CalendarLoader, Clock, FixedClock, HtmlContainer, RenderTarget, SystemClock};
pub use parser::{parse_calendar, summarize};
pub use render::{RenderedCalendar, TOOLTIP_SCRIPT, render_calendar};
