// ghcal: GitHub contribution calendars with streak statistics.
// Fetches the contributions page, caches it with a TTL, and renders summary markup.

pub mod cache;
pub mod calendar;
pub mod error;
pub mod github;
pub mod telemetry;

pub use cache::{CacheStore, FileStore, MemoryStore};
pub use calendar::{CalendarLoader, HtmlContainer, LoaderConfig, RenderTarget, RetryPolicy};
pub use error::{CalendarError, Result};
pub use github::{CalendarProxy, HttpProxy, StreakSummary};
