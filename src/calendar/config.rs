// Loader configuration.
// Named options with documented defaults, fixed for one load.

use std::time::Duration;

use crate::cache::DEFAULT_TTL;

/// Minimum height reserved on the container when global stats are hidden.
pub const MIN_HEIGHT_WITHOUT_STATS_PX: u32 = 175;

/// How often to refetch when the page comes back without calendar data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero means a single attempt.
    pub max_retries: u32,
    /// Fixed wait before each retry.
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 10;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Total number of attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            delay: Self::DEFAULT_DELAY,
        }
    }
}

/// Options for one calendar load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Cache lifetime in seconds. Default one day; 0 disables caching.
    pub cache_ttl_seconds: u64,
    /// Make the graph scale with its container. Default false.
    pub responsive: bool,
    /// Label day cells and wire hover tooltips. Default false.
    ///
    /// The markup carries its own `<script>`, which only runs when the markup is
    /// part of the served page. Hosts inserting it via `innerHTML` must also run
    /// [`TOOLTIP_SCRIPT`](super::render::TOOLTIP_SCRIPT).
    pub tooltips: bool,
    /// Render the total/longest/current columns. Default true.
    pub global_stats: bool,
    /// Footer text under the graph. Defaults to a link to the user's profile.
    pub summary_text: Option<String>,
    /// Retry policy when calendar data is missing.
    pub retry: RetryPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: DEFAULT_TTL.as_secs(),
            responsive: false,
            tooltips: false,
            global_stats: true,
            summary_text: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }

    pub fn with_responsive(mut self, responsive: bool) -> Self {
        self.responsive = responsive;
        self
    }

    pub fn with_tooltips(mut self, tooltips: bool) -> Self {
        self.tooltips = tooltips;
        self
    }

    pub fn with_global_stats(mut self, global_stats: bool) -> Self {
        self.global_stats = global_stats;
        self
    }

    pub fn with_summary_text(mut self, text: impl Into<String>) -> Self {
        self.summary_text = Some(text.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Cache lifetime, or None when caching is disabled.
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_seconds > 0).then(|| Duration::from_secs(self.cache_ttl_seconds))
    }

    /// Footer text for a user, falling back to the profile link.
    pub fn summary_text_for(&self, username: &str) -> String {
        self.summary_text.clone().unwrap_or_else(|| {
            format!(
                "Summary of pull requests, issues opened, and commits made by \
                 <a href=\"https://github.com/{0}\" target=\"blank\">@{0}</a>",
                username
            )
        })
    }
}
