// Calendar loader.
// Cache lookup, proxy fetch, capped retry, and the single container update.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::cache::{self, CacheEntry, CacheStore};
use crate::error::{CalendarError, Result};
use crate::github::{CalendarProxy, StreakSummary};

use super::config::{LoaderConfig, MIN_HEIGHT_WITHOUT_STATS_PX};
use super::render::render_calendar;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant, for reproducible renders.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Where the rendered calendar goes.
pub trait RenderTarget {
    /// Replace the whole content of the target.
    fn replace_content(&mut self, html: String) -> Result<()>;

    /// Reserve vertical space while the content is missing or short.
    fn reserve_min_height(&mut self, px: u32) -> Result<()>;
}

/// In-memory container, the analogue of a page element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlContainer {
    /// Optional element id used when wrapping the content.
    pub id: Option<String>,
    /// Current content.
    pub inner_html: String,
    /// Reserved minimum height in pixels.
    pub min_height: Option<u32>,
    /// How many times the content has been replaced.
    pub replacements: usize,
}

impl HtmlContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// The content wrapped in its container element.
    pub fn outer_html(&self) -> String {
        let id = self
            .id
            .as_ref()
            .map(|id| format!(" id=\"{}\"", id))
            .unwrap_or_default();
        let style = self
            .min_height
            .map(|px| format!(" style=\"min-height: {}px\"", px))
            .unwrap_or_default();
        format!("<div{}{}>{}</div>", id, style, self.inner_html)
    }
}

impl RenderTarget for HtmlContainer {
    fn replace_content(&mut self, html: String) -> Result<()> {
        self.inner_html = html;
        self.replacements += 1;
        Ok(())
    }

    fn reserve_min_height(&mut self, px: u32) -> Result<()> {
        self.min_height = Some(px);
        Ok(())
    }
}

/// Loads a user's contribution calendar into a container.
pub struct CalendarLoader<P, S, C = SystemClock> {
    proxy: P,
    store: S,
    clock: C,
}

impl<P: CalendarProxy, S: CacheStore> CalendarLoader<P, S, SystemClock> {
    pub fn new(proxy: P, store: S) -> Self {
        Self::with_clock(proxy, store, SystemClock)
    }
}

impl<P: CalendarProxy, S: CacheStore, C: Clock> CalendarLoader<P, S, C> {
    pub fn with_clock(proxy: P, store: S, clock: C) -> Self {
        Self {
            proxy,
            store,
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load and render, logging any failure instead of returning it.
    ///
    /// The container is left untouched when loading fails.
    pub async fn load<T: RenderTarget>(
        &self,
        container: &mut T,
        username: &str,
        config: &LoaderConfig,
    ) {
        match self.try_load(container, username, config).await {
            Ok(_) => info!(username, "GitHub calendar loaded"),
            Err(e) => error!(username, error = %e, "Error fetching GitHub contributions"),
        }
    }

    /// Load and render, returning the summary shown or the error that stopped it.
    pub async fn try_load<T: RenderTarget>(
        &self,
        container: &mut T,
        username: &str,
        config: &LoaderConfig,
    ) -> Result<StreakSummary> {
        if username.trim().is_empty() {
            return Err(CalendarError::EmptyUsername);
        }

        if !config.global_stats {
            container.reserve_min_height(MIN_HEIGHT_WITHOUT_STATS_PX)?;
        }

        let max_attempts = config.retry.max_attempts();
        let mut attempt = 1;
        loop {
            // Retries skip the cache, which may hold the very page that lacked the calendar
            let body = self.get_calendar(username, config, attempt == 1).await?;
            let today = self.clock.now().date_naive();

            if let Some(rendered) = render_calendar(&body, username, config, today)? {
                container.replace_content(rendered.html)?;
                return Ok(rendered.summary);
            }

            if attempt >= max_attempts {
                return Err(CalendarError::CalendarNotFound { attempts: attempt });
            }

            warn!(
                username,
                attempt,
                delay_ms = config.retry.delay.as_millis() as u64,
                "GitHub calendar data not found. Retrying..."
            );
            tokio::time::sleep(config.retry.delay).await;
            attempt += 1;
        }
    }

    /// Fetch the raw page, from the cache when fresh.
    async fn get_calendar(
        &self,
        username: &str,
        config: &LoaderConfig,
        use_cache: bool,
    ) -> Result<String> {
        let ttl = config.cache_ttl();

        if ttl.is_some() && use_cache {
            if let Some(content) = cache::read_if_fresh(&self.store, username, self.clock.now())? {
                debug!(username, "using cached calendar");
                return Ok(content);
            }
        }

        let body = self.proxy.fetch(username).await?;

        if let Some(ttl) = ttl {
            let entry = CacheEntry::new(body, self.clock.now(), ttl);
            cache::write_entry(&self.store, username, &entry)?;
            debug!(username, expires_at = %entry.expires_at, "cached calendar");
            return Ok(entry.content);
        }

        Ok(body)
    }
}
