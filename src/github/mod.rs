// GitHub contributions module.
// Provides the page proxy and the types for parsed contribution data.

pub mod client;
pub mod types;

pub use client::{CalendarProxy, DEFAULT_PROXY_BASE, HttpProxy};
pub use types::*;
