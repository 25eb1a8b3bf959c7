//! Shared utilities.

mod text;
mod time;

pub use text::truncate_chars;
pub use time::{format_timestamp, now_utc, parse_timestamp, timestamp_format};
