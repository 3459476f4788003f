//! `logshift` — Rewrite date/time stamps in log lines as relative offsets.
//!
//! Every stamp such as `11/12/2020 2:34:34.78 PM` is replaced with a tag and
//! the time elapsed since the previous stamp (`(DURATION)00:00:34.780`), so
//! logs from different runs or machines can be diffed without absolute-time
//! noise. Stamps that go backwards in time are treated as data and left alone.
//!
//! # Example
//!
//! ```
//! use logshift::{RunState, ShiftConfig, shift_line};
//!
//! let config = ShiftConfig::default();
//! let mut state = RunState::new();
//!
//! let out = shift_line("11/12/2020 2:34:00 PM Test line", &config, &mut state);
//! assert_eq!(out, "(DURATION)00:00:00 Test line");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod run;
pub mod shift;
pub mod stamp;

// Re-export primary API types for convenience.
pub use config::{Config, ShiftConfig};
pub use error::LogShiftError;
pub use run::{RunSummary, shift_stream};
pub use shift::{LineShifter, RunState, ShiftedStamp, format_offset, shift_line, shift_line_into};
pub use stamp::{StampMatcher, TimestampMatch};
