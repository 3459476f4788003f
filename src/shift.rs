//! Offset computation and line rewriting.
//!
//! [`LineShifter`] replaces each accepted stamp with the time elapsed since the
//! previously accepted stamp of the run, tracked in a caller-owned
//! [`RunState`]. Replacements are spliced in a single left-to-right pass over
//! the original line, so every byte outside a stamp is copied unchanged.

use jiff::SignedDuration;
use jiff::civil::DateTime;
use tracing::debug;

use crate::config::ShiftConfig;
use crate::stamp::{StampMatcher, TimestampMatch};

/// Cross-line state of one run.
///
/// Starts unset. The first accepted stamp sets both fields; each later one
/// advances `last_seen`. Start a new run with [`RunState::new`] or
/// [`RunState::reset`]; nothing resets it implicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunState {
    baseline: Option<DateTime>,
    last_seen: Option<DateTime>,
}

impl RunState {
    pub const fn new() -> Self {
        Self {
            baseline: None,
            last_seen: None,
        }
    }

    /// Value of the first accepted stamp of the run.
    pub const fn baseline(&self) -> Option<DateTime> {
        self.baseline
    }

    /// Value of the most recently accepted stamp.
    pub const fn last_seen(&self) -> Option<DateTime> {
        self.last_seen
    }

    pub const fn is_unset(&self) -> bool {
        self.baseline.is_none() && self.last_seen.is_none()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Record an accepted stamp and return its offset from the previous one.
    fn accept(&mut self, value: DateTime) -> SignedDuration {
        let offset = match self.last_seen {
            Some(prev) => value.duration_since(prev),
            None => {
                self.baseline = Some(value);
                SignedDuration::ZERO
            }
        };
        self.last_seen = Some(value);
        offset
    }
}

/// A stamp together with its offset from the previous accepted stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftedStamp {
    pub stamp: TimestampMatch,
    pub offset: SignedDuration,
}

/// Format an offset as `hh:mm:ss`, or `hh:mm:ss.fff` when it has a
/// millisecond part. Hours are not wrapped at 24.
pub fn format_offset(offset: SignedDuration) -> String {
    let sign = if offset.is_negative() { "-" } else { "" };
    let abs = offset.unsigned_abs();
    let total = abs.as_secs();
    let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);
    let millis = abs.subsec_millis();

    if millis == 0 {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    }
}

/// Rewrites stamps in a line as tagged offsets.
#[derive(Debug, Clone, Copy)]
pub struct LineShifter<'a> {
    tag: &'a str,
}

impl<'a> LineShifter<'a> {
    pub const fn new(tag: &'a str) -> Self {
        Self { tag }
    }

    /// Compute offsets for `matches` in order, advancing `state` once per stamp.
    pub fn shift_stamps(&self, matches: &[TimestampMatch], state: &mut RunState) -> Vec<ShiftedStamp> {
        matches
            .iter()
            .map(|&stamp| ShiftedStamp {
                stamp,
                offset: state.accept(stamp.value),
            })
            .collect()
    }

    /// Rewrite `line`, replacing every match with the tag and its offset.
    ///
    /// `matches` should be sorted by `start`, non-overlapping, and already
    /// filtered for ordering (see [`StampMatcher::find_stamps`]). A match that
    /// overlaps an earlier one, runs past the end of the line, or does not
    /// sit on char boundaries is skipped and does not touch `state`.
    pub fn shift_line(&self, line: &str, matches: &[TimestampMatch], state: &mut RunState) -> String {
        let mut out = String::with_capacity(line.len());
        self.shift_line_into(line, matches, state, &mut out);
        out
    }

    /// Like [`shift_line`](Self::shift_line), appending into `out`.
    pub fn shift_line_into(
        &self,
        line: &str,
        matches: &[TimestampMatch],
        state: &mut RunState,
        out: &mut String,
    ) {
        if matches.is_empty() {
            out.push_str(line);
            return;
        }
        let spans = usable_spans(line, matches);
        let shifted = self.shift_stamps(&spans, state);
        self.splice(line, &shifted, out);
    }

    /// Single pass over the original line with a cursor at the last copied byte.
    ///
    /// Spans must already be checked by [`usable_spans`].
    fn splice(&self, line: &str, shifted: &[ShiftedStamp], out: &mut String) {
        let mut cursor = 0;
        for s in shifted {
            out.push_str(&line[cursor..s.stamp.start]);
            out.push_str(self.tag);
            out.push_str(&format_offset(s.offset));
            cursor = s.stamp.end();
        }
        out.push_str(&line[cursor..]);
    }
}

/// Matches that can be sliced out of `line` in order without overlapping.
fn usable_spans(line: &str, matches: &[TimestampMatch]) -> Vec<TimestampMatch> {
    let mut cursor = 0;
    matches
        .iter()
        .copied()
        .filter(|m| {
            let fits = m.start.checked_add(m.length).is_some_and(|end| {
                m.start >= cursor
                    && end <= line.len()
                    && line.is_char_boundary(m.start)
                    && line.is_char_boundary(end)
            });
            if fits {
                cursor = m.end();
            } else {
                debug!(start = m.start, length = m.length, "skipping span outside the line");
            }
            fits
        })
        .collect()
}

/// Find and rewrite all stamps in one line.
///
/// This is the whole per-line operation: match, filter against
/// `state.last_seen()`, compute offsets, splice.
///
/// ```
/// use logshift::{RunState, ShiftConfig, shift_line};
///
/// let config = ShiftConfig::default();
/// let mut state = RunState::new();
///
/// let first = shift_line("11/12/2020 2:34:00 PM start", &config, &mut state);
/// assert_eq!(first, "(DURATION)00:00:00 start");
///
/// let second = shift_line("11/12/2020 2:34:34.78 PM next", &config, &mut state);
/// assert_eq!(second, "(DURATION)00:00:34.780 next");
/// ```
pub fn shift_line(line: &str, config: &ShiftConfig, state: &mut RunState) -> String {
    let mut out = String::with_capacity(line.len());
    shift_line_into(line, config, state, &mut out);
    out
}

/// Like [`shift_line`], appending into `out` so callers can reuse a buffer.
///
/// Returns the number of stamps replaced.
pub fn shift_line_into(line: &str, config: &ShiftConfig, state: &mut RunState, out: &mut String) -> usize {
    let matches = StampMatcher::from_config(config).find_stamps(line, state.last_seen());
    LineShifter::new(&config.duration_tag).shift_line_into(line, &matches, state, out);
    matches.len()
}
