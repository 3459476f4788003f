//! Date/time stamp detection inside free-text log lines.
//!
//! A stamp is a numeric date followed by a clock time, for example
//! `11/12/2020 2:34:34.78 PM` or `2020-11-12 14:34:34,780`. Date components
//! may be separated by `/`, `-`, `\` or `_`; the fractional second by `:`,
//! `.` or `,`. Which date component is the year, month or day is decided
//! by [`StampMatcher`] from the component values and two ordering flags.

use std::sync::LazyLock;

use jiff::civil::DateTime;
use regex::{Captures, Regex};
use tracing::debug;

use crate::config::ShiftConfig;
use crate::error::LogShiftError;

/// `<d1><sep><d2><sep><d3> <hour>:<minute>:<second>[<frac-sep><frac>][ <am/pm>]`
static STAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?<d1>[0-9]+)[/\-\\_](?<d2>[0-9]+)[/\-\\_](?<d3>[0-9]+) (?<hour>[0-9]{1,2}):(?<minute>[0-9]{1,2}):(?<second>[0-9]{1,2})(?:[:.,](?<frac>[0-9]+))?(?:\s(?<ampm>[AaPp][Mm])\b)?",
    )
    .expect("stamp pattern is a valid regex")
});

/// Outer date components above this value can only be a year.
const MAX_NON_YEAR: u32 = 59;

/// Two-digit years at or below this value land in the 2000s, above it in the 1900s.
const TWO_DIGIT_YEAR_PIVOT: u32 = 49;

/// A located stamp: byte span in the line plus its calendar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampMatch {
    /// Byte offset of the first stamp byte.
    pub start: usize,
    /// Stamp length in bytes.
    pub length: usize,
    /// Calendar value with millisecond precision.
    pub value: DateTime,
}

impl TimestampMatch {
    /// Byte offset one past the last stamp byte.
    pub const fn end(&self) -> usize {
        self.start + self.length
    }
}

/// The text captured by one pattern match, before any interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStamp<'a> {
    pub d1: &'a str,
    pub d2: &'a str,
    pub d3: &'a str,
    pub hour: &'a str,
    pub minute: &'a str,
    pub second: &'a str,
    pub frac: Option<&'a str>,
    pub ampm: Option<&'a str>,
}

impl<'a> RawStamp<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        Some(Self {
            d1: caps.name("d1")?.as_str(),
            d2: caps.name("d2")?.as_str(),
            d3: caps.name("d3")?.as_str(),
            hour: caps.name("hour")?.as_str(),
            minute: caps.name("minute")?.as_str(),
            second: caps.name("second")?.as_str(),
            frac: caps.name("frac").map(|m| m.as_str()),
            ampm: caps.name("ampm").map(|m| m.as_str()),
        })
    }

    /// Build the calendar value, resolving the date component order.
    ///
    /// Returns [`LogShiftError::MalformedTimestamp`] when the components are
    /// out of range for a calendar date/time.
    pub fn resolve(&self, month_first: bool, year_first: bool) -> Result<DateTime, LogShiftError> {
        let texts = [self.d1, self.d2, self.d3];
        let values = [
            parse_number(self.d1)?,
            parse_number(self.d2)?,
            parse_number(self.d3)?,
        ];
        let (y, m, d) = date_slots(values, month_first, year_first);

        let year = expand_year(texts[y], values[y]);
        let mut hour = parse_number(self.hour)?;
        if self.ampm.is_some_and(|s| s.eq_ignore_ascii_case("pm")) {
            hour = (hour + 12) % 24;
        }
        let millis = self.frac.map_or(0, frac_to_millis);

        DateTime::new(
            narrow(year)?,
            narrow(values[m])?,
            narrow(values[d])?,
            narrow(hour)?,
            narrow(parse_number(self.minute)?)?,
            narrow(parse_number(self.second)?)?,
            narrow(millis * 1_000_000)?,
        )
        .map_err(|e| LogShiftError::MalformedTimestamp(e.to_string()))
    }
}

/// Pick the (year, month, day) slots out of the three date components.
///
/// An outer component above 59 must be the year. Otherwise `year_first`
/// decides between the first and last slot. The two remaining components,
/// left to right, are month then day when `month_first` is set, and day then
/// month otherwise.
fn date_slots(values: [u32; 3], month_first: bool, year_first: bool) -> (usize, usize, usize) {
    let (year, first, second) = if values[0] > MAX_NON_YEAR {
        (0, 1, 2)
    } else if values[2] > MAX_NON_YEAR {
        (2, 0, 1)
    } else if year_first {
        (0, 1, 2)
    } else {
        (2, 0, 1)
    };

    if month_first {
        (year, first, second)
    } else {
        (year, second, first)
    }
}

/// Written with one or two digits, a year is read as `19xx`/`20xx`.
fn expand_year(text: &str, value: u32) -> u32 {
    if text.len() > 2 {
        value
    } else if value <= TWO_DIGIT_YEAR_PIVOT {
        2000 + value
    } else {
        1900 + value
    }
}

/// Fractional digits are read as `0.<digits>` seconds and floored to milliseconds.
fn frac_to_millis(digits: &str) -> u32 {
    digits
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(3)
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

fn parse_number(digits: &str) -> Result<u32, LogShiftError> {
    digits
        .parse()
        .map_err(|_| LogShiftError::MalformedTimestamp(format!("component out of range: {digits}")))
}

fn narrow<T: TryFrom<u32>>(value: u32) -> Result<T, LogShiftError> {
    T::try_from(value)
        .map_err(|_| LogShiftError::MalformedTimestamp(format!("component out of range: {value}")))
}

/// Locates stamps in a line and resolves them to calendar values.
///
/// Holds only the two ordering flags; every call is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampMatcher {
    month_first: bool,
    year_first: bool,
}

impl Default for StampMatcher {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl StampMatcher {
    pub const fn new(month_first: bool, year_first: bool) -> Self {
        Self {
            month_first,
            year_first,
        }
    }

    pub const fn from_config(config: &ShiftConfig) -> Self {
        Self::new(config.month_first, config.year_first)
    }

    /// Every calendar-valid stamp in the line, left to right.
    ///
    /// Malformed candidates are dropped here. No ordering check is applied.
    pub fn candidates<'a>(&'a self, line: &'a str) -> impl Iterator<Item = TimestampMatch> + 'a {
        STAMP_PATTERN.captures_iter(line).filter_map(move |caps| {
            let whole = caps.get(0)?;
            let raw = RawStamp::from_captures(&caps)?;
            match raw.resolve(self.month_first, self.year_first) {
                Ok(value) => Some(TimestampMatch {
                    start: whole.start(),
                    length: whole.len(),
                    value,
                }),
                Err(e) => {
                    debug!(stamp = whole.as_str(), error = %e, "dropping malformed stamp");
                    None
                }
            }
        })
    }

    /// Stamps accepted in order after `last_seen`.
    ///
    /// A candidate earlier than the last accepted stamp (either `last_seen`
    /// or an earlier candidate on this line) is treated as plain data and
    /// left out. With `last_seen` unset the first candidate is always taken.
    pub fn find_stamps(&self, line: &str, last_seen: Option<DateTime>) -> Vec<TimestampMatch> {
        let mut cursor = last_seen;
        self.candidates(line)
            .filter(|m| {
                if let Some(prev) = cursor
                    && m.value < prev
                {
                    debug!(
                        stamp = &line[m.start..m.end()],
                        "ignoring stamp earlier than the last accepted one"
                    );
                    return false;
                }
                cursor = Some(m.value);
                true
            })
            .collect()
    }
}
