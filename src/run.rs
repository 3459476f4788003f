//! Line-by-line streaming over a whole log.
//!
//! Reads raw lines from any [`BufRead`], rewrites them with
//! [`shift_line_into`], and writes them to any [`Write`] with the original
//! terminator. Lines that are not valid UTF-8 are still scanned: stamps in
//! their valid segments are rewritten and the invalid bytes are copied as is.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::config::ShiftConfig;
use crate::error::LogShiftError;
use crate::shift::{RunState, shift_line_into};

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines read.
    pub lines: u64,
    /// Stamps replaced with an offset.
    pub stamps_shifted: u64,
    /// Lines holding bytes that are not valid UTF-8; those bytes are copied unchanged.
    pub non_utf8_lines: u64,
}

/// Split a raw line into content and terminator (`\n`, `\r\n`, or nothing at EOF).
fn split_terminator(raw: &[u8]) -> (&[u8], &[u8]) {
    let content_len = match raw {
        [.., b'\r', b'\n'] => raw.len() - 2,
        [.., b'\n'] => raw.len() - 1,
        _ => raw.len(),
    };
    raw.split_at(content_len)
}

/// Shift every line of `reader` into `writer`.
///
/// `progress` is called after each line with the running line count.
/// The writer is flushed before returning.
pub fn shift_stream<R, W, F>(
    mut reader: R,
    mut writer: W,
    config: &ShiftConfig,
    state: &mut RunState,
    mut progress: F,
) -> Result<RunSummary, LogShiftError>
where
    R: BufRead,
    W: Write,
    F: FnMut(u64),
{
    let mut summary = RunSummary::default();
    let mut raw = Vec::new();
    let mut out = String::new();

    info!(
        tag = %config.duration_tag,
        month_first = config.month_first,
        year_first = config.year_first,
        "shifting log"
    );

    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        summary.lines += 1;

        let (content, terminator) = split_terminator(&raw);
        match std::str::from_utf8(content) {
            Ok(line) => {
                out.clear();
                let shifted = shift_line_into(line, config, state, &mut out);
                summary.stamps_shifted += shifted as u64;
                writer.write_all(out.as_bytes())?;
            }
            Err(e) => {
                debug!(line = summary.lines, error = %e, "line is not valid UTF-8, shifting its valid segments");
                summary.non_utf8_lines += 1;
                for chunk in content.utf8_chunks() {
                    out.clear();
                    let shifted = shift_line_into(chunk.valid(), config, state, &mut out);
                    summary.stamps_shifted += shifted as u64;
                    writer.write_all(out.as_bytes())?;
                    writer.write_all(chunk.invalid())?;
                }
            }
        }
        writer.write_all(terminator)?;
        progress(summary.lines);
    }

    writer.flush()?;

    info!(
        lines = summary.lines,
        stamps = summary.stamps_shifted,
        non_utf8 = summary.non_utf8_lines,
        "shift complete"
    );
    Ok(summary)
}
