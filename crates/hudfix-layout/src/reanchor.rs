//! Central re-anchoring of HUD elements
//!
//! Layout entries are INI text. An element whose section sets `AnchorX` to
//! a fraction `a` of the full (multi-monitor) width and `XOffset` to a
//! pixel offset `o` is moved into the central monitor by rewriting it as
//! `AnchorX=0.5` and `XOffset=o + round((a - 0.5) * target)`, where `target`
//! is the width of a single monitor. Everything else in the payload is
//! copied through unchanged, line endings included.

use tracing::trace;

use crate::{Error, Result, Transform};

const ANCHOR_KEY: &str = "AnchorX";
const OFFSET_KEY: &str = "XOffset";
const CENTER: f64 = 0.5;

/// Re-anchors horizontally positioned elements to the screen center.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentralReanchor;

impl CentralReanchor {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for CentralReanchor {
    fn apply(&self, payload: &[u8], target: u32) -> Result<Vec<u8>> {
        let text = std::str::from_utf8(payload).map_err(|e| Error::Encoding {
            reason: e.to_string(),
        })?;
        let lines: Vec<Line<'_>> = text.split_inclusive('\n').map(Line::parse).collect();

        let mut out = String::with_capacity(text.len() + 32);
        let mut start = 0;
        while start < lines.len() {
            let end = lines[start + 1..]
                .iter()
                .position(|line| line.is_header())
                .map_or(lines.len(), |offset| start + 1 + offset);
            rewrite_section(&lines[start..end], start, target, &mut out)?;
            start = end;
        }

        Ok(out.into_bytes())
    }
}

/// Rewrite one section (header line included, if any) into `out`.
fn rewrite_section(lines: &[Line<'_>], first_line: usize, target: u32, out: &mut String) -> Result<()> {
    let anchor = lines.iter().position(|line| line.key_is(ANCHOR_KEY));
    let Some(anchor_idx) = anchor else {
        lines.iter().for_each(|line| out.push_str(line.raw));
        return Ok(());
    };
    let offset_idx = lines.iter().position(|line| line.key_is(OFFSET_KEY));

    let anchor_value: f64 = parse_value(&lines[anchor_idx], first_line + anchor_idx)?;
    let offset_value: i64 = match offset_idx {
        Some(idx) => parse_value(&lines[idx], first_line + idx)?,
        None => 0,
    };
    let shift = ((anchor_value - CENTER) * f64::from(target)).round();
    if !shift.is_finite() || shift < i64::MIN as f64 || shift >= i64::MAX as f64 {
        return Err(invalid(&lines[anchor_idx], first_line + anchor_idx));
    }
    let new_offset = offset_value.checked_add(shift as i64).ok_or_else(|| {
        let idx = offset_idx.unwrap_or(anchor_idx);
        invalid(&lines[idx], first_line + idx)
    })?;
    trace!(anchor = anchor_value, offset = offset_value, new_offset, "re-anchoring element");

    for (idx, line) in lines.iter().enumerate() {
        if idx == anchor_idx {
            out.push_str(&line.with_value(&format_fraction(CENTER)));
            if offset_idx.is_none() {
                if line.eol.is_empty() {
                    out.push('\n');
                }
                out.push_str(line.indent);
                out.push_str(&format!("{}={}{}", OFFSET_KEY, new_offset, line.eol));
            }
        } else if Some(idx) == offset_idx {
            out.push_str(&line.with_value(&new_offset.to_string()));
        } else {
            out.push_str(line.raw);
        }
    }
    Ok(())
}

fn parse_value<T: std::str::FromStr>(line: &Line<'_>, index: usize) -> Result<T> {
    let (_, value) = line.pair.unwrap_or_default();
    let value = value.trim();
    value
        .parse::<T>()
        .ok()
        .filter(|_| !value.eq_ignore_ascii_case("nan") && !value.to_ascii_lowercase().contains("inf"))
        .ok_or_else(|| invalid(line, index))
}

/// `line` (0-based `index`) holds a value that cannot be used.
fn invalid(line: &Line<'_>, index: usize) -> Error {
    let (key, value) = line.pair.unwrap_or_default();
    Error::InvalidValue {
        line: index + 1,
        key: key.trim().to_string(),
        value: value.trim().to_string(),
    }
}

fn format_fraction(value: f64) -> String {
    let formatted = format!("{}", value);
    if formatted.contains('.') {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}

/// One line of an INI payload, split into its parts.
#[derive(Debug)]
struct Line<'a> {
    raw: &'a str,
    /// Leading whitespace
    indent: &'a str,
    /// `\n`, `\r\n` or empty for a final unterminated line
    eol: &'a str,
    /// `(key, value)` for `key=value` lines
    pair: Option<(&'a str, &'a str)>,
    header: bool,
}

impl<'a> Line<'a> {
    fn parse(raw: &'a str) -> Self {
        let body_len = raw.trim_end_matches(['\r', '\n']).len();
        let (body, eol) = raw.split_at(body_len);
        let trimmed = body.trim_start();
        let indent = &body[..body.len() - trimmed.len()];

        let is_comment = trimmed.starts_with(';') || trimmed.starts_with('#');
        let header = trimmed.starts_with('[') && trimmed.trim_end().ends_with(']');
        let pair = if is_comment || header {
            None
        } else {
            trimmed.split_once('=')
        };

        Self {
            raw,
            indent,
            eol,
            pair,
            header,
        }
    }

    fn is_header(&self) -> bool {
        self.header
    }

    fn key_is(&self, key: &str) -> bool {
        self.pair
            .is_some_and(|(k, _)| k.trim().eq_ignore_ascii_case(key))
    }

    /// This line with its value replaced, key spelling and line ending kept.
    fn with_value(&self, value: &str) -> String {
        let key = self.pair.map(|(k, _)| k.trim()).unwrap_or_default();
        format!("{}{}={}{}", self.indent, key, value, self.eol)
    }
}
