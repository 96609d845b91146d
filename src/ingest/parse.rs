//! Parsers for availability strings.
//!
//! Formats:
//! - time of day: `HH:MM:SS` or `HH:MM` (seconds are ignored)
//! - interval: `"07:15:00 - 09:00:00"` (split at the first `-`)
//! - cell: a bracketed list of quoted intervals,
//!   `"['07:15:00 - 09:00:00', '12:00:00 - 15:00:00']"`

use thiserror::Error;

use crate::models::{FreeInterval, TimeOfDay};

/// A parse failure for one time, interval or cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid time of day '{0}'")]
    Time(String),

    #[error("interval '{0}' has no '-' separator")]
    MissingSeparator(String),

    #[error("interval '{0}' does not end after it starts")]
    EmptyInterval(String),

    #[error("not a list of quoted intervals: {0}")]
    NotAList(String),
}

/// Parses `HH:MM:SS` or `HH:MM`.
pub fn parse_time_of_day(s: &str) -> Result<TimeOfDay, ParseError> {
    let err = || ParseError::Time(s.trim().to_string());

    let parts: Vec<&str> = s.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(err());
    }

    let mut fields = [0u16; 3];
    for (field, part) in fields.iter_mut().zip(&parts) {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        *field = part.parse().map_err(|_| err())?;
    }

    let [hour, minute, second] = fields;
    if hour > 23 || second > 59 {
        return Err(err());
    }
    TimeOfDay::new(hour, minute).ok_or_else(err)
}

/// Parses `"start - end"`.
pub fn parse_interval(s: &str) -> Result<FreeInterval, ParseError> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| ParseError::MissingSeparator(s.trim().to_string()))?;
    let start = parse_time_of_day(start)?;
    let end = parse_time_of_day(end)?;
    if start >= end {
        return Err(ParseError::EmptyInterval(s.trim().to_string()));
    }
    Ok(FreeInterval::new(start, end))
}

/// Parses every interval of a list; the first failure fails the list.
pub fn parse_interval_list<I, S>(items: I) -> Result<Vec<FreeInterval>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| parse_interval(item.as_ref()))
        .collect()
}

/// Splits a bracketed list of quoted strings into its items.
///
/// Accepts single or double quotes, surrounding whitespace and a
/// trailing comma. Anything else (bare words, numbers, missing
/// brackets, unterminated quotes) is rejected.
pub fn split_list_literal(cell: &str) -> Result<Vec<String>, ParseError> {
    let not_a_list = || ParseError::NotAList(cell.trim().to_string());

    let inner = cell
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(not_a_list)?;

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let Some(quote) = chars.next() else { break };
        if quote != '\'' && quote != '"' {
            return Err(not_a_list());
        }

        let mut item = String::new();
        loop {
            match chars.next() {
                Some(c) if c == quote => break,
                Some(c) => item.push(c),
                None => return Err(not_a_list()),
            }
        }
        items.push(item);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            Some(',') | None => {}
            Some(_) => return Err(not_a_list()),
        }
    }

    Ok(items)
}

/// Parses a serialized availability cell.
pub fn parse_cell(cell: &str) -> Result<Vec<FreeInterval>, ParseError> {
    parse_interval_list(split_list_literal(cell)?)
}
