// 🔍 Line Parser - field extraction from free-form register lines
// Owner in quotes, date as YYYY.MM.DD, cost as the first standalone integer

use crate::listing::{Listing, ListingError};
use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

// ============================================================================
// PARSE FAILURES
// ============================================================================

/// Why a line did not produce a [`Listing`].
///
/// The first three are structural: a field marker is missing entirely.
/// The rest are semantic: the field was found but its value is unusable.
/// Either way the line is reported and skipped, never a hard error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("no quoted owner found")]
    MissingOwner,

    #[error("no registration date found")]
    MissingDate,

    #[error("no cost figure found")]
    MissingCost,

    #[error("date {0:?} is not a real calendar date")]
    InvalidDate(String),

    #[error("cost {0:?} is too large")]
    InvalidCost(String),

    #[error(transparent)]
    Invalid(#[from] ListingError),
}

impl ParseFailure {
    /// True when a required element was absent altogether, as opposed to
    /// present but unusable.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ParseFailure::MissingOwner | ParseFailure::MissingDate | ParseFailure::MissingCost
        )
    }
}

// ============================================================================
// LINE PARSER
// ============================================================================

/// Extracts listings from single lines of the register file.
///
/// Field order in the line does not matter. Each field is located
/// independently:
/// - owner: the first double-quoted run, quotes stripped
/// - date: the first `YYYY.MM.DD` shaped token
/// - cost: the first whole-number run that is not part of a decimal
///
/// The parser is stateless apart from its compiled patterns, so one
/// instance can be shared across any number of lines.
pub struct LineParser {
    owner_re: Regex,
    date_re: Regex,
    cost_re: Regex,
}

impl LineParser {
    pub fn new() -> Self {
        LineParser {
            owner_re: Regex::new(r#""([^"]*)""#).unwrap(),
            date_re: Regex::new(r"\d{4}\.\d{2}\.\d{2}").unwrap(),
            cost_re: Regex::new(r"\b\d+\b").unwrap(),
        }
    }

    /// Parse one line into a validated [`Listing`].
    ///
    /// Structural checks run first (owner, then date, then cost), so a line
    /// missing several fields reports the owner. Value checks follow in the
    /// same field order, and [`Listing::new`] has the final say.
    pub fn parse_line(&self, line: &str) -> Result<Listing, ParseFailure> {
        let owner = match self.owner_re.captures(line) {
            Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
            None => return Err(ParseFailure::MissingOwner),
        };

        let date_text = match self.date_re.find(line) {
            Some(m) => m.as_str(),
            None => return Err(ParseFailure::MissingDate),
        };

        let cost_text = self
            .first_cost_figure(line)
            .ok_or(ParseFailure::MissingCost)?;

        // Only the first date-shaped token is considered. If it is not a
        // real date the line fails, even when a valid date appears later.
        let registered_on = NaiveDate::parse_from_str(date_text, "%Y.%m.%d")
            .map_err(|_| ParseFailure::InvalidDate(date_text.to_string()))?;

        let cost: i64 = cost_text
            .parse()
            .map_err(|_| ParseFailure::InvalidCost(cost_text.to_string()))?;

        Ok(Listing::new(owner, cost, registered_on)?)
    }

    /// First digit run with no dot touching either end.
    ///
    /// `24.5` contributes neither `24` nor `5`; the date's own components
    /// are excluded the same way because they always sit next to a dot.
    fn first_cost_figure<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.cost_re.find_iter(line).find_map(|m| {
            let touches_dot =
                line[..m.start()].ends_with('.') || line[m.end()..].starts_with('.');
            if touches_dot {
                None
            } else {
                Some(m.as_str())
            }
        })
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
