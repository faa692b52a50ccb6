// 🏠 Listing Entity - validated real-estate record
// Owner, cost, and registration date; immutable once constructed

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Why a Listing could not be constructed.
///
/// These are the domain-level rules, checked every time a Listing is built,
/// whether the values come from a parsed file line or straight from code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("cost must be non-negative, got {0}")]
    NegativeCost(i64),

    #[error("owner must be non-blank")]
    BlankOwner,
}

// ============================================================================
// LISTING
// ============================================================================

/// One real-estate listing: who owns it, what it costs, when it was
/// registered.
///
/// Fields are private and there are no setters: a `Listing` that exists has
/// passed validation, and nothing can invalidate it afterwards. Construction
/// goes through [`Listing::new`], which checks the cost and owner rules
/// (date validity is guaranteed by [`NaiveDate`] itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    owner: String,
    cost: i64,
    registered_on: NaiveDate,
}

impl Listing {
    /// Build a validated listing.
    ///
    /// The owner is trimmed before the non-blank check, and the trimmed form
    /// is what gets stored. Cost is checked first, then the owner, so callers
    /// that pass several bad fields see the cost error.
    pub fn new(owner: &str, cost: i64, registered_on: NaiveDate) -> Result<Self, ListingError> {
        if cost < 0 {
            return Err(ListingError::NegativeCost(cost));
        }

        let owner = owner.trim();
        if owner.is_empty() {
            return Err(ListingError::BlankOwner);
        }

        Ok(Listing {
            owner: owner.to_string(),
            cost,
            registered_on,
        })
    }

    /// Owner name, trimmed.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Cost in whole rubles. Never negative.
    pub fn cost(&self) -> i64 {
        self.cost
    }

    /// Registration date.
    pub fn registered_on(&self) -> NaiveDate {
        self.registered_on
    }
}

impl fmt::Display for Listing {
    /// One report line per listing, in the same shape the data file uses:
    /// owner, `YYYY.MM.DD` date, cost with the currency suffix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} руб.",
            self.owner,
            self.registered_on.format("%Y.%m.%d"),
            self.cost
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
