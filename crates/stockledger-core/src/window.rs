//! Reporting date windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive date window with optional bounds.
///
/// A missing bound leaves that side unbounded.
///
/// # Examples
///
/// ```
/// use stockledger_core::{DateWindow, NaiveDate};
///
/// let feb = DateWindow::between(
///     NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
/// );
/// assert!(feb.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// assert!(feb.is_before_start(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day of the window, inclusive.
    pub start: Option<NaiveDate>,
    /// Last day of the window, inclusive.
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Create a window from optional bounds.
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// A window with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// A window starting at `start`.
    #[must_use]
    pub const fn from(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// A window ending at `end`.
    #[must_use]
    pub const fn until(end: NaiveDate) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// A window with both bounds.
    #[must_use]
    pub const fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Check if the date falls strictly before the start bound.
    #[must_use]
    pub fn is_before_start(&self, date: NaiveDate) -> bool {
        self.start.is_some_and(|start| date < start)
    }

    /// Check if the date falls strictly after the end bound.
    #[must_use]
    pub fn is_after_end(&self, date: NaiveDate) -> bool {
        self.end.is_some_and(|end| date > end)
    }

    /// Check if the date falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        !self.is_before_start(date) && !self.is_after_end(date)
    }

    /// Check if neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Check if the start bound lies after the end bound.
    ///
    /// Such a window contains no dates. It is not an error for the engine;
    /// callers may choose to warn about it.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }
}
