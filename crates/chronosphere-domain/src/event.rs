//! Event module - normalized, dated happenings extracted from narrative text

use serde::{Deserialize, Serialize};
use std::fmt;

/// Precision at which a historical date is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Exact day (`YYYY-MM-DD`)
    Day,

    /// Month within a year (`YYYY-MM`)
    Month,

    /// A single year (`YYYY`)
    Year,

    /// A decade, written as its first year
    Decade,

    /// A century, written as a representative year
    Century,

    /// A millennium, written as a representative year
    Millennium,
}

impl Granularity {
    /// All granularities, finest first
    pub const ALL: [Granularity; 6] = [
        Granularity::Day,
        Granularity::Month,
        Granularity::Year,
        Granularity::Decade,
        Granularity::Century,
        Granularity::Millennium,
    ];

    /// Get the granularity name as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
            Granularity::Decade => "decade",
            Granularity::Century => "century",
            Granularity::Millennium => "millennium",
        }
    }

    /// Number of date components (`YYYY`, `MM`, `DD`) this granularity implies
    pub fn components(&self) -> usize {
        match self {
            Granularity::Day => 3,
            Granularity::Month => 2,
            Granularity::Year | Granularity::Decade | Granularity::Century | Granularity::Millennium => 1,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Granularity::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("Invalid granularity: {}", s))
    }
}

/// A date plus the precision it is known at
///
/// `date` follows `-?YYYY(-MM(-DD)?)?`; a leading `-` marks years BCE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    /// Date string
    pub date: String,

    /// Declared precision
    pub granularity: Granularity,
}

impl DateSpan {
    /// Create a date span
    pub fn new(date: impl Into<String>, granularity: Granularity) -> Self {
        Self {
            date: date.into(),
            granularity,
        }
    }

    /// Number of components present in `date`, or `None` if it is malformed
    ///
    /// # Examples
    ///
    /// ```
    /// use chronosphere_domain::{DateSpan, Granularity};
    ///
    /// assert_eq!(DateSpan::new("1821", Granularity::Year).precision(), Some(1));
    /// assert_eq!(DateSpan::new("-0044-03-15", Granularity::Day).precision(), Some(3));
    /// assert_eq!(DateSpan::new("18th century", Granularity::Century).precision(), None);
    /// ```
    pub fn precision(&self) -> Option<usize> {
        let body = self.date.strip_prefix('-').unwrap_or(&self.date);
        let parts: Vec<&str> = body.split('-').collect();
        if parts.is_empty() || parts.len() > 3 {
            return None;
        }
        let digits = |s: &str, n: usize| s.len() == n && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(parts[0], 4) || !parts[1..].iter().all(|p| digits(p, 2)) {
            return None;
        }
        Some(parts.len())
    }

    /// Whether the declared granularity matches the precision present in `date`
    pub fn is_consistent(&self) -> bool {
        self.precision() == Some(self.granularity.components())
    }
}

/// A normalized historical event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Short title, at most three words, no dates
    pub title: String,

    /// Summary of at most three sentences that does not restate the title
    pub summary: String,

    /// Dates the event is anchored to; never empty
    pub dates: Vec<DateSpan>,
}

/// Argument payload of the forced date-extraction call
///
/// The completion service answers with `{ "dates": [Event, ...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsPayload {
    /// Extracted events
    pub dates: Vec<Event>,
}
