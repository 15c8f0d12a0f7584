use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// A calendar day (`YYYY-MM-DD`), independent of any time zone.
///
/// Every "today" in the service is derived from the same local wall clock
/// via [`Day::of`], so records, summaries and trends agree on day boundaries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Day(NaiveDate);

impl Day {
    /// The day a local wall-clock instant falls on.
    pub fn of(now: NaiveDateTime) -> Self {
        Self(now.date())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// 1-based day of month.
    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    pub fn first_of_month(&self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    pub fn last_of_month(&self) -> Self {
        let first = self.first_of_month().0;
        let next_month = first.checked_add_months(chrono::Months::new(1));
        match next_month.and_then(|d| d.pred_opt()) {
            Some(last) => Self(last),
            None => Self(NaiveDate::MAX),
        }
    }

    pub fn minus_days(&self, days: u64) -> Self {
        Self(self.0.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN))
    }

    pub fn plus_days(&self, days: u64) -> Self {
        Self(self.0.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX))
    }
}

impl FromStr for Day {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

/// Inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: Day,
    pub end: Day,
}

impl DayRange {
    /// Builds `[start, end]` as given. A reversed range contains no days.
    pub fn new(start: Day, end: Day) -> Self {
        Self { start, end }
    }

    pub fn single(day: Day) -> Self {
        Self { start: day, end: day }
    }

    /// The calendar month containing `day`.
    pub fn month_of(day: Day) -> Self {
        Self {
            start: day.first_of_month(),
            end: day.last_of_month(),
        }
    }

    /// The `len` days ending at `last`, oldest first.
    pub fn trailing(last: Day, len: u64) -> Self {
        Self {
            start: last.minus_days(len.saturating_sub(1)),
            end: last,
        }
    }

    pub fn contains(&self, day: Day) -> bool {
        self.start <= day && day <= self.end
    }

    /// Iterates the range oldest first.
    pub fn days(&self) -> impl Iterator<Item = Day> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| {
            let next = d.plus_days(1);
            (next <= end && next != *d).then_some(next)
        })
        .take_while(move |d| *d <= end)
    }
}
