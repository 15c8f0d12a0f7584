//! Rolling 7-day attendance trend for the manager dashboard.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus},
    day::{Day, DayRange},
};

pub const TREND_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TrendPoint {
    #[schema(value_type = String, format = "date")]
    pub date: Day,
    pub present: usize,
    /// `totalEmployees - present`; can go negative when non-roster people
    /// check in.
    pub absent: i64,
    pub late: usize,
}

/// Counts for one day. Any attended status (half-day included) is present,
/// and absence is the roster size minus that.
pub fn day_point<'a, I>(date: Day, total_employees: usize, day_records: I) -> TrendPoint
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let (present, late) = day_records
        .into_iter()
        .filter(|r| r.date == date)
        .fold((0usize, 0usize), |(present, late), r| {
            (
                present + usize::from(r.status.counts_as_attended()),
                late + usize::from(r.status == AttendanceStatus::Late),
            )
        });

    TrendPoint {
        date,
        present,
        absent: total_employees as i64 - present as i64,
        late,
    }
}

/// One point per day for the week ending `today`, oldest first.
pub fn weekly_trend(today: Day, total_employees: usize, records: &[AttendanceRecord]) -> Vec<TrendPoint> {
    let window = DayRange::trailing(today, TREND_DAYS);

    let mut by_day: HashMap<Day, Vec<&AttendanceRecord>> = HashMap::new();
    for record in records.iter().filter(|r| window.contains(r.date)) {
        by_day.entry(record.date).or_default().push(record);
    }

    window
        .days()
        .map(|date| {
            let day_records = by_day.get(&date).map(Vec::as_slice).unwrap_or_default();
            day_point(date, total_employees, day_records.iter().copied())
        })
        .collect()
}
