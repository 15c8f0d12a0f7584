//! Range aggregation over one employee's (or everyone's) records.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    engine::status::round2,
    model::{
        attendance::{AttendanceRecord, AttendanceStatus},
        day::{Day, DayRange},
    },
};

/// Per-status counts over a range, by status equality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub half_day: usize,
    pub total_hours: f64,
}

impl AttendanceSummary {
    fn tally(&mut self, record: &AttendanceRecord) {
        match record.status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::HalfDay => self.half_day += 1,
        }
        self.total_hours += record.total_hours;
    }
}

/// Summarizes the records dated inside `range`. Days without a record are
/// not counted as anything.
pub fn summarize<'a, I>(records: I, range: DayRange) -> AttendanceSummary
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut summary = records
        .into_iter()
        .filter(|r| range.contains(r.date))
        .fold(AttendanceSummary::default(), |mut acc, r| {
            acc.tally(r);
            acc
        });
    summary.total_hours = round2(summary.total_hours);
    summary
}

/// Month-to-date numbers shown on the employee dashboard.
///
/// Any record counts as a present day (half-days included), and absence is
/// approximated as elapsed days minus present days rather than enumerated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub half_day: usize,
    pub total_hours: f64,
}

pub fn monthly_stats(month_records: &[AttendanceRecord], today: Day) -> MonthlyStats {
    let month = DayRange::month_of(today);
    let in_month: Vec<_> = month_records
        .iter()
        .filter(|r| month.contains(r.date))
        .collect();

    let present = in_month.len();
    let days_elapsed = today.day_of_month() as usize;
    let by_status = summarize(in_month.iter().copied(), month);

    MonthlyStats {
        present,
        absent: days_elapsed.saturating_sub(present),
        late: by_status.late,
        half_day: by_status.half_day,
        total_hours: by_status.total_hours,
    }
}

/// Team-wide totals for the manager report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub total_records: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub half_day: usize,
}

pub fn team_summary<'a, I>(records: I) -> TeamSummary
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut total_records = 0;
    let mut counts = AttendanceSummary::default();
    for record in records {
        total_records += 1;
        counts.tally(record);
    }

    TeamSummary {
        total_records,
        present: counts.present,
        absent: counts.absent,
        late: counts.late,
        half_day: counts.half_day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, status: AttendanceStatus, hours: f64) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            employee_id: 1,
            date: date.parse().unwrap(),
            check_in_time: None,
            check_out_time: None,
            status,
            total_hours: hours,
        }
    }

    #[test]
    fn counts_each_status_and_sums_hours() {
        let records = vec![
            record("2026-10-01", AttendanceStatus::Present, 8.33),
            record("2026-10-02", AttendanceStatus::Late, 7.91),
            record("2026-10-05", AttendanceStatus::HalfDay, 2.5),
            record("2026-10-06", AttendanceStatus::Present, 0.0),
        ];
        let range = DayRange::month_of("2026-10-19".parse().unwrap());
        let summary = summarize(&records, range);

        assert_eq!(summary.present, 2);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.half_day, 1);
        assert_eq!(summary.absent, 0);
        assert_eq!(summary.total_hours, 18.74);
    }

    #[test]
    fn records_outside_range_are_ignored() {
        let records = vec![
            record("2026-09-30", AttendanceStatus::Present, 9.0),
            record("2026-10-01", AttendanceStatus::Present, 9.0),
        ];
        let range = DayRange::month_of("2026-10-19".parse().unwrap());
        let summary = summarize(&records, range);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.total_hours, 9.0);
    }

    #[test]
    fn hours_sum_is_rounded() {
        let records: Vec<_> = (1..=3)
            .map(|d| record(&format!("2026-10-0{d}"), AttendanceStatus::Present, 0.1))
            .collect();
        let summary = summarize(&records, DayRange::month_of("2026-10-01".parse().unwrap()));
        assert_eq!(summary.total_hours, 0.3);
    }

    #[test]
    fn monthly_absence_is_elapsed_minus_recorded() {
        let records = vec![
            record("2026-10-01", AttendanceStatus::Present, 8.0),
            record("2026-10-02", AttendanceStatus::HalfDay, 3.0),
            record("2026-10-05", AttendanceStatus::Late, 8.0),
        ];
        let stats = monthly_stats(&records, "2026-10-10".parse().unwrap());
        assert_eq!(stats.present, 3);
        assert_eq!(stats.absent, 7);
        assert_eq!(stats.late, 1);
        assert_eq!(stats.half_day, 1);
        assert_eq!(stats.total_hours, 19.0);
    }

    #[test]
    fn monthly_absence_never_goes_negative() {
        let records = vec![
            record("2026-10-01", AttendanceStatus::Present, 8.0),
            record("2026-10-02", AttendanceStatus::Present, 8.0),
        ];
        let stats = monthly_stats(&records, "2026-10-01".parse().unwrap());
        assert_eq!(stats.absent, 0);
    }

    #[test]
    fn team_summary_uses_status_equality() {
        let records = vec![
            record("2026-10-01", AttendanceStatus::Present, 8.0),
            record("2026-10-01", AttendanceStatus::Late, 8.0),
            record("2026-10-01", AttendanceStatus::HalfDay, 3.0),
        ];
        let summary = team_summary(&records);
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.half_day, 1);
    }
}
