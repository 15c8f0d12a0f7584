//! Day-status rules applied at check-in and checkout.

use chrono::{NaiveDateTime, NaiveTime};

use crate::{
    error::{AttendanceError, Result},
    model::{
        attendance::{AttendanceRecord, AttendanceStatus, Checkout, NewAttendance},
        day::Day,
    },
};

/// Check-ins strictly after this hour, to the nanosecond, are late.
pub const LATE_CUTOFF_HOUR: u32 = 9;

/// Worked days shorter than this many hours become half-days.
pub const HALF_DAY_THRESHOLD_HOURS: f64 = 4.0;

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Status for a check-in at local time `at`.
pub fn check_in_status(at: NaiveDateTime) -> AttendanceStatus {
    let cutoff = NaiveTime::from_hms_opt(LATE_CUTOFF_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    if at.time() > cutoff {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// Hours between two instants, rounded to two decimals. Never negative.
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let millis = (to - from).num_milliseconds().max(0);
    round2(millis as f64 / 3_600_000.0)
}

/// Opens today's record for `employee_id`.
///
/// `existing` is whatever is already stored for that employee and day.
pub fn begin_day(
    employee_id: u64,
    now: NaiveDateTime,
    existing: Option<&AttendanceRecord>,
) -> Result<NewAttendance> {
    if existing.is_some() {
        return Err(AttendanceError::DuplicateCheckIn);
    }

    Ok(NewAttendance {
        employee_id,
        date: Day::of(now),
        check_in_time: now,
        status: check_in_status(now),
    })
}

/// Computes the checkout for today's record.
pub fn finalize_checkout(record: Option<&AttendanceRecord>, now: NaiveDateTime) -> Result<Checkout> {
    let record = record.ok_or(AttendanceError::NoCheckInRecord)?;
    if record.check_out_time.is_some() {
        return Err(AttendanceError::AlreadyCheckedOut);
    }
    let check_in = record.check_in_time.ok_or(AttendanceError::NoCheckInRecord)?;

    let total_hours = hours_between(check_in, now);
    let status = if total_hours < HALF_DAY_THRESHOLD_HOURS {
        AttendanceStatus::HalfDay
    } else {
        record.status
    };

    Ok(Checkout {
        record_id: record.id,
        check_out_time: now,
        total_hours,
        status,
    })
}

impl AttendanceRecord {
    pub fn opened(id: u64, new: &NewAttendance) -> Self {
        Self {
            id,
            employee_id: new.employee_id,
            date: new.date,
            check_in_time: Some(new.check_in_time),
            check_out_time: None,
            status: new.status,
            total_hours: 0.0,
        }
    }

    #[cfg(test)]
    pub fn closed(mut self, checkout: &Checkout) -> Self {
        self.check_out_time = Some(checkout.check_out_time);
        self.total_hours = checkout.total_hours;
        self.status = checkout.status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn open(h: u32, m: u32) -> AttendanceRecord {
        let new = begin_day(7, at(h, m, 0), None).unwrap();
        AttendanceRecord::opened(1, &new)
    }

    #[test]
    fn cutoff_is_strictly_after_nine() {
        assert_eq!(check_in_status(at(8, 59, 59)), AttendanceStatus::Present);
        assert_eq!(check_in_status(at(9, 0, 0)), AttendanceStatus::Present);
        assert_eq!(check_in_status(at(9, 0, 1)), AttendanceStatus::Late);
        let half_second_late = at(9, 0, 0) + chrono::Duration::milliseconds(500);
        assert_eq!(check_in_status(half_second_late), AttendanceStatus::Late);
        let nanosecond_late = at(9, 0, 0) + chrono::Duration::nanoseconds(1);
        assert_eq!(check_in_status(nanosecond_late), AttendanceStatus::Late);
        assert_eq!(check_in_status(at(9, 15, 0)), AttendanceStatus::Late);
        assert_eq!(check_in_status(at(13, 0, 0)), AttendanceStatus::Late);
    }

    #[test]
    fn begin_day_builds_open_record() {
        let new = begin_day(7, at(8, 59, 0), None).unwrap();
        assert_eq!(new.employee_id, 7);
        assert_eq!(new.date.to_string(), "2026-10-19");
        assert_eq!(new.status, AttendanceStatus::Present);

        let record = AttendanceRecord::opened(1, &new);
        assert_eq!(record.total_hours, 0.0);
        assert!(record.check_out_time.is_none());
    }

    #[test]
    fn second_check_in_is_rejected() {
        let existing = open(8, 0);
        for time in [at(7, 0, 0), at(9, 0, 0), at(18, 30, 0)] {
            assert!(matches!(
                begin_day(7, time, Some(&existing)),
                Err(AttendanceError::DuplicateCheckIn)
            ));
        }
    }

    #[test]
    fn short_day_becomes_half_day() {
        let record = open(10, 0);
        assert_eq!(record.status, AttendanceStatus::Late);

        let checkout = finalize_checkout(Some(&record), at(12, 30, 0)).unwrap();
        assert_eq!(checkout.total_hours, 2.5);
        assert_eq!(checkout.status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn full_day_keeps_check_in_status() {
        let record = open(8, 0);
        let checkout = finalize_checkout(Some(&record), at(17, 0, 0)).unwrap();
        assert_eq!(checkout.total_hours, 9.0);
        assert_eq!(checkout.status, AttendanceStatus::Present);

        let late = open(9, 30);
        let checkout = finalize_checkout(Some(&late), at(18, 0, 0)).unwrap();
        assert_eq!(checkout.total_hours, 8.5);
        assert_eq!(checkout.status, AttendanceStatus::Late);
    }

    #[test]
    fn exactly_four_hours_is_not_half_day() {
        let record = open(8, 0);
        let checkout = finalize_checkout(Some(&record), at(12, 0, 0)).unwrap();
        assert_eq!(checkout.status, AttendanceStatus::Present);
    }

    #[test]
    fn hours_are_rounded_to_two_decimals() {
        let record = open(8, 0);
        // 8h 20m 0s = 8.3333...
        let checkout = finalize_checkout(Some(&record), at(16, 20, 0)).unwrap();
        assert_eq!(checkout.total_hours, 8.33);
        assert_eq!(hours_between(at(8, 0, 0), at(8, 0, 18)), 0.01);
    }

    #[test]
    fn checkout_errors() {
        assert!(matches!(
            finalize_checkout(None, at(17, 0, 0)),
            Err(AttendanceError::NoCheckInRecord)
        ));

        let record = open(8, 0);
        let checkout = finalize_checkout(Some(&record), at(17, 0, 0)).unwrap();
        let closed = record.closed(&checkout);
        assert!(matches!(
            finalize_checkout(Some(&closed), at(18, 0, 0)),
            Err(AttendanceError::AlreadyCheckedOut)
        ));
    }

    #[test]
    fn status_never_reverts_upward() {
        let record = open(8, 0);
        let checkout = finalize_checkout(Some(&record), at(9, 0, 0)).unwrap();
        let closed = record.closed(&checkout);
        assert_eq!(closed.status, AttendanceStatus::HalfDay);
        assert!(finalize_checkout(Some(&closed), at(17, 0, 0)).is_err());
        assert_eq!(closed.status, AttendanceStatus::HalfDay);
    }
}
