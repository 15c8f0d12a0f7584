use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::{error::AttendanceError, model::day::Day, model::employee::EmployeeBrief};

/// Outcome of one employee's day.
///
/// `Absent` is part of the stored vocabulary but is never assigned by the
/// check-in/out rules; absence is inferred from a missing record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
}

impl AttendanceStatus {
    /// Dashboard-level presence: anyone who showed up, half-days included.
    pub fn counts_as_attended(&self) -> bool {
        matches!(self, Self::Present | Self::Late | Self::HalfDay)
    }

    /// Day-view presence: half-days are not listed as present.
    pub fn counts_as_present_on_day(&self) -> bool {
        matches!(self, Self::Present | Self::Late)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 12,
    "employeeId": 3,
    "date": "2026-10-19",
    "checkInTime": "2026-10-19T08:52:10",
    "checkOutTime": "2026-10-19T17:31:02",
    "status": "present",
    "totalHours": 8.65
}))]
pub struct AttendanceRecord {
    pub id: u64,
    /// Owner (employee row id)
    pub employee_id: u64,
    #[schema(value_type = String, format = "date")]
    pub date: Day,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in_time: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out_time: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub total_hours: f64,
}

/// A record about to be inserted at check-in.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub date: Day,
    pub check_in_time: NaiveDateTime,
    pub status: AttendanceStatus,
}

/// Checkout values to apply to an open record.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub record_id: u64,
    pub check_out_time: NaiveDateTime,
    pub total_hours: f64,
    pub status: AttendanceStatus,
}

/// Row shape of the `attendance` table.
#[derive(Debug, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: u64,
    pub employee_id: u64,
    pub date: chrono::NaiveDate,
    pub check_in_time: Option<NaiveDateTime>,
    pub check_out_time: Option<NaiveDateTime>,
    pub status: String,
    pub total_hours: f64,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = AttendanceError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| {
            AttendanceError::DataIntegrity(format!(
                "attendance {} has unknown status {:?}",
                row.id, row.status
            ))
        })?;

        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date.into(),
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            status,
            total_hours: row.total_hours,
        })
    }
}

/// A record joined with its owner's roster details.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordWithOwner {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub owner: EmployeeBrief,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_kebab_case_everywhere() {
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "half-day");
        assert_eq!(
            "half-day".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::HalfDay
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Late).unwrap(),
            "\"late\""
        );
    }

    #[test]
    fn half_day_presence_depends_on_view() {
        assert!(AttendanceStatus::HalfDay.counts_as_attended());
        assert!(!AttendanceStatus::HalfDay.counts_as_present_on_day());
        assert!(!AttendanceStatus::Absent.counts_as_attended());
    }

    #[test]
    fn unknown_stored_status_is_an_integrity_error() {
        let row = AttendanceRow {
            id: 4,
            employee_id: 1,
            date: chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            check_in_time: None,
            check_out_time: None,
            status: "on-leave".into(),
            total_hours: 0.0,
        };
        assert!(matches!(
            AttendanceRecord::try_from(row),
            Err(AttendanceError::DataIntegrity(_))
        ));
    }
}
