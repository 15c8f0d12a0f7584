//! Team-day partition: who was present, late, half-day or absent on a day.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AttendanceError, Result},
    model::{
        attendance::{AttendanceRecord, AttendanceStatus},
        day::Day,
        employee::{Employee, EmployeeBrief},
        role::Role,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendedEmployee {
    #[serde(flatten)]
    pub employee: EmployeeBrief,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in_time: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamDayStatus {
    #[schema(value_type = String, format = "date")]
    pub date: Day,
    pub total_employees: usize,
    /// Checked in as `present` or `late`.
    pub present: Vec<AttendedEmployee>,
    /// Subset of `present` that checked in late.
    pub late: Vec<AttendedEmployee>,
    /// Left early enough to be marked `half-day`.
    pub half_day: Vec<AttendedEmployee>,
    /// No record at all for the day.
    pub absent: Vec<EmployeeBrief>,
}

/// Roster members (role `employee`) that could have attended on `day`.
pub fn roster_on(roster: &[Employee], day: Day) -> impl Iterator<Item = &Employee> {
    roster
        .iter()
        .filter(move |e| e.role == Role::Employee && e.had_joined_by(day))
}

/// Indexes a single day's records by owner, refusing duplicates.
pub fn index_day<'a>(
    day: Day,
    records: &'a [AttendanceRecord],
) -> Result<HashMap<u64, &'a AttendanceRecord>> {
    let mut by_owner = HashMap::with_capacity(records.len());
    for record in records.iter().filter(|r| r.date == day) {
        if by_owner.insert(record.employee_id, record).is_some() {
            return Err(AttendanceError::DataIntegrity(format!(
                "employee {} has more than one record on {}",
                record.employee_id, day
            )));
        }
    }
    Ok(by_owner)
}

/// Partitions the roster for `day` against that day's records.
///
/// Every roster member ends up in exactly one of `present`, `half_day` or
/// `absent`. Records belonging to people outside the roster are ignored.
pub fn team_day_status(
    day: Day,
    roster: &[Employee],
    records: &[AttendanceRecord],
) -> Result<TeamDayStatus> {
    let by_owner = index_day(day, records)?;

    let mut status = TeamDayStatus {
        date: day,
        total_employees: 0,
        present: Vec::new(),
        late: Vec::new(),
        half_day: Vec::new(),
        absent: Vec::new(),
    };

    for employee in roster_on(roster, day) {
        status.total_employees += 1;

        let Some(record) = by_owner.get(&employee.id) else {
            status.absent.push(employee.brief());
            continue;
        };

        let attended = AttendedEmployee {
            employee: employee.brief(),
            check_in_time: record.check_in_time,
            status: record.status,
        };

        if record.status.counts_as_present_on_day() {
            if record.status == AttendanceStatus::Late {
                status.late.push(attended.clone());
            }
            status.present.push(attended);
        } else if record.status == AttendanceStatus::HalfDay {
            status.half_day.push(attended);
        } else {
            // a stored `absent` record
            status.absent.push(employee.brief());
        }
    }

    Ok(status)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashSet;

    pub(crate) fn employee(id: u64, department: &str, joined: &str) -> Employee {
        Employee {
            id,
            name: format!("Employee {id}"),
            email: format!("e{id}@company.com"),
            employee_id: format!("EMP{id:03}"),
            department: department.to_string(),
            role: Role::Employee,
            join_date: joined.parse().unwrap(),
        }
    }

    pub(crate) fn record(employee_id: u64, date: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: employee_id * 100,
            employee_id,
            date: date.parse().unwrap(),
            check_in_time: None,
            check_out_time: None,
            status,
            total_hours: 0.0,
        }
    }

    fn ids(list: &[AttendedEmployee]) -> Vec<u64> {
        list.iter().map(|a| a.employee.id).collect()
    }

    #[test]
    fn five_employees_three_records() {
        let roster: Vec<_> = (1..=5).map(|i| employee(i, "DevOps", "2024-01-01")).collect();
        let records = vec![
            record(1, "2026-10-19", AttendanceStatus::Present),
            record(2, "2026-10-19", AttendanceStatus::Late),
            record(3, "2026-10-19", AttendanceStatus::HalfDay),
        ];

        let status = team_day_status("2026-10-19".parse().unwrap(), &roster, &records).unwrap();
        assert_eq!(status.total_employees, 5);
        assert_eq!(ids(&status.present), vec![1, 2]);
        assert_eq!(ids(&status.late), vec![2]);
        assert_eq!(ids(&status.half_day), vec![3]);
        let absent: Vec<_> = status.absent.iter().map(|e| e.id).collect();
        assert_eq!(absent, vec![4, 5]);
    }

    #[test]
    fn partition_is_exhaustive_and_disjoint() {
        let roster: Vec<_> = (1..=12).map(|i| employee(i, "QA", "2024-01-01")).collect();
        let statuses = [
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::HalfDay,
        ];
        let records: Vec<_> = (1..=12)
            .filter(|i| i % 4 != 0)
            .map(|i| record(i, "2026-10-19", statuses[(i % 3) as usize]))
            .collect();

        let status = team_day_status("2026-10-19".parse().unwrap(), &roster, &records).unwrap();

        let mut seen = HashSet::new();
        for id in ids(&status.present)
            .into_iter()
            .chain(ids(&status.half_day))
            .chain(status.absent.iter().map(|e| e.id))
        {
            assert!(seen.insert(id), "employee {id} appears twice");
        }
        assert_eq!(seen.len(), roster.len());

        let present: HashSet<_> = ids(&status.present).into_iter().collect();
        assert!(ids(&status.late).iter().all(|id| present.contains(id)));
    }

    #[test]
    fn records_from_other_days_and_non_roster_people_are_ignored() {
        let mut manager = employee(9, "Finance", "2024-01-01");
        manager.role = Role::Manager;
        let roster = vec![employee(1, "Finance", "2024-01-01"), manager];
        let records = vec![
            record(1, "2026-10-18", AttendanceStatus::Present),
            record(9, "2026-10-19", AttendanceStatus::Present),
        ];

        let status = team_day_status("2026-10-19".parse().unwrap(), &roster, &records).unwrap();
        assert_eq!(status.total_employees, 1);
        assert!(status.present.is_empty());
        assert_eq!(status.absent.len(), 1);
    }

    #[test]
    fn employees_who_had_not_joined_are_not_absent() {
        let roster = vec![
            employee(1, "IT Support", "2024-01-01"),
            employee(2, "IT Support", "2026-10-20"),
        ];
        let status = team_day_status("2026-10-19".parse().unwrap(), &roster, &[]).unwrap();
        assert_eq!(status.total_employees, 1);
        assert_eq!(status.absent.len(), 1);
        assert_eq!(status.absent[0].id, 1);
    }

    #[test]
    fn duplicate_records_are_an_integrity_violation() {
        let roster = vec![employee(1, "UI/UX", "2024-01-01")];
        let records = vec![
            record(1, "2026-10-19", AttendanceStatus::Present),
            record(1, "2026-10-19", AttendanceStatus::Late),
        ];
        assert!(matches!(
            team_day_status("2026-10-19".parse().unwrap(), &roster, &records),
            Err(AttendanceError::DataIntegrity(_))
        ));
    }
}
