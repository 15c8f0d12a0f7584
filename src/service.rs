//! Attendance operations: load from the repositories, apply the engine,
//! persist.

use std::{collections::HashSet, sync::Arc};

use serde::Serialize;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::{
    auth::password::{hash_password, verify_password},
    clock::Clock,
    engine::{
        self, AttendanceSummary, DepartmentStat, MonthlyStats, TeamDayStatus, TeamSummary,
        TrendPoint, team::AttendedEmployee, trend::TREND_DAYS,
    },
    error::{AttendanceError, Result},
    model::{
        attendance::{AttendanceRecord, AttendanceStatus, RecordWithOwner},
        day::{Day, DayRange},
        employee::{Employee, EmployeeBrief, NewEmployee},
        role::Role,
    },
    repository::{AttendanceRepository, EmployeeRepository, RecordFilter},
    roster::{Departments, ValidRegistration, next_employee_code},
    utils::{csv_export::records_to_csv, roster_cache::RosterCache},
};

/// How far back the employee dashboard's "recent attendance" reaches.
const RECENT_DAYS: u64 = 7;

#[derive(Debug, Clone, Default)]
pub struct ExportFilter {
    pub range: Option<DayRange>,
    pub employee_id: Option<u64>,
    pub department: Option<String>,
}

/// Today's record, or `{"status": "not-marked"}` before check-in.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum TodayRecord {
    Marked(AttendanceRecord),
    NotMarked { status: String },
}

impl From<Option<AttendanceRecord>> for TodayRecord {
    fn from(record: Option<AttendanceRecord>) -> Self {
        match record {
            Some(record) => Self::Marked(record),
            None => Self::NotMarked {
                status: "not-marked".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStats {
    #[serde(flatten)]
    pub month: MonthlyStats,
    #[serde(rename = "todayStatus")]
    pub today: TodayRecord,
    pub recent_attendance: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TodayStats {
    pub present: usize,
    pub absent: i64,
    pub late: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerStats {
    pub total_employees: usize,
    pub today_stats: TodayStats,
    pub absent_employees: Vec<EmployeeBrief>,
    pub late_employees: Vec<AttendedEmployee>,
    pub weekly_trend: Vec<TrendPoint>,
    pub department_stats: Vec<DepartmentStat>,
    pub all_employees_list: Vec<Employee>,
}

pub struct AttendanceService {
    attendance: Arc<dyn AttendanceRepository>,
    employees: Arc<dyn EmployeeRepository>,
    roster: RosterCache,
    clock: Arc<dyn Clock>,
    departments: Departments,
}

impl AttendanceService {
    pub fn new(
        attendance: Arc<dyn AttendanceRepository>,
        employees: Arc<dyn EmployeeRepository>,
        roster: RosterCache,
        clock: Arc<dyn Clock>,
        departments: Departments,
    ) -> Self {
        Self {
            attendance,
            employees,
            roster,
            clock,
            departments,
        }
    }

    pub fn departments(&self) -> &Departments {
        &self.departments
    }

    pub fn today(&self) -> Day {
        Day::of(self.clock.now())
    }

    /* =========================
    Check-in / checkout
    ========================= */

    #[instrument(skip(self))]
    pub async fn check_in(&self, employee_id: u64) -> Result<AttendanceRecord> {
        let now = self.clock.now();
        let existing = self.attendance.find_for_day(employee_id, Day::of(now)).await?;
        let new = engine::begin_day(employee_id, now, existing.as_ref())?;

        let record = self.attendance.insert(&new).await?;
        info!(record_id = record.id, status = %record.status, "Checked in");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn check_out(&self, employee_id: u64) -> Result<AttendanceRecord> {
        let now = self.clock.now();
        let existing = self.attendance.find_for_day(employee_id, Day::of(now)).await?;
        let checkout = engine::finalize_checkout(existing.as_ref(), now)?;

        let record = self.attendance.checkout(&checkout).await?;
        info!(
            record_id = record.id,
            status = %record.status,
            total_hours = record.total_hours,
            "Checked out"
        );
        Ok(record)
    }

    /* =========================
    Personal views
    ========================= */

    pub async fn history(&self, employee_id: u64) -> Result<Vec<AttendanceRecord>> {
        self.attendance.list_for_employee(employee_id, None).await
    }

    pub async fn today_status(&self, employee_id: u64) -> Result<TodayRecord> {
        let record = self.attendance.find_for_day(employee_id, self.today()).await?;
        Ok(record.into())
    }

    /// Status counts for `range`, defaulting to the current month.
    pub async fn summary(&self, employee_id: u64, range: Option<DayRange>) -> Result<AttendanceSummary> {
        let range = range.unwrap_or_else(|| DayRange::month_of(self.today()));
        let records = self
            .attendance
            .list_for_employee(employee_id, Some(range))
            .await?;
        Ok(engine::summarize(&records, range))
    }

    pub async fn employee_stats(&self, employee_id: u64) -> Result<EmployeeStats> {
        let today = self.today();
        let month_records = self
            .attendance
            .list_for_employee(employee_id, Some(DayRange::month_of(today)))
            .await?;
        let recent_attendance = self
            .attendance
            .list_for_employee(
                employee_id,
                Some(DayRange::new(today.minus_days(RECENT_DAYS), today)),
            )
            .await?;

        Ok(EmployeeStats {
            month: engine::monthly_stats(&month_records, today),
            today: month_records.iter().find(|r| r.date == today).cloned().into(),
            recent_attendance,
        })
    }

    /* =========================
    Manager views
    ========================= */

    pub async fn find_employee(&self, id: u64) -> Result<Employee> {
        self.employees
            .find(id)
            .await?
            .ok_or_else(|| AttendanceError::NotFound("Employee".into()))
    }

    pub async fn all_records(&self) -> Result<Vec<RecordWithOwner>> {
        self.attendance.list_with_owner(&RecordFilter::default()).await
    }

    pub async fn employee_records(&self, employee_id: u64) -> Result<Vec<RecordWithOwner>> {
        self.find_employee(employee_id).await?;
        self.attendance
            .list_with_owner(&RecordFilter {
                range: None,
                employee_ids: Some(vec![employee_id]),
            })
            .await
    }

    pub async fn team_summary(&self, range: Option<DayRange>) -> Result<TeamSummary> {
        let records = self
            .attendance
            .list_with_owner(&RecordFilter {
                range,
                employee_ids: None,
            })
            .await?;
        Ok(engine::team_summary(records.iter().map(|r| &r.record)))
    }

    pub async fn team_day_status(&self, day: Option<Day>) -> Result<TeamDayStatus> {
        let day = day.unwrap_or_else(|| self.today());
        let roster = self.roster.roster(self.employees.as_ref()).await?;
        let records = self.attendance.list_range(DayRange::single(day)).await?;
        engine::team_day_status(day, &roster, &records)
    }

    async fn today_with_owner(&self) -> Result<Vec<RecordWithOwner>> {
        self.attendance
            .list_with_owner(&RecordFilter {
                range: Some(DayRange::single(self.today())),
                employee_ids: None,
            })
            .await
    }

    pub async fn manager_stats(&self) -> Result<ManagerStats> {
        let today = self.today();
        let roster = self.roster.roster(self.employees.as_ref()).await?;
        let today_records = self.today_with_owner().await?;
        let week_records = self
            .attendance
            .list_range(DayRange::trailing(today, TREND_DAYS))
            .await?;

        let point = engine::day_point(today, roster.len(), today_records.iter().map(|r| &r.record));
        let recorded: HashSet<u64> = today_records.iter().map(|r| r.record.employee_id).collect();

        let absent_employees = roster
            .iter()
            .filter(|e| !recorded.contains(&e.id))
            .map(Employee::brief)
            .collect();
        let late_employees = today_records
            .iter()
            .filter(|r| r.record.status == AttendanceStatus::Late)
            .map(|r| AttendedEmployee {
                employee: r.owner.clone(),
                check_in_time: r.record.check_in_time,
                status: r.record.status,
            })
            .collect();

        debug!(present = point.present, late = point.late, "Manager stats computed");

        Ok(ManagerStats {
            total_employees: roster.len(),
            today_stats: TodayStats {
                present: point.present,
                absent: point.absent,
                late: point.late,
            },
            absent_employees,
            late_employees,
            weekly_trend: engine::weekly_trend(today, roster.len(), &week_records),
            department_stats: engine::department_rollup(&today_records, &roster),
            all_employees_list: roster.as_ref().clone(),
        })
    }

    pub async fn export_csv(&self, filter: ExportFilter) -> Result<String> {
        let mut employee_ids = filter.employee_id.map(|id| vec![id]);

        if let Some(department) = filter.department.as_deref() {
            let in_department: Vec<u64> = self
                .roster
                .roster(self.employees.as_ref())
                .await?
                .iter()
                .filter(|e| e.department == department)
                .map(|e| e.id)
                .collect();

            employee_ids = Some(match employee_ids {
                Some(ids) => ids.into_iter().filter(|id| in_department.contains(id)).collect(),
                None => in_department,
            });
        }

        let records = self
            .attendance
            .list_with_owner(&RecordFilter {
                range: filter.range,
                employee_ids,
            })
            .await?;
        info!(rows = records.len(), "Exporting attendance");
        records_to_csv(&records)
    }

    /* =========================
    Registration / login
    ========================= */

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: ValidRegistration, role: Role) -> Result<Employee> {
        let codes = self.employees.employee_codes().await?;
        let code = next_employee_code(codes.iter().map(String::as_str));

        let new = NewEmployee {
            name: registration.name,
            email: registration.email,
            password_hash: hash_password(&registration.password)?,
            department: registration.department,
            role,
            join_date: self.today(),
        };

        let employee = self.employees.create(&new, &code).await?;
        self.roster.invalidate().await;
        info!(employee_id = employee.id, code = %employee.employee_id, "Registered");
        Ok(employee)
    }

    pub async fn authenticate(&self, login: &str, password: &str) -> Result<Employee> {
        let credentials = self
            .employees
            .find_credentials(login.trim())
            .await?
            .ok_or(AttendanceError::InvalidCredentials)?;

        verify_password(password, &credentials.password_hash)
            .map_err(|_| AttendanceError::InvalidCredentials)?;
        Ok(credentials.employee)
    }
}
