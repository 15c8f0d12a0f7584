use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;
use tracing::debug;

use crate::{
    error::{AttendanceError, Result},
    model::{
        attendance::{AttendanceRecord, AttendanceRow, Checkout, NewAttendance, RecordWithOwner},
        day::{Day, DayRange},
        employee::{Credentials, Employee, EmployeeBrief, EmployeeRow, NewEmployee},
        role::Role,
    },
    repository::{AttendanceRepository, EmployeeRepository, RecordFilter},
};

const ATTENDANCE_COLUMNS: &str =
    "id, employee_id, `date`, check_in_time, check_out_time, status, total_hours";

const EMPLOYEE_COLUMNS: &str = "id, name, email, employee_code, department, role, join_date";

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Date(NaiveDate),
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub struct MySqlAttendanceRepository {
    pool: MySqlPool,
}

impl MySqlAttendanceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_records(
        &self,
        where_sql: &str,
        args: Vec<FilterValue>,
    ) -> Result<Vec<AttendanceRecord>> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE 1 = 1{where_sql} ORDER BY `date` DESC, id DESC"
        );
        debug!(sql = %sql, "Fetching attendance");

        let mut query = sqlx::query_as::<_, AttendanceRow>(&sql);
        for arg in args {
            query = match arg {
                FilterValue::U64(v) => query.bind(v),
                FilterValue::Date(d) => query.bind(d),
            };
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(AttendanceRecord::try_from)
            .collect()
    }

    async fn fetch_by_id(&self, id: u64) -> Result<AttendanceRecord> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AttendanceError::NotFound(format!("Attendance record {id}")))?;

        row.try_into()
    }
}

fn push_range(where_sql: &mut String, args: &mut Vec<FilterValue>, range: Option<DayRange>) {
    if let Some(range) = range {
        where_sql.push_str(" AND a.`date` BETWEEN ? AND ?");
        args.push(FilterValue::Date(range.start.date()));
        args.push(FilterValue::Date(range.end.date()));
    }
}

#[async_trait]
impl AttendanceRepository for MySqlAttendanceRepository {
    async fn find_for_day(&self, employee_id: u64, day: Day) -> Result<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? AND `date` = ?"
        ))
        .bind(employee_id)
        .bind(day.date())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }

    async fn insert(&self, new: &NewAttendance) -> Result<AttendanceRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, `date`, check_in_time, status, total_hours)
            VALUES (?, ?, ?, ?, 0)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.date.date())
        .bind(new.check_in_time)
        .bind(new.status.as_ref())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(AttendanceRecord::opened(done.last_insert_id(), new)),
            // Duplicate check-in for same day
            Err(e) if is_unique_violation(&e) => Err(AttendanceError::DuplicateCheckIn),
            Err(e) => Err(e.into()),
        }
    }

    async fn checkout(&self, checkout: &Checkout) -> Result<AttendanceRecord> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET check_out_time = ?, total_hours = ?, status = ?
            WHERE id = ?
            AND check_out_time IS NULL
            "#,
        )
        .bind(checkout.check_out_time)
        .bind(checkout.total_hours)
        .bind(checkout.status.as_ref())
        .bind(checkout.record_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AttendanceError::AlreadyCheckedOut);
        }

        self.fetch_by_id(checkout.record_id).await
    }

    async fn list_for_employee(
        &self,
        employee_id: u64,
        range: Option<DayRange>,
    ) -> Result<Vec<AttendanceRecord>> {
        let mut where_sql = String::from(" AND employee_id = ?");
        let mut args = vec![FilterValue::U64(employee_id)];
        if let Some(range) = range {
            where_sql.push_str(" AND `date` BETWEEN ? AND ?");
            args.push(FilterValue::Date(range.start.date()));
            args.push(FilterValue::Date(range.end.date()));
        }
        self.fetch_records(&where_sql, args).await
    }

    async fn list_range(&self, range: DayRange) -> Result<Vec<AttendanceRecord>> {
        let args = vec![
            FilterValue::Date(range.start.date()),
            FilterValue::Date(range.end.date()),
        ];
        self.fetch_records(" AND `date` BETWEEN ? AND ?", args).await
    }

    async fn list_with_owner(&self, filter: &RecordFilter) -> Result<Vec<RecordWithOwner>> {
        let mut where_sql = String::new();
        let mut args = Vec::new();
        push_range(&mut where_sql, &mut args, filter.range);

        if let Some(ids) = &filter.employee_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let marks = vec!["?"; ids.len()].join(", ");
            where_sql.push_str(&format!(" AND a.employee_id IN ({marks})"));
            args.extend(ids.iter().copied().map(FilterValue::U64));
        }

        let sql = format!(
            r#"
            SELECT a.id, a.employee_id, a.`date`, a.check_in_time, a.check_out_time,
                   a.status, a.total_hours,
                   e.name AS owner_name, e.email AS owner_email,
                   e.employee_code AS owner_code, e.department AS owner_department
            FROM attendance a
            JOIN employees e ON e.id = a.employee_id
            WHERE 1 = 1{where_sql}
            ORDER BY a.`date` DESC, a.id DESC
            "#
        );
        debug!(sql = %sql, "Fetching attendance with owners");

        let mut query = sqlx::query_as::<_, OwnedRow>(&sql);
        for arg in args {
            query = match arg {
                FilterValue::U64(v) => query.bind(v),
                FilterValue::Date(d) => query.bind(d),
            };
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(RecordWithOwner::try_from)
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct OwnedRow {
    id: u64,
    employee_id: u64,
    date: NaiveDate,
    check_in_time: Option<NaiveDateTime>,
    check_out_time: Option<NaiveDateTime>,
    status: String,
    total_hours: f64,
    owner_name: String,
    owner_email: String,
    owner_code: String,
    owner_department: String,
}

impl TryFrom<OwnedRow> for RecordWithOwner {
    type Error = AttendanceError;

    fn try_from(row: OwnedRow) -> Result<Self> {
        let owner = EmployeeBrief {
            id: row.employee_id,
            name: row.owner_name,
            email: row.owner_email,
            employee_id: row.owner_code,
            department: row.owner_department,
        };
        let record = AttendanceRow {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            status: row.status,
            total_hours: row.total_hours,
        }
        .try_into()?;

        Ok(Self { record, owner })
    }
}

pub struct MySqlEmployeeRepository {
    pool: MySqlPool,
}

impl MySqlEmployeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    employee: EmployeeRow,
    password: String,
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    async fn list(&self, role: Option<Role>) -> Result<Vec<Employee>> {
        let rows = match role {
            Some(role) => {
                sqlx::query_as::<_, EmployeeRow>(&format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE role = ? ORDER BY id"
                ))
                .bind(role.as_ref())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, EmployeeRow>(&format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Employee::try_from).collect()
    }

    async fn find(&self, id: u64) -> Result<Option<Employee>> {
        sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Employee::try_from)
        .transpose()
    }

    async fn find_credentials(&self, login: &str) -> Result<Option<Credentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            r#"
            SELECT {EMPLOYEE_COLUMNS}, password
            FROM employees
            WHERE email = ? OR employee_code = ?
            ORDER BY email = ? DESC
            LIMIT 1
            "#
        ))
        .bind(login.to_lowercase())
        .bind(login)
        .bind(login.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(Credentials {
                employee: r.employee.try_into()?,
                password_hash: r.password,
            })
        })
        .transpose()
    }

    async fn employee_codes(&self) -> Result<Vec<String>> {
        let codes = sqlx::query_scalar::<_, String>(
            "SELECT employee_code FROM employees WHERE employee_code REGEXP '^EMP[0-9]+$'",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(codes)
    }

    async fn create(&self, new: &NewEmployee, code: &str) -> Result<Employee> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (name, email, employee_code, password, department, role, join_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(code)
        .bind(&new.password_hash)
        .bind(&new.department)
        .bind(new.role.as_ref())
        .bind(new.join_date.date())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(Employee {
                id: done.last_insert_id(),
                name: new.name.clone(),
                email: new.email.clone(),
                employee_id: code.to_string(),
                department: new.department.clone(),
                role: new.role,
                join_date: new.join_date,
            }),
            Err(sqlx::Error::Database(db_err))
                if db_err.is_unique_violation() && db_err.message().contains("uq_employees_email") =>
            {
                Err(AttendanceError::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }
}
