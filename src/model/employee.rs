use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AttendanceError,
    model::{day::Day, role::Role},
};

/// A roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "name": "John Doe",
        "email": "john.doe@company.com",
        "employeeId": "EMP001",
        "department": "DevOps",
        "role": "employee",
        "joinDate": "2024-01-01"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    /// Human-facing employee code (`EMP001`, ...)
    #[schema(example = "EMP001")]
    pub employee_id: String,

    #[schema(example = "DevOps")]
    pub department: String,

    pub role: Role,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub join_date: Day,
}

impl Employee {
    /// Whether `day` can be attributed to this employee at all.
    pub fn had_joined_by(&self, day: Day) -> bool {
        self.join_date <= day
    }

    pub fn brief(&self) -> EmployeeBrief {
        EmployeeBrief {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            employee_id: self.employee_id.clone(),
            department: self.department.clone(),
        }
    }
}

/// Owner details embedded in record listings.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeBrief {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub employee_id: String,
    pub department: String,
}

/// Row shape of the `employees` table (without the password hash).
#[derive(Debug, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub employee_code: String,
    pub department: String,
    pub role: String,
    pub join_date: NaiveDate,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = AttendanceError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let role = Role::from_id(&row.role).ok_or_else(|| {
            AttendanceError::DataIntegrity(format!(
                "employee {} has unknown role {:?}",
                row.id, row.role
            ))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            employee_id: row.employee_code,
            department: row.department,
            role,
            join_date: row.join_date.into(),
        })
    }
}

/// Validated registration data, ready to insert.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub department: String,
    pub role: Role,
    pub join_date: Day,
}

/// Login lookup result.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub employee: Employee,
    pub password_hash: String,
}
