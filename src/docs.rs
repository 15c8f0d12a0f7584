use crate::engine::{
    AttendanceSummary, DepartmentStat, MonthlyStats, TeamDayStatus, TeamSummary, TrendPoint,
    team::AttendedEmployee,
};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, RecordWithOwner},
    employee::{Employee, EmployeeBrief},
    role::Role,
};
use crate::models::{AuthResponse, LoginReq, RegisterReq};
use crate::service::{EmployeeStats, ManagerStats, TodayRecord, TodayStats};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = r#"
## Employee Attendance

Employees check in and out once per day. Status is derived from the times:

- check-in after **09:00:00** is `late`, otherwise `present`
- a checkout under **4 hours** after check-in becomes `half-day`
- a roster member with no record for a day is `absent`

Managers get team summaries, per-day status lists, a seven-day trend,
a per-department rollup and CSV export.

### 🔐 Security
Endpoints under `/api` (except `/api/data`) need a **JWT Bearer** token
from `/auth/login` or `/auth/register`. Manager-only endpoints answer
`403` for employees.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::register_manager,
        crate::auth::handlers::login,
        crate::auth::handlers::me,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::my_history,
        crate::api::attendance::my_summary,
        crate::api::attendance::today,
        crate::api::attendance::all_records,
        crate::api::attendance::employee_records,
        crate::api::attendance::team_summary,
        crate::api::attendance::team_day_status,
        crate::api::attendance::export,

        crate::api::dashboard::employee_stats,
        crate::api::dashboard::manager_stats,

        crate::api::data::departments
    ),
    components(
        schemas(
            RegisterReq,
            LoginReq,
            AuthResponse,
            Employee,
            EmployeeBrief,
            Role,
            AttendanceStatus,
            AttendanceRecord,
            RecordWithOwner,
            AttendanceSummary,
            TeamSummary,
            MonthlyStats,
            TeamDayStatus,
            AttendedEmployee,
            TrendPoint,
            DepartmentStat,
            EmployeeStats,
            TodayStats,
            TodayRecord,
            ManagerStats
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Attendance", description = "Check-in, checkout and record views"),
        (name = "Dashboard", description = "Employee and manager dashboards"),
        (name = "Data", description = "Reference data"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
