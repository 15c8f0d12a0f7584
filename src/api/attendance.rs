use crate::{
    auth::auth::AuthUser,
    engine::{AttendanceSummary, TeamDayStatus, TeamSummary},
    error::Result,
    model::{
        attendance::{AttendanceRecord, RecordWithOwner},
        day::{Day, DayRange},
    },
    service::{AttendanceService, ExportFilter, TodayRecord},
};
use actix_web::{HttpResponse, Responder, http::header, web};
use serde::Deserialize;
use utoipa::IntoParams;

/// A range applies only when both bounds are given.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    #[param(value_type = Option<String>, example = "2026-10-01")]
    pub start_date: Option<Day>,
    #[param(value_type = Option<String>, example = "2026-10-31")]
    pub end_date: Option<Day>,
}

impl RangeQuery {
    pub fn range(&self) -> Option<DayRange> {
        Some(DayRange::new(self.start_date?, self.end_date?))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    #[param(value_type = Option<String>)]
    pub start_date: Option<Day>,
    #[param(value_type = Option<String>)]
    pub end_date: Option<Day>,
    /// Employee row id.
    pub employee_id: Option<u64>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// Defaults to today.
    #[param(value_type = Option<String>, example = "2026-10-19")]
    pub date: Option<Day>,
}

/// Check in for today
#[utoipa::path(
    post,
    path = "/api/attendance/checkin",
    responses(
        (status = 201, description = "Checked in", body = AttendanceRecord),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(auth: AuthUser, service: web::Data<AttendanceService>) -> Result<HttpResponse> {
    let record = service.check_in(auth.id).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Check out for today
#[utoipa::path(
    post,
    path = "/api/attendance/checkout",
    responses(
        (status = 200, description = "Checked out", body = AttendanceRecord),
        (status = 400, description = "No check-in today, or already checked out", body = Object, example = json!({
            "message": "No check-in record found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> Result<web::Json<AttendanceRecord>> {
    Ok(web::Json(service.check_out(auth.id).await?))
}

/// The caller's full history, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/my-history",
    responses((status = 200, body = Vec<AttendanceRecord>)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn my_history(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> Result<web::Json<Vec<AttendanceRecord>>> {
    Ok(web::Json(service.history(auth.id).await?))
}

/// The caller's status counts; defaults to the current month
#[utoipa::path(
    get,
    path = "/api/attendance/my-summary",
    params(RangeQuery),
    responses((status = 200, body = AttendanceSummary)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn my_summary(
    auth: AuthUser,
    query: web::Query<RangeQuery>,
    service: web::Data<AttendanceService>,
) -> Result<web::Json<AttendanceSummary>> {
    Ok(web::Json(service.summary(auth.id, query.range()).await?))
}

/// The caller's record for today, or `{"status": "not-marked"}`
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses((status = 200, body = TodayRecord)),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> Result<web::Json<TodayRecord>> {
    Ok(web::Json(service.today_status(auth.id).await?))
}

/// Every record with its owner (manager only)
#[utoipa::path(
    get,
    path = "/api/attendance/all",
    responses(
        (status = 200, body = Vec<RecordWithOwner>),
        (status = 403, description = "Manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn all_records(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> Result<web::Json<Vec<RecordWithOwner>>> {
    auth.require_manager()?;
    Ok(web::Json(service.all_records().await?))
}

/// One employee's records (manager only)
#[utoipa::path(
    get,
    path = "/api/attendance/employee/{id}",
    params(("id" = u64, Path, description = "Employee row id")),
    responses(
        (status = 200, body = Vec<RecordWithOwner>),
        (status = 403, description = "Manager only"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn employee_records(
    auth: AuthUser,
    path: web::Path<u64>,
    service: web::Data<AttendanceService>,
) -> Result<web::Json<Vec<RecordWithOwner>>> {
    auth.require_manager()?;
    Ok(web::Json(service.employee_records(path.into_inner()).await?))
}

/// Team-wide status counts (manager only)
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    params(RangeQuery),
    responses(
        (status = 200, body = TeamSummary),
        (status = 403, description = "Manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn team_summary(
    auth: AuthUser,
    query: web::Query<RangeQuery>,
    service: web::Data<AttendanceService>,
) -> Result<web::Json<TeamSummary>> {
    auth.require_manager()?;
    Ok(web::Json(service.team_summary(query.range()).await?))
}

/// Who is in, late, half-day or absent on a day (manager only)
#[utoipa::path(
    get,
    path = "/api/attendance/today-status",
    params(DateQuery),
    responses(
        (status = 200, body = TeamDayStatus),
        (status = 403, description = "Manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn team_day_status(
    auth: AuthUser,
    query: web::Query<DateQuery>,
    service: web::Data<AttendanceService>,
) -> Result<web::Json<TeamDayStatus>> {
    auth.require_manager()?;
    Ok(web::Json(service.team_day_status(query.date).await?))
}

/// Filtered records as CSV (manager only)
#[utoipa::path(
    get,
    path = "/api/attendance/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "CSV report", content_type = "text/csv", body = String),
        (status = 403, description = "Manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn export(
    auth: AuthUser,
    query: web::Query<ExportQuery>,
    service: web::Data<AttendanceService>,
) -> Result<impl Responder> {
    auth.require_manager()?;

    let query = query.into_inner();
    let range = RangeQuery {
        start_date: query.start_date,
        end_date: query.end_date,
    }
    .range();
    let csv = service
        .export_csv(ExportFilter {
            range,
            employee_id: query.employee_id,
            department: query.department.filter(|d| !d.is_empty()),
        })
        .await?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=attendance-report.csv",
        ))
        .body(csv))
}
