use crate::{
    auth::auth::AuthUser,
    error::Result,
    service::{AttendanceService, EmployeeStats, ManagerStats},
};
use actix_web::web;

/// Month-to-date numbers, today's record and the last week for the caller
#[utoipa::path(
    get,
    path = "/api/dashboard/employee",
    responses((status = 200, body = EmployeeStats)),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn employee_stats(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> Result<web::Json<EmployeeStats>> {
    Ok(web::Json(service.employee_stats(auth.id).await?))
}

/// Team overview for today plus the seven-day trend (manager only)
#[utoipa::path(
    get,
    path = "/api/dashboard/manager",
    responses(
        (status = 200, body = ManagerStats),
        (status = 403, description = "Manager only")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn manager_stats(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> Result<web::Json<ManagerStats>> {
    auth.require_manager()?;
    Ok(web::Json(service.manager_stats().await?))
}
