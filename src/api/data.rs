use crate::service::AttendanceService;
use actix_web::web;

/// Departments accepted at registration (public)
#[utoipa::path(
    get,
    path = "/api/data/departments",
    responses((status = 200, body = Vec<String>)),
    tag = "Data"
)]
pub async fn departments(service: web::Data<AttendanceService>) -> web::Json<Vec<String>> {
    web::Json(service.departments().as_slice().to_vec())
}
