use crate::{
    auth::{auth::AuthUser, jwt::generate_access_token},
    config::Config,
    error::{AttendanceError, Result},
    model::{employee::Employee, role::Role},
    models::{AuthResponse, LoginReq, RegisterReq},
    roster::validate_registration,
    service::AttendanceService,
};
use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument};

async fn register_as(
    body: RegisterReq,
    role: Role,
    service: &AttendanceService,
    config: &Config,
) -> Result<HttpResponse> {
    let registration = validate_registration(
        body.name.as_deref(),
        body.email.as_deref(),
        body.password.as_deref(),
        body.department.as_deref(),
        service.departments(),
    )?;

    let employee = service.register(registration, role).await?;
    let token = generate_access_token(&employee, &config.jwt_secret, config.access_token_ttl)?;

    Ok(HttpResponse::Created().json(AuthResponse { employee, token }))
}

/// Register an employee
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Registered", body = AuthResponse),
        (status = 400, description = "Missing field or unknown department"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "Auth"
)]
pub async fn register(
    body: web::Json<RegisterReq>,
    service: web::Data<AttendanceService>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    register_as(body.into_inner(), Role::Employee, &service, &config).await
}

/// Register a manager
#[utoipa::path(
    post,
    path = "/auth/register/manager",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Registered", body = AuthResponse),
        (status = 400, description = "Missing field or unknown department"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "Auth"
)]
pub async fn register_manager(
    body: web::Json<RegisterReq>,
    service: web::Data<AttendanceService>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    register_as(body.into_inner(), Role::Manager, &service, &config).await
}

/// Log in with an email address or an employee code
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Missing login or password"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(body, service, config))]
pub async fn login(
    body: web::Json<LoginReq>,
    service: web::Data<AttendanceService>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let (Some(login), Some(password)) = (
        body.email.as_deref().filter(|l| !l.trim().is_empty()),
        body.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AttendanceError::Validation(
            "Please provide email/employeeId and password".into(),
        ));
    };

    debug!("Verifying credentials");
    let employee = service.authenticate(login, password).await?;
    let token = generate_access_token(&employee, &config.jwt_secret, config.access_token_ttl)?;

    info!(employee_id = employee.id, "Login successful");
    Ok(HttpResponse::Ok().json(AuthResponse { employee, token }))
}

/// Profile of the caller
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current employee", body = Employee),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee no longer exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(auth: AuthUser, service: web::Data<AttendanceService>) -> Result<web::Json<Employee>> {
    Ok(web::Json(service.find_employee(auth.id).await?))
}
