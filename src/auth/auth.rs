use crate::{error::AttendanceError, model::role::Role, models::Claims};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};

/// The authenticated caller, placed in request extensions by
/// `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Employee row id.
    pub id: u64,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(ErrorUnauthorized("Not authorized, no token"))),
        }
    }
}

impl AuthUser {
    pub fn require_manager(&self) -> Result<(), AttendanceError> {
        if self.role == Role::Manager {
            Ok(())
        } else {
            Err(AttendanceError::Forbidden("Access denied. Manager only."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_managers_pass_the_manager_guard() {
        let mut user = AuthUser {
            id: 1,
            role: Role::Employee,
        };
        assert!(matches!(
            user.require_manager(),
            Err(AttendanceError::Forbidden(_))
        ));

        user.role = Role::Manager;
        assert!(user.require_manager().is_ok());
    }

    #[actix_web::test]
    async fn extractor_reads_the_user_set_by_middleware() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        assert!(AuthUser::extract(&req).await.is_err());

        req.extensions_mut().insert(AuthUser {
            id: 9,
            role: Role::Manager,
        });
        let user = AuthUser::extract(&req).await.unwrap();
        assert_eq!(user.id, 9);
        assert_eq!(user.role, Role::Manager);
    }
}
