//! Resource ownership gate.
//!
//! Every mutating machine workflow passes through `authorize_owner` before
//! touching persistence. The check is deliberately a pure function over the
//! session user and the stored `admin_id` so it can be tested without a
//! database, and so the rule lives in exactly one place.

use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::ServiceError;

/// Allow the operation only when the session user owns the resource.
pub fn authorize_owner(user: &AuthUser, resource_owner_id: Uuid) -> Result<(), ServiceError> {
    if user.user_id == resource_owner_id {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "you do not own this resource".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn session_user(id: Uuid) -> AuthUser {
        AuthUser {
            user_id: id,
            email: "admin@gruntex.example".to_string(),
            name: "Admin".to_string(),
            token_id: "jti".to_string(),
        }
    }

    #[test]
    fn owner_is_allowed() {
        let id = Uuid::new_v4();
        assert!(authorize_owner(&session_user(id), id).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let user = session_user(Uuid::new_v4());
        let err = authorize_owner(&user, Uuid::new_v4()).unwrap_err();
        assert_matches!(err, ServiceError::Forbidden(_));
    }
}
