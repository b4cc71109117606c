use serde::{Deserialize, Serialize};
use validator::Validate;

pub type UserId = u64;

/// Identity used for roster membership and display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub username: String,
}

impl UserRef {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// The signed-in user as reported by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub elo: Option<i32>,
}

impl CurrentUser {
    pub fn to_user_ref(&self) -> UserRef {
        UserRef::new(self.id, self.username.clone())
    }
}

// ===== API DTOs =====

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct LoginDTO {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct RegisterDTO {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_dto_validation() {
        let valid = LoginDTO {
            username: "ana".to_string(),
            password: "secret".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing = LoginDTO {
            username: String::new(),
            password: "secret".to_string(),
        };
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_register_dto_validation() {
        let valid = RegisterDTO {
            email: "ana@example.com".to_string(),
            username: "ana".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterDTO {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterDTO {
            password: "abc".to_string(),
            ..valid
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_current_user_tolerates_missing_fields() {
        let user: CurrentUser = serde_json::from_str(r#"{"id":7,"username":"bo"}"#).unwrap();
        assert_eq!(user.to_user_ref(), UserRef::new(7, "bo"));
        assert!(user.email.is_none());
    }
}
