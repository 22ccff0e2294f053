use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Login body. Either `username` or `email` identifies the admin.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn login_id(&self) -> Option<&str> {
        self.username
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.email.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_id_prefers_username() {
        let req = LoginRequest {
            username: Some("admin".to_string()),
            email: Some("studio@example.com".to_string()),
            password: "pw".to_string(),
        };
        assert_eq!(req.login_id(), Some("admin"));
    }

    #[test]
    fn test_login_id_falls_back_to_email() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"admin","password":"pw"}"#).unwrap();
        assert_eq!(req.login_id(), Some("admin"));
    }

    #[test]
    fn test_login_id_missing() {
        let req: LoginRequest = serde_json::from_str(r#"{"username":"","password":"pw"}"#).unwrap();
        assert_eq!(req.login_id(), None);
    }
}
