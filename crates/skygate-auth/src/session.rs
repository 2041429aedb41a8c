//! Session value objects and the results of auth operations.

use serde::{Deserialize, Serialize};

/// Outcome of validating the stored token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    Authenticated,
    #[default]
    Unauthenticated,
}

impl AuthStatus {
    pub fn is_authenticated(self) -> bool {
        matches!(self, AuthStatus::Authenticated)
    }
}

impl From<bool> for AuthStatus {
    fn from(valid: bool) -> Self {
        if valid {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }
}

/// Client-side view of the session.
///
/// `is_authenticated` only becomes true from a successful login or a verify
/// call that accepted `token`; a token loaded from storage alone never sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub is_authenticated: bool,
}

/// Signup form values
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login form values
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupResult {
    Created,
    AlreadyExists,
    RequestFailed(String),
}

impl SignupResult {
    /// Message shown to the user after a signup attempt
    pub fn explanation(&self) -> String {
        match self {
            SignupResult::Created => "User created successfully! Please log in".to_string(),
            SignupResult::AlreadyExists => "User already exists! Please log in".to_string(),
            SignupResult::RequestFailed(reason) => format!("Signup failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    Success { token: String, explanation: String },
    Rejected { explanation: String },
    RequestFailed { explanation: String },
}

impl LoginResult {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginResult::Success { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            LoginResult::Success { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            LoginResult::Success { explanation, .. }
            | LoginResult::Rejected { explanation }
            | LoginResult::RequestFailed { explanation } => explanation,
        }
    }
}

// Wire shapes

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyResponse {
    pub valid: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignupResponse {
    #[serde(rename = "bool")]
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(rename = "bool")]
    pub ok: bool,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_auth_status_from_bool() {
        assert_eq!(AuthStatus::from(true), AuthStatus::Authenticated);
        assert_eq!(AuthStatus::from(false), AuthStatus::Unauthenticated);
        assert_eq!(AuthStatus::default(), AuthStatus::Unauthenticated);
    }

    #[test]
    fn test_login_form_wire_shape() {
        let form = LoginForm {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@b.c", "password": "pw"}));
    }

    #[test]
    fn test_login_response_without_token() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"bool": false, "explanation": "wrong password"}"#).unwrap();
        assert!(!resp.ok);
        assert!(resp.token.is_none());
        assert_eq!(resp.explanation.as_deref(), Some("wrong password"));
    }

    #[test]
    fn test_login_result_accessors() {
        let ok = LoginResult::Success {
            token: "abc".into(),
            explanation: "ok".into(),
        };
        assert!(ok.is_success());
        assert_eq!(ok.token(), Some("abc"));

        let rejected = LoginResult::Rejected {
            explanation: "no".into(),
        };
        assert_eq!(rejected.token(), None);
        assert_eq!(rejected.explanation(), "no");
    }

    #[test]
    fn test_signup_explanations() {
        assert!(SignupResult::Created.explanation().contains("created"));
        assert!(SignupResult::AlreadyExists.explanation().contains("already exists"));
        assert!(SignupResult::RequestFailed("timeout".into())
            .explanation()
            .contains("timeout"));
    }
}
