use lazy_static::lazy_static;
use regex::Regex;

use crate::users::dto::LoginRequest;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Validation messages attached to their fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Transient login form state; lives only while the screen is shown.
#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Check the schema locally before anything is sent over the network.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.email.trim().is_empty() {
            errors.email = Some("Email is required".to_string());
        } else if !is_valid_email(self.email.trim()) {
            errors.email = Some("Invalid email address".to_string());
        }

        if self.password.is_empty() {
            errors.password = Some("Password is required".to_string());
        } else if self.password.len() < 6 {
            errors.password = Some("Password must be at least 6 characters".to_string());
        }

        errors
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn empty_fields_are_required() {
        let errors = form("", "").validate();
        assert_eq!(errors.email.as_deref(), Some("Email is required"));
        assert_eq!(errors.password.as_deref(), Some("Password is required"));
    }

    #[test]
    fn malformed_email_is_flagged_on_the_email_field() {
        let errors = form("not-an-email", "longenough").validate();
        assert_eq!(errors.email.as_deref(), Some("Invalid email address"));
        assert!(errors.password.is_none());
    }

    #[test]
    fn five_char_password_is_rejected_six_is_accepted() {
        let errors = form("ada@example.com", "12345").validate();
        assert_eq!(
            errors.password.as_deref(),
            Some("Password must be at least 6 characters")
        );

        let errors = form("ada@example.com", "123456").validate();
        assert!(errors.is_empty());
    }

    #[test]
    fn valid_form_produces_trimmed_request() {
        let request = form("  ada@example.com ", "secret1").to_request();
        assert_eq!(request.email, "ada@example.com");
        assert_eq!(request.password, "secret1");
    }

    #[test]
    fn reset_clears_both_fields() {
        let mut f = form("ada@example.com", "secret1");
        f.reset();
        assert!(f.email.is_empty());
        assert!(f.password.is_empty());
    }
}
