//! Form-layer validation. Everything here runs before a value reaches the
//! session store, the history store or the recommendation client.

use crate::domain::recommendation::RecommendationRequest;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Raw recommendation form input. `budget` is text and gets coerced.
#[derive(Debug, Clone, Default)]
pub struct RecommendationForm {
    pub industry: String,
    pub budget: String,
    pub location: String,
}

impl RecommendationForm {
    pub fn validate_and_into_request(self) -> Result<RecommendationRequest, ValidationError> {
        if !has_min_chars(&self.industry, 2) {
            return Err(ValidationError::new(
                "industry",
                "Industry must be at least 2 characters.",
            ));
        }

        let budget = coerce_number(&self.budget)
            .filter(|b| *b > 0.0)
            .ok_or(ValidationError::new(
                "budget",
                "Budget must be a positive number.",
            ))?;

        if !has_min_chars(&self.location, 2) {
            return Err(ValidationError::new(
                "location",
                "Location must be at least 2 characters.",
            ));
        }

        Ok(RecommendationRequest {
            industry: self.industry,
            budget,
            location: self.location,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !has_min_chars(&self.name, 2) {
            return Err(ValidationError::new(
                "name",
                "Name must be at least 2 characters.",
            ));
        }
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let valid = EMAIL_RE.is_match(email) && !email.starts_with('.') && !email.contains("..");
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new(
            "email",
            "Please enter a valid email address.",
        ))
    }
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if has_min_chars(password, 6) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "password",
            "Password must be at least 6 characters.",
        ))
    }
}

fn has_min_chars(s: &str, min: usize) -> bool {
    s.chars().count() >= min
}

// Blank input coerces to zero, which then fails the positivity check.
fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
