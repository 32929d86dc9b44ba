use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl User {
    /// Builds a user record without any verification.
    pub fn fabricate(email: &str, name: &str) -> Self {
        Self {
            id: super::new_opaque_id(),
            email: email.to_string(),
            name: name.to_string(),
        }
    }
}

/// Text before the first `@`, or the whole address when there is none.
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
