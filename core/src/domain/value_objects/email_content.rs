//! Email body handed to the provider.

use serde::{Deserialize, Serialize};

/// Subject and bodies of a verification email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl EmailContent {
    /// Fixed verification email carrying `code`
    pub fn verification(subject: impl Into<String>, code: &str) -> Self {
        Self {
            subject: subject.into(),
            html_body: format!(
                "<html><h1>Auth Code</h1><p>Your auth code is: {}</p></html>",
                code
            ),
            text_body: format!("Your auth code is: {}", code),
        }
    }
}
