//! Contact form payload and response models

use crate::error::{AppError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

pub const SUCCESS_MESSAGE: &str = "Email sent successfully";

/// One contact form submission. Absent and null keys deserialize as empty
/// strings so they fail presence validation rather than parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContactSubmission {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1))]
    pub email: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1))]
    pub subject: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1))]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ContactSubmission {
    const FIELDS: [&'static str; 4] = ["name", "email", "subject", "message"];

    /// Empty fields, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match Validate::validate(self) {
            Ok(()) => Vec::new(),
            Err(errors) => {
                let failed: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|field| field.to_string())
                    .collect();

                Self::FIELDS
                    .into_iter()
                    .filter(|field| failed.iter().any(|f| f.as_str() == *field))
                    .collect()
            }
        }
    }

    pub fn ensure_complete(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingFields(missing))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub acknowledgment_sent: bool,
}

impl ContactResponse {
    pub fn sent(acknowledgment_sent: bool) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            acknowledgment_sent,
        }
    }
}
