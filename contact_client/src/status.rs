//! Outcome of a submission as shown to the visitor

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! I'll reply soon.";
pub const REJECTED_FALLBACK: &str = "Failed to send message. Please try again.";
pub const NETWORK_FALLBACK: &str = "Error sending message. Please try again.";
pub const INCOMPLETE_MESSAGE: &str = "Please fill in all required fields.";
pub const IN_FLIGHT_MESSAGE: &str = "A submission is already in progress.";

/// Banner shown under the form after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Success(String),
    Error(String),
}

impl SubmissionStatus {
    pub fn success() -> Self {
        SubmissionStatus::Success(SUCCESS_MESSAGE.to_string())
    }

    pub fn error(message: impl Into<String>) -> Self {
        SubmissionStatus::Error(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionStatus::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SubmissionStatus::Success(message) | SubmissionStatus::Error(message) => message,
        }
    }

    /// `"success"` or `"error"`, for use as a CSS class.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionStatus::Success(_) => "success",
            SubmissionStatus::Error(_) => "error",
        }
    }
}
