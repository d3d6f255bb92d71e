use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Completion service credential is not configured")]
    Configuration,

    #[error("Completion service error ({status}): {message}")]
    Upstream { status: String, message: String },
}

impl LlmError {
    pub fn upstream(status: impl Into<String>, message: impl Into<String>) -> Self {
        LlmError::Upstream {
            status: status.into(),
            message: message.into(),
        }
    }
}
