use thiserror::Error;

/// The taxonomy of failures a simulation run can hit.
///
/// `Config` and `Internal` are bugs in setup or in this crate; `Comm` is a
/// transport failure with no local recovery; `Io` is the only variant the
/// driver is allowed to log and continue past.
#[derive(Debug, Error)]
pub enum StencilError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("communication error: {0}")]
    Comm(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl StencilError {
    pub fn config(msg: impl Into<String>) -> Self {
        StencilError::Config(msg.into())
    }

    pub fn comm(msg: impl Into<String>) -> Self {
        StencilError::Comm(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        StencilError::Io(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        StencilError::Internal(msg.into())
    }

    /// Whether the driver may log this and keep stepping, or must abort.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StencilError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, StencilError>;
