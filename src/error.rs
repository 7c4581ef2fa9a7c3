use thiserror::Error;

/// Errors surfaced by the AGC handle and the native bootstrap.
///
/// `Clone` so the bootstrap can hand the same cached failure to every caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgcError {
    /// Caller-supplied value outside its legal range. Nothing was touched.
    #[error("{0}")]
    InvalidArgument(String),

    /// The handle was closed; only `close` and `is_closed` remain usable.
    #[error("AGC is closed")]
    ClosedHandle,

    /// No native library is known for this os/arch pair.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    /// The native library exists for this platform but could not be loaded.
    #[error("Failed to load native library: {0}")]
    LoadIo(String),

    /// The engine refused to create an instance.
    #[error("{0}")]
    NativeCreate(String),

    /// The engine rejected an operation on a live instance.
    #[error("{0}")]
    Native(String),

    #[error("Invalid input array length {actual}, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl AgcError {
    pub(crate) fn invalid(reason: &str) -> Self {
        AgcError::InvalidArgument(reason.to_string())
    }

    /// True for errors caused by the caller's arguments rather than the engine.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, AgcError::InvalidArgument(_) | AgcError::LengthMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, AgcError>;

#[cfg(feature = "node")]
impl From<AgcError> for napi::Error {
    fn from(err: AgcError) -> Self {
        let status = if err.is_argument_error() {
            napi::Status::InvalidArg
        } else {
            napi::Status::GenericFailure
        };
        napi::Error::new(status, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            AgcError::invalid("Invalid target (must be 1..32768)").to_string(),
            "Invalid target (must be 1..32768)"
        );
        assert_eq!(AgcError::ClosedHandle.to_string(), "AGC is closed");
        assert_eq!(
            AgcError::LengthMismatch { expected: 960, actual: 480 }.to_string(),
            "Invalid input array length 480, expected 960"
        );
    }

    #[test]
    fn test_argument_errors() {
        assert!(AgcError::invalid("x").is_argument_error());
        assert!(AgcError::LengthMismatch { expected: 1, actual: 2 }.is_argument_error());
        assert!(!AgcError::ClosedHandle.is_argument_error());
        assert!(!AgcError::Native("Failed to set target".into()).is_argument_error());
    }
}
