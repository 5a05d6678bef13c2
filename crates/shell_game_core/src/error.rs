//! Error types with caller location tracking.

use derive_more::{Display, Error};
use tracing::instrument;

/// A slot or cup index outside `0..3`.
#[derive(Debug, Clone, Display, Error)]
#[display("Slot error: {} at {}:{}", message, file, line)]
pub struct SlotError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SlotError {
    /// Creates a new slot error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// A presentation side effect that could not be carried out.
///
/// The sequencer never propagates these; they are logged and dropped.
#[derive(Debug, Clone, Display, Error)]
#[display("Presentation error: {} at {}:{}", message, file, line)]
pub struct SinkError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SinkError {
    /// Creates a new presentation error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for SinkError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}
