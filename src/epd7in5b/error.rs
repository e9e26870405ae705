//! Errors reported by the panel driver
use core::fmt;

pub use display_interface::DisplayError;
use thiserror::Error;

/// Where the panel is in its command sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Lines acquired, no reset issued yet
    Uninitialized,
    /// Reset and init sequence done
    Initialized,
    /// Both planes cleared and shown
    Cleared,
    /// An image was sent and shown
    Displaying,
    /// Deep sleep, needs a new init
    Sleeping,
    /// Lines driven low and released
    Released,
}

impl PanelState {
    /// True when RAM writes and refreshes are accepted.
    pub fn is_ready(self) -> bool {
        matches!(
            self,
            PanelState::Initialized | PanelState::Cleared | PanelState::Displaying
        )
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanelState::Uninitialized => "uninitialized",
            PanelState::Initialized => "initialized",
            PanelState::Cleared => "cleared",
            PanelState::Displaying => "displaying",
            PanelState::Sleeping => "sleeping",
            PanelState::Released => "released",
        };
        f.write_str(name)
    }
}

/// Driver error
#[derive(Debug, Error)]
pub enum Error {
    /// A control line or bus write failed
    #[error("display interface error: {0:?}")]
    Interface(DisplayError),
    /// The busy line could not be read
    #[error("failed to read the busy line")]
    BusyLine,
    /// An operation was issued out of order
    #[error("{operation} is not valid while the panel is {state}")]
    Sequence {
        /// The rejected operation
        operation: &'static str,
        /// State the panel was in
        state: PanelState,
    },
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Interface(e)
    }
}

/// Opening the bus or the control lines failed.
///
/// Nothing has been sent to the panel when this is returned.
#[derive(Debug, Error)]
#[error("panel setup failed while {stage}")]
pub struct SetupError {
    /// What was being set up
    pub stage: String,
    /// Underlying platform error
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl SetupError {
    /// Wrap a platform error raised while doing `stage`.
    pub fn new(
        stage: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SetupError {
            stage: stage.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_error_names_operation_and_state() {
        let e = Error::Sequence {
            operation: "display_image",
            state: PanelState::Sleeping,
        };
        assert_eq!(
            e.to_string(),
            "display_image is not valid while the panel is sleeping"
        );
    }

    #[test]
    fn ready_states() {
        assert!(PanelState::Initialized.is_ready());
        assert!(PanelState::Cleared.is_ready());
        assert!(PanelState::Displaying.is_ready());
        assert!(!PanelState::Uninitialized.is_ready());
        assert!(!PanelState::Sleeping.is_ready());
        assert!(!PanelState::Released.is_ready());
    }

    #[test]
    fn setup_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such device");
        let e = SetupError::new("opening /dev/spidev0.0", io);
        assert_eq!(e.to_string(), "panel setup failed while opening /dev/spidev0.0");
        let source = std::error::Error::source(&e).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("no such device"));
    }
}
