//! Human-readable status messages written to the status sink.

use crate::error::{Error, ErrorKind};

/// A status line for the host to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// Device selected, GATT connection being opened.
    Connecting,
    /// GATT connection open, resolving the link.
    Establishing {
        /// Name of the selected device.
        name: String,
    },
    /// Link fully set up.
    Connected {
        /// Name of the connected device.
        name: String,
    },
    /// Device selection was dismissed.
    SelectionCancelled,
    /// The peripheral did not accept the connection.
    PeripheralUnresponsive,
    /// Any other connect failure.
    ConnectError(String),
    /// A send did not reach the device.
    SendFailed,
    /// The link was closed on request.
    Disconnected,
}

impl StatusMessage {
    /// The message for a failed connect sequence.
    pub fn for_connect_error(error: &Error) -> Self {
        match error.kind() {
            ErrorKind::UserCancelled => Self::SelectionCancelled,
            ErrorKind::ConnectionFailed => Self::PeripheralUnresponsive,
            ErrorKind::NotFound | ErrorKind::NotConnected | ErrorKind::Unclassified => {
                Self::ConnectError(error.to_string())
            }
        }
    }
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "Attempting connection..."),
            Self::Establishing { name } => write!(f, "Establishing connection with {}...", name),
            Self::Connected { name } => write!(f, "Connected to {}!", name),
            Self::SelectionCancelled => write!(
                f,
                "Connection failed: device selection was cancelled. Please connect again."
            ),
            Self::PeripheralUnresponsive => write!(
                f,
                "Connection failed. The peripheral is probably unresponsive; please restart it."
            ),
            Self::ConnectError(detail) => write!(f, "Connection error: {}", detail),
            Self::SendFailed => write!(f, "Send failed. Please try connecting again."),
            Self::Disconnected => write!(f, "Disconnected."),
        }
    }
}
