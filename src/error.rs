//! Error types for the ble-text-link crate.

use thiserror::Error;

/// The main error type for this crate.
///
/// Transports tag every failure with one of these variants at the point where
/// it happens, so callers classify through [`Error::kind`] instead of
/// inspecting message text.
#[derive(Error, Debug)]
pub enum Error {
    /// Bluetooth-related error from the underlying BLE library.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Bluetooth is not available or is disabled on this system.
    #[error("Bluetooth not available or disabled")]
    BluetoothUnavailable,

    /// Device selection ended without a device being chosen.
    #[error("Device selection cancelled: {name}")]
    SelectionCancelled {
        /// The advertised name that was being looked for.
        name: String,
    },

    /// The transport no longer knows the selected device.
    #[error("Device not found: {identifier}")]
    DeviceNotFound {
        /// The identifier that was searched for.
        identifier: String,
    },

    /// Operation requires a connection but the device is not connected.
    #[error("Device not connected")]
    NotConnected,

    /// Failed to establish a GATT connection to the device.
    #[error("Connection failed: {reason}")]
    ConnectionFailed {
        /// Description of why the connection failed.
        reason: String,
    },

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter {
        /// The name of the parameter.
        name: String,
        /// The invalid value that was provided.
        value: String,
    },

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Characteristic not found on the device.
    #[error("Characteristic not found: {uuid}")]
    CharacteristicNotFound {
        /// The UUID of the characteristic that was not found.
        uuid: String,
    },

    /// Service not found on the device.
    #[error("Service not found: {uuid}")]
    ServiceNotFound {
        /// The UUID of the service that was not found.
        uuid: String,
    },
}

/// Coarse classification of an [`Error`] by observable cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The device chooser was dismissed without a selection.
    UserCancelled,
    /// The GATT connection attempt failed.
    ConnectionFailed,
    /// A required device, service or characteristic is absent.
    NotFound,
    /// A send was attempted without a resolved write channel.
    NotConnected,
    /// Anything else.
    Unclassified,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SelectionCancelled { .. } => ErrorKind::UserCancelled,
            Self::ConnectionFailed { .. } => ErrorKind::ConnectionFailed,
            Self::DeviceNotFound { .. }
            | Self::ServiceNotFound { .. }
            | Self::CharacteristicNotFound { .. } => ErrorKind::NotFound,
            Self::NotConnected => ErrorKind::NotConnected,
            Self::Bluetooth(_)
            | Self::BluetoothUnavailable
            | Self::InvalidParameter { .. }
            | Self::Internal(_) => ErrorKind::Unclassified,
        }
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let cancelled = Error::SelectionCancelled {
            name: "PicoW_BLE".to_string(),
        };
        assert_eq!(cancelled.kind(), ErrorKind::UserCancelled);

        let failed = Error::ConnectionFailed {
            reason: "timed out".to_string(),
        };
        assert_eq!(failed.kind(), ErrorKind::ConnectionFailed);

        let missing = Error::CharacteristicNotFound {
            uuid: "0000ffe1-0000-1000-8000-0080000b34fb".to_string(),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::ServiceNotFound {
                uuid: "x".to_string()
            }
            .kind(),
            ErrorKind::NotFound
        );

        assert_eq!(Error::NotConnected.kind(), ErrorKind::NotConnected);
        assert_eq!(
            Error::Internal("boom".to_string()).kind(),
            ErrorKind::Unclassified
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::ServiceNotFound {
            uuid: "0000ffe0-0000-1000-8000-0080000b34fb".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Service not found: 0000ffe0-0000-1000-8000-0080000b34fb"
        );
    }
}
