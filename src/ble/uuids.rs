//! BLE Service and Characteristic UUIDs.
//!
//! Default identifiers of the reference Pico W text peripheral. They must
//! match the values the peripheral registers in its GATT table.

use uuid::Uuid;

/// Default advertised name of the peripheral.
pub const DEFAULT_DEVICE_NAME: &str = "PicoW_BLE";

/// Text link service UUID.
pub const LINK_SERVICE_UUID: Uuid = Uuid::from_u128(0x0000_ffe0_0000_1000_8000_0080000b34fb);
/// Notify characteristic UUID (device to client).
pub const LINK_NOTIFY_UUID: Uuid = Uuid::from_u128(0x0000_ffe1_0000_1000_8000_0080000b34fb);
/// Write characteristic UUID (client to device).
pub const LINK_WRITE_UUID: Uuid = Uuid::from_u128(0x0000_ffe2_0000_1000_8000_0080000b34fb);

/// Parse an identifier from its string form.
///
/// Parsing accepts either case, so the lowercase convention used by
/// peripherals and the uppercase form some tools print resolve to the same
/// UUID.
pub fn parse_identifier(name: &str, value: &str) -> crate::Result<Uuid> {
    Uuid::parse_str(value).map_err(|_| crate::Error::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    })
}
