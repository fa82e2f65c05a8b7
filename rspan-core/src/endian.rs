//! Byte order handling for typed decoding

/// Byte order of a multi-byte field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

/// Byte order used by the default-order 32-bit reader
///
/// Fixed for the project rather than taken from the host, so a resource
/// decodes the same way on every platform.
pub const DEFAULT_BYTE_ORDER: ByteOrder = ByteOrder::Little;

impl ByteOrder {
    /// Decode an unsigned 16-bit value
    pub const fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }

    /// Decode an unsigned 32-bit value
    pub const fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

/// Decode a little-endian 24-bit value into the low bits of a `u32`
pub const fn read_u24_le(bytes: [u8; 3]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0])
}
