//! Byte-order normalization for stored multi-byte values.
//!
//! Release files are always written big-endian. A stored value is brought to
//! host order by a full byte reversal when the two orders differ, and copied
//! unchanged otherwise; there is no partial or mixed-endian mode. The host
//! order is a plain value so callers can override what the target reports.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Byte order of a stored value or of the host interpreting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// On-disk order of every release file.
    pub const STORED: ByteOrder = ByteOrder::Big;

    /// Byte order of the compilation target.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Little => f.write_str("little"),
            ByteOrder::Big => f.write_str("big"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown byte order '{0}', expected 'big' or 'little'")]
pub struct ParseByteOrderError(String);

impl FromStr for ByteOrder {
    type Err = ParseByteOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "big" | "be" => Ok(ByteOrder::Big),
            "little" | "le" => Ok(ByteOrder::Little),
            other => Err(ParseByteOrderError(other.to_string())),
        }
    }
}

pub fn swap2(raw: [u8; 2]) -> [u8; 2] {
    [raw[1], raw[0]]
}

pub fn swap4(raw: [u8; 4]) -> [u8; 4] {
    [raw[3], raw[2], raw[1], raw[0]]
}

pub fn swap8(raw: [u8; 8]) -> [u8; 8] {
    [
        raw[7], raw[6], raw[5], raw[4], raw[3], raw[2], raw[1], raw[0],
    ]
}

/// Converts stored values into host-order numbers.
///
/// The normalized bytes are reinterpreted with the target's native layout,
/// so a host override that disagrees with the real target yields the same
/// scrambled values the hardware would produce.
///
/// # Examples
/// ```
/// use lvis_core::{ByteOrder, Normalizer};
///
/// let normalizer = Normalizer::for_host(ByteOrder::native());
/// assert_eq!(normalizer.u32(0x0102_0304u32.to_be_bytes()), 0x0102_0304);
/// assert_eq!(normalizer.f64(44.5f64.to_be_bytes()), 44.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    stored: ByteOrder,
    host: ByteOrder,
}

impl Normalizer {
    pub fn new(stored: ByteOrder, host: ByteOrder) -> Self {
        Self { stored, host }
    }

    /// Normalizer for release files (stored big-endian) on the given host.
    pub fn for_host(host: ByteOrder) -> Self {
        Self::new(ByteOrder::STORED, host)
    }

    pub fn needs_swap(&self) -> bool {
        self.stored != self.host
    }

    pub fn word(&self, raw: [u8; 2]) -> [u8; 2] {
        if self.needs_swap() { swap2(raw) } else { raw }
    }

    pub fn dword(&self, raw: [u8; 4]) -> [u8; 4] {
        if self.needs_swap() { swap4(raw) } else { raw }
    }

    pub fn qword(&self, raw: [u8; 8]) -> [u8; 8] {
        if self.needs_swap() { swap8(raw) } else { raw }
    }

    pub fn u16(&self, raw: [u8; 2]) -> u16 {
        u16::from_ne_bytes(self.word(raw))
    }

    pub fn u32(&self, raw: [u8; 4]) -> u32 {
        u32::from_ne_bytes(self.dword(raw))
    }

    pub fn f32(&self, raw: [u8; 4]) -> f32 {
        f32::from_ne_bytes(self.dword(raw))
    }

    pub fn f64(&self, raw: [u8; 8]) -> f64 {
        f64::from_ne_bytes(self.qword(raw))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::for_host(ByteOrder::native())
    }
}
