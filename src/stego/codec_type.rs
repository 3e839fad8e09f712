// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Codec type: error correction × scatter profile.
//!
//! The type travels as a 2-character code inside the header:
//!
//! | Code | ECC  | Scatter | Space (of opaque RGB bytes) |
//! |------|------|---------|-----------------------------|
//! | `02` | none | uniform | 50.0%                       |
//! | `03` | none | shaped  | 25.0%                       |
//! | `12` | G24  | uniform | 25.0%                       |
//! | `13` | G24  | shaped  | 12.5%                       |
//!
//! `12` is the default and the only type whose header is the compact
//! decimal-digits form.

use core::fmt;
use core::str::FromStr;

use crate::stego::error::StegoError;

/// Error-correction applied to the payload (the header is always Golay-coded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EccType {
    /// Payload ciphertext stored as-is.
    None,
    /// Payload ciphertext Golay(24,12)-encoded.
    Golay24,
}

/// Statistical profile of bit placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScatterType {
    /// Flat distribution over all four low bit-planes.
    Uniform,
    /// Half-normal-like distribution biased toward the lowest planes.
    Shaped,
}

impl EccType {
    fn code(self) -> char {
        match self {
            Self::None => '0',
            Self::Golay24 => '1',
        }
    }
}

impl ScatterType {
    fn code(self) -> char {
        match self {
            Self::Uniform => '2',
            Self::Shaped => '3',
        }
    }
}

/// Combined codec type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecType {
    pub ecc: EccType,
    pub scatter: ScatterType,
}

impl CodecType {
    pub const fn new(ecc: EccType, scatter: ScatterType) -> Self {
        Self { ecc, scatter }
    }

    /// The 2-byte ASCII code as stored in the header.
    pub fn code_bytes(self) -> [u8; 2] {
        [self.ecc.code() as u8, self.scatter.code() as u8]
    }

    /// Parse the 2-byte ASCII code.
    pub fn from_code_bytes(code: [u8; 2]) -> Result<Self, StegoError> {
        let ecc = match code[0] {
            b'0' => EccType::None,
            b'1' => EccType::Golay24,
            _ => return Err(StegoError::InvalidCodecType),
        };
        let scatter = match code[1] {
            b'2' => ScatterType::Uniform,
            b'3' => ScatterType::Shaped,
            _ => return Err(StegoError::InvalidCodecType),
        };
        Ok(Self { ecc, scatter })
    }

    /// Whether the header for this type uses the compact digits form.
    pub fn is_compact_header(self) -> bool {
        self == Self::default()
    }
}

impl Default for CodecType {
    fn default() -> Self {
        Self::new(EccType::Golay24, ScatterType::Uniform)
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.ecc.code(), self.scatter.code())
    }
}

impl FromStr for CodecType {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            &[a, b] => Self::from_code_bytes([a, b]),
            _ => Err(StegoError::InvalidCodecType),
        }
    }
}
