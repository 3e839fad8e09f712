// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Length/type header construction and parsing.
//!
//! The header tells the decoder how many payload ciphertext bytes follow and
//! which codec type placed them. It is encrypted with the header key and
//! always Golay-coded before embedding. Two plaintext layouts exist:
//!
//! ```text
//! Compact (type 12 only):  decimal ASCII digits of the payload length, e.g. b"48"
//!
//! Tagged (all other types):
//! [1 byte ] '*'
//! [2 bytes] type code, e.g. b"13"
//! [1 byte ] '*'
//! [4 bytes] payload length (little-endian u32)
//! ```
//!
//! Both layouts are shorter than one AES block, so the encrypted header is
//! always exactly [`HEADER_CIPHERTEXT_LEN`] bytes and its Golay form always
//! occupies [`HEADER_SLOTS`] bit-slots.

use crate::stego::codec_type::{CodecType, EccType};
use crate::stego::crypto::BLOCK_LEN;
use crate::stego::error::StegoError;
use crate::stego::golay;

/// Sentinel byte framing the tagged header's type code.
const MARKER: u8 = b'*';

/// Length of the tagged header plaintext.
pub const TAGGED_LEN: usize = 8;

/// Length of the encrypted header (one AES block).
pub const HEADER_CIPHERTEXT_LEN: usize = BLOCK_LEN;

/// Bytes occupied by the Golay-coded encrypted header (33).
pub const HEADER_ENCODED_LEN: usize = golay::encoded_len(HEADER_CIPHERTEXT_LEN);

/// Bit-slots occupied by the header region (264).
pub const HEADER_SLOTS: usize = HEADER_ENCODED_LEN * 8;

/// Decoded header contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub codec_type: CodecType,
    /// Payload ciphertext length in bytes (before any Golay expansion).
    pub payload_len: u32,
}

impl Header {
    /// Serialize to header plaintext.
    pub fn to_bytes(self) -> Vec<u8> {
        if self.codec_type.is_compact_header() {
            return self.payload_len.to_string().into_bytes();
        }
        let mut out = Vec::with_capacity(TAGGED_LEN);
        out.push(MARKER);
        out.extend_from_slice(&self.codec_type.code_bytes());
        out.push(MARKER);
        out.extend_from_slice(&self.payload_len.to_le_bytes());
        out
    }

    /// Parse header plaintext, trying the tagged layout first when its
    /// sentinels are present and the compact layout otherwise.
    pub fn parse(data: &[u8]) -> Result<Self, StegoError> {
        if data.len() == TAGGED_LEN && data[0] == MARKER && data[3] == MARKER {
            let codec_type = CodecType::from_code_bytes([data[1], data[2]])?;
            let payload_len = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
            return Ok(Self { codec_type, payload_len });
        }

        if data.is_empty() || !data.iter().all(u8::is_ascii_digit) {
            return Err(StegoError::DecodeFailed);
        }
        let payload_len = std::str::from_utf8(data)
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or(StegoError::DecodeFailed)?;
        Ok(Self { codec_type: CodecType::default(), payload_len })
    }

    /// Bytes the payload occupies inside the image after optional Golay coding.
    ///
    /// # Errors
    /// [`StegoError::DecodeFailed`] if the length does not fit in `usize`.
    pub fn stored_payload_len(self) -> Result<usize, StegoError> {
        let len = usize::try_from(self.payload_len).map_err(|_| StegoError::DecodeFailed)?;
        stored_len(len, self.codec_type).ok_or(StegoError::DecodeFailed)
    }
}

/// Size of a `len`-byte ciphertext once ECC for `codec_type` is applied,
/// or `None` if it overflows `usize`.
pub fn stored_len(len: usize, codec_type: CodecType) -> Option<usize> {
    match codec_type.ecc {
        EccType::None => Some(len),
        EccType::Golay24 => golay::checked_encoded_len(len),
    }
}
