// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Steganographic encoding and decoding of RGBA pixel buffers.
//!
//! A message is compressed, AES-256-CBC encrypted and (optionally) Golay
//! coded, then scattered bit by bit over the four low bit-planes of the RGB
//! channels of fully opaque pixels. A separately keyed 16-byte header in
//! front of it carries the payload length and codec type.
//!
//! The codec type picks the payload's error correction (none or
//! Golay(24,12)) and its scatter profile (Uniform or Shaped); see
//! [`CodecType`]. The header always uses Golay + Uniform.

pub mod capacity;
pub mod codec_type;
pub mod crypto;
pub mod error;
pub mod golay;
pub mod header;
pub mod payload;
mod pipeline;
pub mod progress;
pub mod scatter;

pub use capacity::{capacity, encoded_size};
pub use codec_type::{CodecType, EccType, ScatterType};
pub use error::StegoError;
pub use pipeline::{decode, encode, DECODE_STEPS, ENCODE_STEPS};

/// Maximum pixel dimension (width or height).
pub const MAX_DIMENSION: u32 = 8192;

/// Maximum total pixel count (width × height).
pub const MAX_PIXELS: u32 = 16_000_000;

/// Largest message, in UTF-8 bytes, that [`encode`] accepts and [`decode`]
/// will inflate: one byte per eight bit-slots of the largest image.
pub const MAX_MESSAGE_LEN: usize = MAX_PIXELS as usize * scatter::slot::SLOTS_PER_PIXEL / 8;

/// Validate image dimensions against an RGBA buffer length.
///
/// # Errors
/// [`StegoError::InvalidDimensions`] if a dimension is zero or above
/// [`MAX_DIMENSION`], the pixel count exceeds [`MAX_PIXELS`], or
/// `buffer_len != width × height × 4`.
pub fn validate_dimensions(width: u32, height: u32, buffer_len: usize) -> Result<(), StegoError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(StegoError::InvalidDimensions);
    }
    let pixels = width.checked_mul(height).filter(|&p| p <= MAX_PIXELS).ok_or(StegoError::InvalidDimensions)?;
    if buffer_len != pixels as usize * 4 {
        return Err(StegoError::InvalidDimensions);
    }
    Ok(())
}
