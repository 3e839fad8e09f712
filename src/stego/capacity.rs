// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Capacity and size calculation.
//!
//! Both helpers are exact, not estimates: [`capacity`] matches the check
//! `encode` performs and [`encoded_size`] matches the number of bytes it
//! embeds. Neither needs the password, so a frontend can show
//! "required vs. available" before asking for one.

use crate::stego::codec_type::{CodecType, ScatterType};
use crate::stego::crypto::ciphertext_len;
use crate::stego::error::StegoError;
use crate::stego::header::{stored_len, HEADER_ENCODED_LEN};
use crate::stego::payload::compressed_len;
use crate::stego::scatter::slot::{opaque_pixel_count, SLOTS_PER_PIXEL};

/// Bytes (header included) that fit into an RGBA image for `scatter`.
///
/// Uniform uses every bit-slot, Shaped half of them.
///
/// # Errors
/// [`StegoError::InvalidDimensions`] if the buffer does not match the dimensions.
pub fn capacity(pixels: &[u8], width: u32, height: u32, scatter: ScatterType) -> Result<usize, StegoError> {
    super::validate_dimensions(width, height, pixels.len())?;
    Ok(slot_capacity(opaque_pixel_count(pixels) * SLOTS_PER_PIXEL, scatter))
}

/// Byte capacity of `slots` bit-slots under `scatter`.
pub(crate) fn slot_capacity(slots: usize, scatter: ScatterType) -> usize {
    match scatter {
        ScatterType::Uniform => slots >> 3,
        ScatterType::Shaped => (slots >> 1) >> 3,
    }
}

/// Bytes `message` occupies once encoded with `codec_type`, header included.
///
/// Saturates at `usize::MAX`, which no image can hold.
pub fn encoded_size(message: &str, codec_type: CodecType) -> usize {
    stored_len(ciphertext_len(compressed_len(message)), codec_type)
        .map_or(usize::MAX, |stored| stored.saturating_add(HEADER_ENCODED_LEN))
}
