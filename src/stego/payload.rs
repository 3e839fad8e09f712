// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Message compression before encryption.
//!
//! ```text
//! [1 byte ] flags (bits 0-1: compression algorithm)
//! [M bytes] UTF-8 message, raw or Brotli-compressed depending on flags
//! ```
//!
//! Brotli is used only if it makes the body strictly smaller, so very short
//! messages cost exactly one byte of overhead.

use crate::stego::error::StegoError;
use crate::stego::MAX_MESSAGE_LEN;
use std::io::{Read, Write};

/// Compression algorithm flags (bits 0-1 of flags byte).
const COMPRESS_NONE: u8 = 0b00;
const COMPRESS_BROTLI: u8 = 0b01;
const COMPRESS_MASK: u8 = 0b11;

/// Brotli quality (0-11). Messages are small, so max quality is cheap.
const BROTLI_QUALITY: u32 = 11;

/// Brotli LG_WINDOW_SIZE (4 MB window, auto-adjusted for small inputs).
const BROTLI_LG_WINDOW_SIZE: u32 = 22;

/// Compress a message into `[flags][body]`.
pub fn compress_message(text: &str) -> Vec<u8> {
    let raw = text.as_bytes();
    let mut result = Vec::with_capacity(1 + raw.len());
    match compress_brotli(raw) {
        Some(compressed) if compressed.len() < raw.len() => {
            result.push(COMPRESS_BROTLI);
            result.extend_from_slice(&compressed);
        }
        _ => {
            result.push(COMPRESS_NONE);
            result.extend_from_slice(raw);
        }
    }
    result
}

/// Decompress `[flags][body]` back into the UTF-8 message.
///
/// Any malformed input yields [`StegoError::DecodeFailed`], as does a body
/// that inflates past [`MAX_MESSAGE_LEN`].
pub fn decompress_message(data: &[u8]) -> Result<String, StegoError> {
    let (&flags, body) = data.split_first().ok_or(StegoError::DecodeFailed)?;

    let inner = match flags & COMPRESS_MASK {
        COMPRESS_NONE => body.to_vec(),
        COMPRESS_BROTLI => decompress_brotli(body, MAX_MESSAGE_LEN)?,
        _ => return Err(StegoError::DecodeFailed),
    };

    String::from_utf8(inner).map_err(|_| StegoError::DecodeFailed)
}

/// Size of [`compress_message`]'s output without keeping it.
pub fn compressed_len(text: &str) -> usize {
    compress_message(text).len()
}

fn compress_brotli(data: &[u8]) -> Option<Vec<u8>> {
    let mut output = Vec::new();
    {
        let mut compressor = brotli::CompressorWriter::new(
            &mut output,
            4096, // buffer size
            BROTLI_QUALITY,
            BROTLI_LG_WINDOW_SIZE,
        );
        compressor.write_all(data).ok()?;
        // CompressorWriter flushes on drop
    }
    Some(output)
}

/// Inflate at most `limit` bytes. Output beyond the limit is an error, never
/// a silently shortened message.
fn decompress_brotli(data: &[u8], limit: usize) -> Result<Vec<u8>, StegoError> {
    let mut output = Vec::new();
    let decompressor = brotli::Decompressor::new(data, 4096);
    decompressor
        .take(limit as u64 + 1)
        .read_to_end(&mut output)
        .map_err(|_| StegoError::DecodeFailed)?;
    if output.len() > limit {
        return Err(StegoError::DecodeFailed);
    }
    Ok(output)
}
