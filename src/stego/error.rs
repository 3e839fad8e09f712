// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers caller mistakes (bad buffers, bad type codes),
//! capacity failures on encode, the single opaque decode failure, and the
//! scatter engine's usage errors.

use core::fmt;

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The pixel buffer does not match its dimensions, or the dimensions are
    /// zero or exceed the supported maximum (8192px / 16MP).
    InvalidDimensions,
    /// The codec type code is not one of `02`, `03`, `12`, `13`.
    InvalidCodecType,
    /// The encoded message does not fit into the image's free bit-slots.
    MessageTooLarge {
        /// Bytes the encoded header + payload would occupy.
        required: usize,
        /// Bytes the image can hold for the chosen scatter type.
        available: usize,
    },
    /// Wrong password, corrupted image, or no hidden message. Deliberately
    /// carries no detail.
    DecodeFailed,
    /// More bit-slots were requested than the scatter engine has left.
    InsufficientSlots { requested: usize, available: usize },
    /// A Uniform draw was requested after the engine switched to Shaped.
    ScatterRegression,
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions => write!(f, "invalid image dimensions or pixel buffer size"),
            Self::InvalidCodecType => write!(f, "unknown codec type code"),
            Self::MessageTooLarge { required, available } => write!(
                f,
                "encoded message of {required} bytes is too large; the image can store {available} bytes"
            ),
            Self::DecodeFailed => write!(f, "could not decode (incorrect password or image)"),
            Self::InsufficientSlots { requested, available } => write!(
                f,
                "requested {requested} bit-slots but only {available} are free"
            ),
            Self::ScatterRegression => write!(f, "cannot switch scatter type back to uniform"),
        }
    }
}

impl std::error::Error for StegoError {}
