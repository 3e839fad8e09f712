// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! # pixveil-core
//!
//! Pure-Rust engine for hiding encrypted text messages in the low bit-planes
//! of RGBA images. Only fully opaque pixels carry data.
//!
//! - **Golay(24,12)** error correction (optional for the payload, always on
//!   for the header) corrects up to 3 flipped bits per 24-bit codeword.
//! - **Uniform** scatter spreads bits flatly over the four low bit-planes;
//!   **Shaped** scatter biases them toward the lowest planes so the noise
//!   histogram stays bell-shaped, at half the capacity.
//! - Keys come from an iterated SHA-256 chain over the password; the payload
//!   is AES-256-CBC encrypted and Brotli compressed.
//!
//! Decoding fails with a single opaque error for wrong passwords and damaged
//! images alike.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use pixveil_core::{decode, encode, CodecType};
//!
//! let (width, height) = (64, 64);
//! let mut rgba = vec![255u8; width as usize * height as usize * 4];
//! encode(&mut rgba, width, height, "secret message", "passphrase", CodecType::default()).unwrap();
//! let decoded = decode(&rgba, width, height, "passphrase").unwrap();
//! assert_eq!(decoded, "secret message");
//! ```

pub mod stego;

pub use stego::{capacity, decode, encode, encoded_size, StegoError};
pub use stego::{CodecType, EccType, ScatterType};
pub use stego::{validate_dimensions, MAX_DIMENSION, MAX_MESSAGE_LEN, MAX_PIXELS};
pub use stego::{DECODE_STEPS, ENCODE_STEPS};
pub use stego::progress;
pub use stego::scatter::ScatterEngine;
