// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Encode/decode pipeline.
//!
//! Encode:
//! 1. Compress the message and encrypt it with the payload key.
//! 2. Golay-encode the ciphertext if the codec type asks for ECC.
//! 3. Build the length/type header, encrypt it with the header key and
//!    always Golay-encode it (33 bytes, 264 bit-slots).
//! 4. Seed the scatter engine from the header IV and write header bits
//!    (Uniform), then payload bits (requested profile), LSB-first per byte.
//!
//! Decode mirrors the same order. Every failure after the dimension check
//! collapses into [`StegoError::DecodeFailed`] so a wrong password cannot be
//! told apart from a damaged image.

use log::debug;

use crate::stego::codec_type::{CodecType, EccType, ScatterType};
use crate::stego::crypto::{self, KeyMaterial};
use crate::stego::error::StegoError;
use crate::stego::golay;
use crate::stego::header::{Header, HEADER_CIPHERTEXT_LEN, HEADER_ENCODED_LEN, HEADER_SLOTS};
use crate::stego::payload;
use crate::stego::progress;
use crate::stego::scatter::slot::Geometry;
use crate::stego::scatter::ScatterEngine;
use crate::stego::MAX_MESSAGE_LEN;

/// Progress steps reported by [`encode`]: key derivation, payload
/// preparation, capacity discovery, bit embedding.
pub const ENCODE_STEPS: u32 = 4;

/// Progress steps reported by [`decode`]: key derivation, header, payload
/// extraction, decryption.
pub const DECODE_STEPS: u32 = 4;

/// Minimum stored payload length accepted by the decoder.
const MIN_STORED_LEN: usize = 2;

/// Hide `message` in an RGBA pixel buffer, in place.
///
/// Pixels whose alpha is not 255 are never touched. The image is left
/// unmodified on error.
///
/// # Errors
/// - [`StegoError::InvalidDimensions`] if the buffer does not match `width × height`.
/// - [`StegoError::MessageTooLarge`] if the encoded message does not fit, or
///   the message is longer than [`MAX_MESSAGE_LEN`] bytes.
pub fn encode(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    message: &str,
    password: &str,
    codec_type: CodecType,
) -> Result<(), StegoError> {
    super::validate_dimensions(width, height, pixels.len())?;
    progress::init(ENCODE_STEPS);
    let result = encode_impl(pixels, width, height, message, password, codec_type);
    progress::finish();
    result
}

fn encode_impl(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    message: &str,
    password: &str,
    codec_type: CodecType,
) -> Result<(), StegoError> {
    if message.len() > MAX_MESSAGE_LEN {
        return Err(StegoError::MessageTooLarge { required: message.len(), available: MAX_MESSAGE_LEN });
    }

    let payload_key = crypto::derive_payload_key(password);
    let header_key = crypto::derive_header_key(password);
    progress::advance();

    let compressed = payload::compress_message(message);
    let ciphertext = crypto::encrypt(&compressed, &payload_key);
    let ciphertext_len = ciphertext.len();
    let payload_code = match codec_type.ecc {
        EccType::None => ciphertext,
        EccType::Golay24 => golay::encode_bytes(&ciphertext),
    };
    progress::advance();

    let mut engine = ScatterEngine::new(pixels, width, height, header_key.seed_words())?;
    let geometry = *engine.geometry();
    let required = HEADER_ENCODED_LEN + payload_code.len();
    let available = engine.free_space(codec_type.scatter) >> 3;
    debug!(
        "encode: type {codec_type}, message {} bytes, ciphertext {} bytes, embedding {required} of {available} bytes",
        compressed.len(),
        ciphertext_len
    );
    if required > available {
        return Err(StegoError::MessageTooLarge { required, available });
    }

    let header = Header {
        codec_type,
        payload_len: u32::try_from(ciphertext_len)
            .map_err(|_| StegoError::MessageTooLarge { required, available })?,
    };
    let header_cipher = crypto::encrypt(&header.to_bytes(), &header_key);
    let mut stream = golay::encode_bytes(&header_cipher);
    stream.extend_from_slice(&payload_code);
    progress::advance();

    let addresses = engine.generate(stream.len() * 8, codec_type.scatter)?;
    embed_bits(pixels, &geometry, &addresses, &stream);
    progress::advance();
    Ok(())
}

/// Recover a hidden message from an RGBA pixel buffer.
///
/// The codec type is read from the embedded header.
///
/// # Errors
/// - [`StegoError::InvalidDimensions`] if the buffer does not match `width × height`.
/// - [`StegoError::DecodeFailed`] for everything else.
pub fn decode(pixels: &[u8], width: u32, height: u32, password: &str) -> Result<String, StegoError> {
    super::validate_dimensions(width, height, pixels.len())?;
    progress::init(DECODE_STEPS);
    let result = decode_impl(pixels, width, height, password).map_err(|_| StegoError::DecodeFailed);
    progress::finish();
    result
}

fn decode_impl(pixels: &[u8], width: u32, height: u32, password: &str) -> Result<String, StegoError> {
    let header_key = crypto::derive_header_key(password);
    let payload_key = crypto::derive_payload_key(password);
    progress::advance();

    let mut engine = ScatterEngine::new(pixels, width, height, header_key.seed_words())?;
    let header = read_header(pixels, &mut engine, &header_key)?;
    progress::advance();

    let stored = stored_payload_extent(header, &engine)?;
    let addresses = engine.generate(stored * 8, header.codec_type.scatter)?;
    let payload_code = extract_bytes(pixels, engine.geometry(), &addresses);
    progress::advance();

    let ciphertext = match header.codec_type.ecc {
        EccType::None => payload_code,
        EccType::Golay24 => golay::decode_bytes(&payload_code, header.payload_len as usize),
    };
    let compressed = crypto::decrypt(&ciphertext, &payload_key)?;
    let message = payload::decompress_message(&compressed)?;
    progress::advance();
    Ok(message)
}

/// Pull the 264 header slots and decrypt them with the header key.
fn read_header(pixels: &[u8], engine: &mut ScatterEngine, header_key: &KeyMaterial) -> Result<Header, StegoError> {
    let addresses = engine.generate(HEADER_SLOTS, ScatterType::Uniform)?;
    let header_code = extract_bytes(pixels, engine.geometry(), &addresses);
    let header_cipher = golay::decode_bytes(&header_code, HEADER_CIPHERTEXT_LEN);
    Header::parse(&crypto::decrypt(&header_cipher, header_key)?)
}

/// Stored payload bytes announced by `header`, checked against what the
/// engine can still issue before any payload buffer is allocated.
fn stored_payload_extent(header: Header, engine: &ScatterEngine) -> Result<usize, StegoError> {
    let stored = header.stored_payload_len()?;
    let capacity = engine.free_space(header.codec_type.scatter) >> 3;
    debug!("decode: type {}, payload {stored} of {capacity} bytes", header.codec_type);
    if !(MIN_STORED_LEN..=capacity).contains(&stored) {
        return Err(StegoError::DecodeFailed);
    }
    Ok(stored)
}

/// Write `data` into the slots at `addresses`, bit `i % 8` of byte `i / 8`
/// going to `addresses[i]`.
fn embed_bits(pixels: &mut [u8], geometry: &Geometry, addresses: &[u32], data: &[u8]) {
    for (i, &address) in addresses.iter().enumerate() {
        let slot = geometry.locate(address);
        let byte = &mut pixels[geometry.byte_offset(&slot)];
        if (data[i >> 3] >> (i & 7)) & 1 == 1 {
            *byte |= slot.mask();
        } else {
            *byte &= !slot.mask();
        }
    }
}

/// Inverse of [`embed_bits`]; reads `addresses.len() / 8` bytes.
fn extract_bytes(pixels: &[u8], geometry: &Geometry, addresses: &[u32]) -> Vec<u8> {
    let mut data = vec![0u8; addresses.len() / 8];
    for (i, &address) in addresses.iter().enumerate() {
        let slot = geometry.locate(address);
        if pixels[geometry.byte_offset(&slot)] & slot.mask() != 0 {
            data[i >> 3] |= 1 << (i & 7);
        }
    }
    data
}
