// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Bit-slot addressing and capacity discovery.
//!
//! A bit-slot is one writable bit: (pixel, channel ∈ {R,G,B}, plane ∈ 0..4).
//! Slots are packed into a single `u32` address:
//!
//! ```text
//! address = scan_index + pixel_count * (plane * 3 + channel)
//! ```
//!
//! where the scan order walks pixels column by column from the bottom-right
//! corner: scan index `i` is `y = h-1 - (i mod h)`, `x = w-1 - ((i / h) mod w)`.
//! Encoder and decoder must agree on this order exactly.

/// Colour channels carrying data (R, G, B).
pub const CHANNELS: usize = 3;
/// Low bit-planes carrying data per channel.
pub const PLANES: usize = 4;
/// Bit-slots per available pixel.
pub const SLOTS_PER_PIXEL: usize = CHANNELS * PLANES;

/// Alpha value marking a pixel as available.
const OPAQUE: u8 = 255;

/// Image shape used to translate between scan order, addresses and bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    width: usize,
    height: usize,
}

/// One decoded bit-slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSlot {
    pub x: usize,
    pub y: usize,
    pub channel: usize,
    pub plane: usize,
}

impl Geometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width: width as usize, height: height as usize }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Addresses per bit-plane layer (all pixels × 3 channels).
    pub fn layer_size(&self) -> usize {
        self.pixel_count() * CHANNELS
    }

    /// (x, y) of scan index `i`.
    pub fn scan_to_xy(&self, i: usize) -> (usize, usize) {
        let y = self.height - 1 - (i % self.height);
        let x = self.width - 1 - ((i / self.height) % self.width);
        (x, y)
    }

    /// Decode an address into its pixel, channel and plane.
    pub fn locate(&self, address: u32) -> BitSlot {
        let mut r = address as usize;
        let y = self.height - 1 - (r % self.height);
        r /= self.height;
        let x = self.width - 1 - (r % self.width);
        r /= self.width;
        let channel = r % CHANNELS;
        let plane = r / CHANNELS;
        BitSlot { x, y, channel, plane }
    }

    /// Bit-plane layer (0..4) of an address.
    pub fn plane_of(&self, address: u32) -> usize {
        address as usize / self.layer_size()
    }

    /// Byte offset of `slot` inside an RGBA buffer.
    pub fn byte_offset(&self, slot: &BitSlot) -> usize {
        (slot.y * self.width + slot.x) * 4 + slot.channel
    }
}

impl BitSlot {
    /// Mask selecting this slot's bit within its channel byte.
    pub fn mask(&self) -> u8 {
        1 << self.plane
    }
}

/// Enumerate every bit-slot of every opaque pixel.
///
/// The pool is ordered plane-major, then channel, then available pixel in
/// scan order; its length is `12 × opaque pixel count`.
pub fn gather_slots(pixels: &[u8], geometry: &Geometry) -> Vec<u32> {
    let pixel_count = geometry.pixel_count();
    let available: Vec<u32> = (0..pixel_count)
        .filter(|&i| {
            let (x, y) = geometry.scan_to_xy(i);
            pixels[(y * geometry.width + x) * 4 + 3] == OPAQUE
        })
        .map(|i| i as u32)
        .collect();

    let mut pool = Vec::with_capacity(available.len() * SLOTS_PER_PIXEL);
    for plane in 0..PLANES {
        for channel in 0..CHANNELS {
            let offset = (pixel_count * (plane * CHANNELS + channel)) as u32;
            pool.extend(available.iter().map(|&i| i + offset));
        }
    }
    pool
}

/// Number of opaque pixels in an RGBA buffer.
pub fn opaque_pixel_count(pixels: &[u8]) -> usize {
    pixels.chunks_exact(4).filter(|px| px[3] == OPAQUE).count()
}
