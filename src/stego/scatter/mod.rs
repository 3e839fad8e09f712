// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Keyed bit-slot scatter engine.
//!
//! The engine gathers every bit-slot of the opaque pixels into one address
//! pool and hands out addresses without replacement, driven by an sfc32
//! stream seeded from the header IV. Two profiles exist:
//!
//! - **Uniform**: offset Fisher-Yates over the whole pool. Capacity is the
//!   full pool.
//! - **Shaped**: the remaining pool is bucketed by bit-plane and draws follow
//!   per-plane quotas (see [`shaped`]). Capacity is half the pool.
//!
//! The first [`HEADER_SLOTS`] draws are always Uniform. The engine may switch
//! Uniform → Shaped once, after the header region; it never switches back.
//!
//! An engine is a single forward pass over one image: consumed slots are
//! swapped out of the live window and never revisited.

mod shaped;
pub mod sfc32;
pub mod slot;

use log::{debug, trace};

use crate::stego::codec_type::ScatterType;
use crate::stego::error::StegoError;
use crate::stego::header::HEADER_SLOTS;
use crate::stego::validate_dimensions;

use self::sfc32::Sfc32;
use self::shaped::ShapedState;
use self::slot::{gather_slots, Geometry};

/// Stateful address generator for one encode or decode session.
pub struct ScatterEngine {
    geometry: Geometry,
    pool: Vec<u32>,
    rng: Sfc32,
    used: usize,
    last_pos: usize,
    shaped: Option<ShapedState>,
}

impl ScatterEngine {
    /// Gather the slots of `pixels` and seed the PRNG.
    ///
    /// # Errors
    /// [`StegoError::InvalidDimensions`] if `pixels` is not a `width × height`
    /// RGBA buffer within the size limits.
    pub fn new(pixels: &[u8], width: u32, height: u32, seed: [u32; 4]) -> Result<Self, StegoError> {
        validate_dimensions(width, height, pixels.len())?;
        let geometry = Geometry::new(width, height);
        let pool = gather_slots(pixels, &geometry);
        debug!("scatter: {}x{} image, {} bit-slots", width, height, pool.len());
        Ok(Self {
            geometry,
            pool,
            rng: Sfc32::from_seed(seed),
            used: 0,
            last_pos: 0,
            shaped: None,
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Addresses issued so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Profile currently in effect.
    pub fn scatter_type(&self) -> ScatterType {
        if self.shaped.is_some() {
            ScatterType::Shaped
        } else {
            ScatterType::Uniform
        }
    }

    /// Bit-slots still obtainable with `scatter_type`.
    pub fn free_space(&self, scatter_type: ScatterType) -> usize {
        match scatter_type {
            ScatterType::Uniform => self.pool.len() - self.used,
            ScatterType::Shaped => {
                let half = (self.pool.len() >> 1).saturating_sub(self.used);
                match &self.shaped {
                    Some(state) => half.min(state.remaining()),
                    None => half,
                }
            }
        }
    }

    /// Issue the next `n` addresses.
    ///
    /// Draws inside the header region are Uniform whatever `scatter_type`
    /// says; the first draw past it with `Shaped` switches the engine.
    ///
    /// # Errors
    /// - [`StegoError::InsufficientSlots`] if `n` exceeds
    ///   [`free_space`](Self::free_space) for `scatter_type`.
    /// - [`StegoError::ScatterRegression`] if Uniform draws are requested
    ///   past the header after the engine has switched to Shaped.
    pub fn generate(&mut self, n: usize, scatter_type: ScatterType) -> Result<Vec<u32>, StegoError> {
        let available = self.free_space(scatter_type);
        if n > available {
            return Err(StegoError::InsufficientSlots { requested: n, available });
        }

        let head = HEADER_SLOTS.saturating_sub(self.used).min(n);
        let rest = n - head;
        if rest > 0 && scatter_type == ScatterType::Uniform && self.shaped.is_some() {
            return Err(StegoError::ScatterRegression);
        }

        let mut addresses = Vec::with_capacity(n);
        for _ in 0..head {
            addresses.push(self.draw_uniform());
        }
        if rest == 0 {
            return Ok(addresses);
        }

        match scatter_type {
            ScatterType::Uniform => {
                for _ in 0..rest {
                    addresses.push(self.draw_uniform());
                }
            }
            ScatterType::Shaped => {
                if self.shaped.is_none() {
                    trace!("scatter: switching to shaped after {} draws", self.used);
                    self.shaped = Some(ShapedState::from_uniform(&mut self.pool, self.used, &self.geometry));
                }
                if let Some(state) = self.shaped.as_mut() {
                    if rest > state.remaining() {
                        return Err(StegoError::InsufficientSlots {
                            requested: n,
                            available: head + state.remaining(),
                        });
                    }
                    for _ in 0..rest {
                        addresses.push(state.draw(&mut self.pool, &mut self.rng, &mut self.last_pos));
                    }
                    self.used += rest;
                }
            }
        }
        Ok(addresses)
    }

    fn draw_uniform(&mut self) -> u32 {
        let live = self.pool.len() - self.used;
        let r = (offset_pick(&mut self.rng, live) + self.last_pos) % live;
        self.last_pos = r;
        let address = self.pool[r];
        self.pool[r] = self.pool[live - 1];
        self.used += 1;
        address
    }
}

/// `round(rng · (live - 1))`, the raw pick before the carried offset.
fn offset_pick(rng: &mut Sfc32, live: usize) -> usize {
    (rng.next_f64() * (live - 1) as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SEED: [u32; 4] = [0x0123_4567, 0x89ab_cdef, 0xdead_beef, 0xcafe_f00d];

    fn opaque(width: usize, height: usize) -> Vec<u8> {
        vec![255u8; width * height * 4]
    }

    #[test]
    fn uniform_addresses_unique_and_space_shrinks() {
        let px = opaque(20, 20);
        let mut engine = ScatterEngine::new(&px, 20, 20, SEED).unwrap();
        let total = engine.free_space(ScatterType::Uniform);
        assert_eq!(total, 20 * 20 * 12);

        let mut seen = HashSet::new();
        let mut expected = total;
        for n in [100, 164, 1, 500, 1000] {
            for a in engine.generate(n, ScatterType::Uniform).unwrap() {
                assert!(seen.insert(a), "address {a} issued twice");
                assert!((a as usize) < total);
            }
            expected -= n;
            assert_eq!(engine.free_space(ScatterType::Uniform), expected);
        }
    }

    #[test]
    fn uniform_drains_whole_pool() {
        let px = opaque(8, 8);
        let mut engine = ScatterEngine::new(&px, 8, 8, SEED).unwrap();
        let all = engine.generate(8 * 8 * 12, ScatterType::Uniform).unwrap();
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 8 * 8 * 12);
        assert_eq!(engine.free_space(ScatterType::Uniform), 0);
    }

    #[test]
    fn shaped_capacity_is_half() {
        let px = opaque(64, 48);
        let engine = ScatterEngine::new(&px, 64, 48, SEED).unwrap();
        assert_eq!(
            engine.free_space(ScatterType::Shaped) * 2,
            engine.free_space(ScatterType::Uniform)
        );
    }

    #[test]
    fn shaped_drain_unique_and_exact() {
        let px = opaque(32, 32);
        let mut engine = ScatterEngine::new(&px, 32, 32, SEED).unwrap();
        let n = engine.free_space(ScatterType::Shaped);
        let all = engine.generate(n, ScatterType::Shaped).unwrap();
        assert_eq!(all.len(), n);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), n);
        assert_eq!(engine.free_space(ScatterType::Shaped), 0);
        assert_eq!(engine.scatter_type(), ScatterType::Shaped);
    }

    #[test]
    fn shaped_prefers_low_planes() {
        let px = opaque(64, 64);
        let mut engine = ScatterEngine::new(&px, 64, 64, SEED).unwrap();
        engine.generate(HEADER_SLOTS, ScatterType::Uniform).unwrap();
        let n = engine.free_space(ScatterType::Shaped);
        let addrs = engine.generate(n, ScatterType::Shaped).unwrap();
        let mut hist = [0usize; 4];
        for a in addrs {
            hist[engine.geometry().plane_of(a)] += 1;
        }
        assert!(hist[0] > hist[1] && hist[1] > hist[2] && hist[2] > hist[3], "{hist:?}");
    }

    #[test]
    fn header_region_stays_uniform() {
        let px = opaque(16, 16);
        let mut a = ScatterEngine::new(&px, 16, 16, SEED).unwrap();
        let mut b = ScatterEngine::new(&px, 16, 16, SEED).unwrap();
        let ua = a.generate(HEADER_SLOTS, ScatterType::Uniform).unwrap();
        let ub = b.generate(HEADER_SLOTS, ScatterType::Shaped).unwrap();
        assert_eq!(ua, ub);
        assert_eq!(b.scatter_type(), ScatterType::Uniform);
    }

    #[test]
    fn regression_to_uniform_rejected() {
        let px = opaque(16, 16);
        let mut engine = ScatterEngine::new(&px, 16, 16, SEED).unwrap();
        engine.generate(HEADER_SLOTS + 10, ScatterType::Shaped).unwrap();
        let used = engine.used();
        assert_eq!(engine.generate(1, ScatterType::Uniform), Err(StegoError::ScatterRegression));
        assert_eq!(engine.used(), used);
        assert!(engine.generate(1, ScatterType::Shaped).is_ok());
    }

    #[test]
    fn over_request_rejected() {
        let px = opaque(4, 4);
        let mut engine = ScatterEngine::new(&px, 4, 4, SEED).unwrap();
        let free = engine.free_space(ScatterType::Uniform);
        assert_eq!(
            engine.generate(free + 1, ScatterType::Uniform),
            Err(StegoError::InsufficientSlots { requested: free + 1, available: free })
        );
        assert_eq!(engine.used(), 0);
    }

    #[test]
    fn transparent_image_has_no_space() {
        let px = vec![0u8; 10 * 10 * 4];
        let mut engine = ScatterEngine::new(&px, 10, 10, SEED).unwrap();
        assert_eq!(engine.free_space(ScatterType::Uniform), 0);
        assert_eq!(engine.free_space(ScatterType::Shaped), 0);
        assert!(engine.generate(0, ScatterType::Uniform).unwrap().is_empty());
        assert!(engine.generate(1, ScatterType::Uniform).is_err());
    }

    #[test]
    fn mismatched_buffer_rejected() {
        let px = opaque(10, 10);
        let short = &px[..10 * 10 * 4 - 1];
        assert_eq!(ScatterEngine::new(short, 10, 10, SEED).err(), Some(StegoError::InvalidDimensions));
        assert_eq!(ScatterEngine::new(&px, 10, 11, SEED).err(), Some(StegoError::InvalidDimensions));
        assert_eq!(ScatterEngine::new(&[], 0, 0, SEED).err(), Some(StegoError::InvalidDimensions));
    }

    #[test]
    fn same_seed_same_stream() {
        let px = opaque(24, 24);
        let mut a = ScatterEngine::new(&px, 24, 24, SEED).unwrap();
        let mut b = ScatterEngine::new(&px, 24, 24, SEED).unwrap();
        assert_eq!(
            a.generate(600, ScatterType::Shaped).unwrap(),
            b.generate(600, ScatterType::Shaped).unwrap()
        );
        let mut c = ScatterEngine::new(&px, 24, 24, [1, 2, 3, 4]).unwrap();
        let mut d = ScatterEngine::new(&px, 24, 24, SEED).unwrap();
        assert_ne!(
            c.generate(50, ScatterType::Uniform).unwrap(),
            d.generate(50, ScatterType::Uniform).unwrap()
        );
    }
}
