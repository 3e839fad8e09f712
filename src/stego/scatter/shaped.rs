// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Shaped scatter profile.
//!
//! After the header region has been drawn uniformly, the remaining pool is
//! split into four equal buckets, one per bit-plane, and each bucket gets a
//! draw quota from fixed cumulative weights. Plane 0 takes the remainder, so
//! the lower planes change most often and plane 3 least, which keeps the
//! noise histogram bell-shaped instead of flat. Total quota is half of the
//! pool, leaving two planes' worth of slots untouched.
//!
//! Each draw first picks a bucket with probability proportional to its
//! remaining quota (using a lookahead buffer of PRNG draws), then performs the
//! same offset Fisher-Yates pick as the uniform profile inside that bucket.

use log::trace;

use super::sfc32::Sfc32;
use super::slot::{Geometry, PLANES};

/// Cumulative target share of each plane, relative to one layer.
const PLANE_WEIGHTS: [f64; PLANES] = [0.8, 0.665272, 0.382584, 0.152144];

/// Below this many slots per layer, the live window is re-sorted by plane
/// before bucketing (fewer than 128×128 available pixels).
const RESORT_THRESHOLD: usize = 3 * (1 << 14);

/// Length of the bucket-choice lookahead buffer.
const LOOKAHEAD_LEN: usize = 1 << 12;

/// Bucket partition and quota state for the shaped profile.
pub(super) struct ShapedState {
    bucket_len: usize,
    bucket_used: [usize; PLANES],
    quota: [usize; PLANES],
    total_quota: usize,
    lookahead: Box<[f64; LOOKAHEAD_LEN]>,
    lookahead_pos: usize,
}

impl ShapedState {
    /// Partition the live window of `pool` after `used` uniform draws.
    pub(super) fn from_uniform(pool: &mut [u32], used: usize, geometry: &Geometry) -> Self {
        let used_per_layer = used >> 2;
        let bits_per_layer = pool.len() >> 2;
        let bucket_len = bits_per_layer - used_per_layer;

        // Uniform draws backfill from the pool's tail (plane 3), so on small
        // images the header visibly skews the plane mix of every bucket.
        let resorted = bits_per_layer < RESORT_THRESHOLD;
        if resorted {
            sort_by_plane(&mut pool[..bucket_len * PLANES], geometry);
        }

        let mut quota = [0usize; PLANES];
        let mut total_quota = 0usize;
        for plane in (1..PLANES).rev() {
            let share = bits_per_layer as f64 * PLANE_WEIGHTS[plane] - used_per_layer as f64;
            quota[plane] = share.max(0.0) as usize;
            total_quota += quota[plane];
        }
        quota[0] = (pool.len() >> 1).saturating_sub(total_quota + used);
        total_quota += quota[0];

        trace!(
            "shaped scatter: bucket_len={bucket_len} resorted={resorted} quota={quota:?} total={total_quota}"
        );

        Self {
            bucket_len,
            bucket_used: [0; PLANES],
            quota,
            total_quota,
            lookahead: Box::new([0.0; LOOKAHEAD_LEN]),
            lookahead_pos: LOOKAHEAD_LEN - 1,
        }
    }

    /// Draws still permitted by the bucket quotas.
    pub(super) fn remaining(&self) -> usize {
        self.total_quota
    }

    /// Draw one address. `last_pos` is the offset carried between draws.
    pub(super) fn draw(&mut self, pool: &mut [u32], rng: &mut Sfc32, last_pos: &mut usize) -> u32 {
        if self.lookahead_pos == LOOKAHEAD_LEN - 1 {
            for slot in self.lookahead.iter_mut() {
                *slot = rng.next_f64();
            }
            self.lookahead_pos = 0;
        }
        let rb = (self.lookahead[self.lookahead_pos] * self.total_quota as f64) as usize;
        self.lookahead_pos += 1;

        let b = self.bucket_for(rb);
        let live = self.bucket_len - self.bucket_used[b];
        let r = (super::offset_pick(rng, live) + *last_pos) % live;
        *last_pos = r;

        let base = self.bucket_len * b;
        let address = pool[base + r];
        pool[base + r] = pool[base + live - 1];

        self.bucket_used[b] += 1;
        self.quota[b] -= 1;
        self.total_quota -= 1;
        address
    }

    /// Map a value in `[0, total_quota)` onto the cumulative quota boundaries.
    fn bucket_for(&self, rb: usize) -> usize {
        let q = &self.quota;
        (rb >= q[0]) as usize + (rb >= q[0] + q[1]) as usize + (rb >= q[0] + q[1] + q[2]) as usize
    }
}

/// Stable counting sort of addresses by bit-plane.
fn sort_by_plane(window: &mut [u32], geometry: &Geometry) {
    let mut starts = [0usize; PLANES];
    for &address in window.iter() {
        starts[geometry.plane_of(address)] += 1;
    }
    let mut acc = 0;
    for start in starts.iter_mut() {
        let count = *start;
        *start = acc;
        acc += count;
    }

    let mut sorted = vec![0u32; window.len()];
    for &address in window.iter() {
        let plane = geometry.plane_of(address);
        sorted[starts[plane]] = address;
        starts[plane] += 1;
    }
    window.copy_from_slice(&sorted);
}
