// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Extended binary Golay(24,12) error correction.
//!
//! Each 12-bit word is encoded systematically into a 24-bit codeword: the high
//! 12 bits carry the word, the low 12 bits carry parity. Decoding computes a
//! 12-bit syndrome and looks up a correction pattern for the data bits. Every
//! pattern of up to 3 flipped bits per codeword is corrected; heavier damage
//! silently yields a wrong word and is left to the decrypt/decompress stages.
//!
//! Byte streams are repacked through the 12-bit alphabet: every 3 input bytes
//! become 2 words, and every codeword is serialized big-endian as 3 bytes.
//! The original byte length must be known at decode time.

/// Number of distinct 12-bit words.
const GOLAY_SIZE: usize = 0x1000;

/// Generator parity rows, one per data bit (MSB first).
const G_P: [u16; 12] = [
    0xc75, 0x63b, 0xf68, 0x7b4, 0x3da, 0xd99, 0x6cd, 0x367, 0xdc6, 0xa97, 0x93e, 0x8eb,
];

/// Parity-check rows, one per parity bit (MSB first).
const H_P: [u16; 12] = [
    0xa4f, 0xf68, 0x7b4, 0x3da, 0x1ed, 0xab9, 0xf13, 0xdc6, 0x6e3, 0x93e, 0x49f, 0xc75,
];

/// Precomputed encode, syndrome and correction tables.
struct GolayTables {
    encode: Box<[u32; GOLAY_SIZE]>,
    syndrome: Box<[u16; GOLAY_SIZE]>,
    correct: Box<[u16; GOLAY_SIZE]>,
}

impl GolayTables {
    fn syndrome_of(&self, v: u32) -> u16 {
        self.syndrome[(v & 0xfff) as usize] ^ ((v >> 12) & 0xfff) as u16
    }
}

/// XOR-fold the rows of `matrix` selected by the set bits of `x` (MSB = row 0).
fn fold_rows(matrix: &[u16; 12], x: usize) -> u16 {
    let mut acc = 0u16;
    for (i, &row) in matrix.iter().enumerate() {
        if (x >> (11 - i)) & 1 == 1 {
            acc ^= row;
        }
    }
    acc
}

fn build_tables() -> GolayTables {
    let mut encode = Box::new([0u32; GOLAY_SIZE]);
    let mut syndrome = Box::new([0u16; GOLAY_SIZE]);
    let correct = Box::new([0u16; GOLAY_SIZE]);

    for x in 0..GOLAY_SIZE {
        encode[x] = ((x as u32) << 12) ^ fold_rows(&G_P, x) as u32;
        syndrome[x] = fold_rows(&H_P, x);
    }

    let mut tables = GolayTables { encode, syndrome, correct };

    // Enumeration order matters: on syndrome collisions the later pattern wins,
    // and existing images were encoded against exactly this table.
    for i in 0..24 {
        for j in i..24 {
            for k in j..24 {
                for l in k..24 {
                    let error: u32 = (1 << i) | (1 << j) | (1 << k) | (1 << l);
                    let s = tables.syndrome_of(error) as usize;
                    tables.correct[s] = ((error >> 12) & 0xfff) as u16;
                }
            }
        }
    }

    tables
}

fn tables() -> &'static GolayTables {
    use std::sync::OnceLock;
    static TABLES: OnceLock<GolayTables> = OnceLock::new();
    TABLES.get_or_init(build_tables)
}

/// Encode a 12-bit word (upper bits ignored) into a 24-bit codeword.
pub fn encode12(word: u16) -> u32 {
    tables().encode[(word & 0xfff) as usize]
}

/// Decode a 24-bit codeword (upper bits ignored) into the corrected 12-bit word.
pub fn decode24(codeword: u32) -> u16 {
    let t = tables();
    let data = ((codeword >> 12) & 0xfff) as u16;
    data ^ t.correct[t.syndrome_of(codeword) as usize]
}

/// Number of 12-bit words used to carry `len` bytes.
const fn word_count(len: usize) -> usize {
    (len + 1) * 8 / 12
}

/// Encoded size in bytes of a `len`-byte input.
pub const fn encoded_len(len: usize) -> usize {
    word_count(len) * 3
}

/// [`encoded_len`] for lengths read from untrusted input; `None` on overflow.
pub fn checked_encoded_len(len: usize) -> Option<usize> {
    let bits = len.checked_add(1)?.checked_mul(8)?;
    Some(bits / 12 * 3)
}

/// Extract the `i`-th 12-bit word from a byte stream, zero-padding past the end.
fn word_at(data: &[u8], i: usize) -> u16 {
    let o = i + (i >> 1);
    let bo = ((i & 1) << 2) as u32;
    let hi = data.get(o).copied().unwrap_or(0) as u32;
    let lo = data.get(o + 1).copied().unwrap_or(0) as u32;
    (((hi << (4 + bo)) + (lo >> (4 - bo))) & 0xfff) as u16
}

/// Merge the `i`-th decoded word back into the output byte stream.
fn put_word(data: &mut [u8], i: usize, word: u16) {
    let o = i + (i >> 1);
    let bo = ((i & 1) << 2) as u32;
    let word = word as u32;
    if let Some(b) = data.get_mut(o) {
        *b |= (word >> (4 + bo)) as u8;
    }
    if let Some(b) = data.get_mut(o + 1) {
        *b = (word << (4 - bo)) as u8;
    }
}

fn write_codeword(out: &mut [u8], codeword: u32) {
    out[0] = (codeword >> 16) as u8;
    out[1] = (codeword >> 8) as u8;
    out[2] = codeword as u8;
}

fn read_codeword(chunk: &[u8]) -> u32 {
    ((chunk[0] as u32) << 16) | ((chunk[1] as u32) << 8) | chunk[2] as u32
}

/// Golay-encode a byte stream. Output length is [`encoded_len`]`(data.len())`.
#[cfg(not(feature = "parallel"))]
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoded = vec![0u8; encoded_len(data.len())];
    for (i, out) in encoded.chunks_exact_mut(3).enumerate() {
        write_codeword(out, encode12(word_at(data, i)));
    }
    encoded
}

/// Golay-encode a byte stream. Output length is [`encoded_len`]`(data.len())`.
#[cfg(feature = "parallel")]
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    use rayon::prelude::*;
    let mut encoded = vec![0u8; encoded_len(data.len())];
    encoded
        .par_chunks_exact_mut(3)
        .enumerate()
        .for_each(|(i, out)| write_codeword(out, encode12(word_at(data, i))));
    encoded
}

/// Golay-decode a byte stream back into `len` bytes.
///
/// `len` is the original (pre-encoding) length; trailing padding bits are
/// dropped and missing codewords leave zero bytes.
#[cfg(not(feature = "parallel"))]
pub fn decode_bytes(encoded: &[u8], len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    for (i, chunk) in encoded.chunks_exact(3).enumerate() {
        put_word(&mut data, i, decode24(read_codeword(chunk)));
    }
    data
}

/// Golay-decode a byte stream back into `len` bytes.
///
/// `len` is the original (pre-encoding) length; trailing padding bits are
/// dropped and missing codewords leave zero bytes.
#[cfg(feature = "parallel")]
pub fn decode_bytes(encoded: &[u8], len: usize) -> Vec<u8> {
    use rayon::prelude::*;
    // Adjacent words share a byte, so only the table lookups run in parallel.
    let words: Vec<u16> = encoded
        .par_chunks_exact(3)
        .map(|chunk| decode24(read_codeword(chunk)))
        .collect();
    let mut data = vec![0u8; len];
    for (i, &word) in words.iter().enumerate() {
        put_word(&mut data, i, word);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn known_codewords() {
        assert_eq!(encode12(0x000), 0x000000);
        assert_eq!(encode12(0x001), 0x0018eb);
        assert_eq!(encode12(0x800), 0x800c75);
        assert_eq!(encode12(0xabc), 0xabc23c);
        assert_eq!(encode12(0xfff), 0xffffff);
    }

    #[test]
    fn systematic_high_bits() {
        for w in 0..GOLAY_SIZE as u16 {
            assert_eq!((encode12(w) >> 12) as u16, w);
        }
    }

    #[test]
    fn roundtrip_all_words() {
        for w in 0..GOLAY_SIZE as u16 {
            assert_eq!(decode24(encode12(w)), w, "word {w:#05x}");
        }
    }

    #[test]
    fn corrects_up_to_three_errors() {
        // Every 5th word against every error pattern of weight 1..=3.
        for w in (0..GOLAY_SIZE as u16).step_by(5) {
            let c = encode12(w);
            for a in 0..24 {
                assert_eq!(decode24(c ^ (1 << a)), w);
                for b in (a + 1)..24 {
                    assert_eq!(decode24(c ^ (1 << a) ^ (1 << b)), w);
                    for d in (b + 1)..24 {
                        let e = (1u32 << a) | (1 << b) | (1 << d);
                        assert_eq!(decode24(c ^ e), w, "word {w:#05x} error {e:#08x}");
                    }
                }
            }
        }
    }

    #[test]
    fn upper_bits_ignored() {
        assert_eq!(encode12(0xf001), encode12(0x001));
        assert_eq!(decode24(0xff00_0000 | encode12(0x123)), 0x123);
    }

    #[test]
    fn encoded_len_values() {
        assert_eq!(encoded_len(0), 0);
        assert_eq!(encoded_len(1), 3);
        assert_eq!(encoded_len(2), 6);
        assert_eq!(encoded_len(3), 6);
        assert_eq!(encoded_len(16), 33);
        assert_eq!(encoded_len(32), 66);
    }

    #[test]
    fn checked_encoded_len_agrees_and_overflows() {
        for len in [0, 1, 2, 3, 16, 32, 1000, 1 << 20] {
            assert_eq!(checked_encoded_len(len), Some(encoded_len(len)));
        }
        assert_eq!(checked_encoded_len(usize::MAX), None);
        assert_eq!(checked_encoded_len(usize::MAX / 8), None);
        assert!(checked_encoded_len(usize::MAX / 8 - 1).is_some());
    }

    #[test]
    fn bytes_roundtrip_all_short_lengths() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for len in 0..200 {
            let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let enc = encode_bytes(&data);
            assert_eq!(enc.len(), encoded_len(len));
            assert_eq!(decode_bytes(&enc, len), data, "len {len}");
        }
    }

    #[test]
    fn bytes_survive_scattered_bit_errors() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let data: Vec<u8> = (0..300).map(|_| rng.gen()).collect();
        let mut enc = encode_bytes(&data);
        // Flip up to 3 bits inside each 3-byte codeword.
        for chunk in enc.chunks_exact_mut(3) {
            let flips = rng.gen_range(0..=3);
            let mut used = 0u32;
            for _ in 0..flips {
                let mut bit = rng.gen_range(0..24);
                while used & (1 << bit) != 0 {
                    bit = rng.gen_range(0..24);
                }
                used |= 1 << bit;
                chunk[2 - bit / 8] ^= 1 << (bit % 8);
            }
        }
        assert_eq!(decode_bytes(&enc, data.len()), data);
    }

    #[test]
    fn decode_with_short_input_leaves_zeros() {
        let data = [0xde, 0xad, 0xbe, 0xef];
        let enc = encode_bytes(&data);
        let partial = decode_bytes(&enc[..3], 4);
        assert_eq!(partial, vec![0xde, 0xa0, 0x00, 0x00]);
    }
}
