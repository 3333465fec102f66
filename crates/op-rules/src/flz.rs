//! `FastLZ` compression-length estimate and the rollup gas data derived from it.
//!
//! The estimate mirrors the `flzCompressLen` routine used by the rollup's L1 data fee
//! accounting. It never produces compressed output; it only accounts for the instructions a
//! level-1 `FastLZ` compressor would emit. Since the value is a consensus input, every constant
//! and boundary below must be kept as is.

use alloc::{vec, vec::Vec};

use serde::{Deserialize, Serialize};

use crate::constants::flz::{
    HASH_MASK, HASH_MULTIPLIER, HASH_TABLE_SIZE, LITERAL_RUN, MATCH_RUN, MAX_DISTANCE,
    TRAILING_LITERALS,
};

/// Returns the estimated `FastLZ` compressed length of `input`.
pub fn flz_compress_len(input: &[u8]) -> u32 {
    let len = input.len() as u32;
    let ip_limit = len.saturating_sub(TRAILING_LITERALS as u32);
    let mut table: Vec<u32> = vec![0; HASH_TABLE_SIZE];

    let mut size = 0u32;
    let mut anchor = 0u32;
    let mut ip = 2u32;

    while ip < ip_limit {
        let mut reference;
        loop {
            let seq = u24(input, ip);
            let slot = hash(seq);
            reference = table[slot];
            table[slot] = ip;
            let distance = ip - reference;
            if ip >= ip_limit {
                break;
            }
            ip += 1;
            if distance <= MAX_DISTANCE && seq == u24(input, reference) {
                break;
            }
        }
        if ip >= ip_limit {
            break;
        }
        ip -= 1;
        if ip > anchor {
            size = literals(size, ip - anchor);
        }
        let matched = compare(input, reference + 3, ip + 3, ip_limit + 9);
        size = match_cost(size, matched);

        ip = set_next_hash(input, &mut table, ip + matched);
        ip = set_next_hash(input, &mut table, ip);
        anchor = ip;
    }

    literals(size, len - anchor)
}

/// Little-endian 24-bit value at `index`.
#[inline]
fn u24(input: &[u8], index: u32) -> u32 {
    let i = index as usize;
    u32::from(input[i]) | (u32::from(input[i + 1]) << 8) | (u32::from(input[i + 2]) << 16)
}

#[inline]
const fn hash(seq: u32) -> usize {
    (((seq as u64).wrapping_mul(HASH_MULTIPLIER) >> 19) & HASH_MASK) as usize
}

#[inline]
fn set_next_hash(input: &[u8], table: &mut [u32], ip: u32) -> u32 {
    table[hash(u24(input, ip))] = ip;
    ip + 1
}

/// Length of the match between the windows at `p` and `q`, counting the first mismatching byte,
/// bounded by `end - q`.
#[inline]
fn compare(input: &[u8], p: u32, q: u32, end: u32) -> u32 {
    let mut bound = end.saturating_sub(q);
    let mut count = 0;
    while count < bound {
        if input[(p + count) as usize] != input[(q + count) as usize] {
            bound = 0;
        }
        count += 1;
    }
    count
}

#[inline]
const fn literals(size: u32, run: u32) -> u32 {
    let mut size = size + (LITERAL_RUN + 1) * (run / LITERAL_RUN);
    let rest = run % LITERAL_RUN;
    if rest != 0 {
        size += rest + 1;
    }
    size
}

#[inline]
const fn match_cost(size: u32, len: u32) -> u32 {
    let len = len - 1;
    let size = size + 3 * (len / MATCH_RUN);
    if len % MATCH_RUN >= 6 {
        size + 3
    } else {
        size + 2
    }
}

/// Inputs to the L1 data fee of one transaction: the byte histogram of its encoding and the
/// `FastLZ` estimate of it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupGasData {
    /// Number of zero bytes.
    pub zeroes: u64,
    /// Number of non-zero bytes.
    pub ones: u64,
    /// Estimated `FastLZ` compressed size.
    pub fastlz_size: u64,
}

impl RollupGasData {
    /// Gas data of an absent payload.
    pub const EMPTY: Self = Self { zeroes: 0, ones: 0, fastlz_size: 0 };

    /// Derives the gas data of an encoded transaction. An absent payload yields [`Self::EMPTY`]
    /// without running the estimator.
    pub fn from_payload(payload: Option<&[u8]>) -> Self {
        let Some(payload) = payload else { return Self::EMPTY };
        let zeroes = payload.iter().filter(|byte| **byte == 0).count() as u64;
        Self {
            zeroes,
            ones: payload.len() as u64 - zeroes,
            fastlz_size: u64::from(flz_compress_len(payload)),
        }
    }

    /// Total length of the payload the data was derived from.
    pub const fn payload_len(&self) -> u64 {
        self.zeroes + self.ones
    }
}
