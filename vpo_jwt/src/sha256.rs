//! SHA-256, implemented from first principles.
//!
//! The initial hash state and the 64 round constants are not hard-coded. They are the first 32 bits of the fractional
//! parts of the square roots (state) and cube roots (round constants) of the first primes, derived once on first use and
//! shared, read-only, by every caller after that.
//!
//! All words are read and written with explicit big-endian conversions, so the output is identical on every host.

use once_cell::sync::Lazy;

/// Size of a message block, in bytes.
pub const BLOCK_SIZE: usize = 64;
/// Size of the digest, in bytes.
pub const DIGEST_SIZE: usize = 32;

const ROUNDS: usize = 64;
const STATE_WORDS: usize = 8;

struct Constants {
    initial_state: [u32; STATE_WORDS],
    round_constants: [u32; ROUNDS],
}

static CONSTANTS: Lazy<Constants> = Lazy::new(derive_constants);

/// The initial hash state, H(0).
pub fn initial_state() -> [u32; STATE_WORDS] {
    CONSTANTS.initial_state
}

/// The round constants, K(0)..K(63).
pub fn round_constants() -> &'static [u32; ROUNDS] {
    &CONSTANTS.round_constants
}

/// Computes the SHA-256 digest of `data`.
pub fn digest(data: &[u8]) -> [u8; DIGEST_SIZE] {
    let constants = &*CONSTANTS;
    let mut state = constants.initial_state;
    for block in pad_message(data).chunks_exact(BLOCK_SIZE) {
        compress(&mut state, block, &constants.round_constants);
    }
    let mut result = [0u8; DIGEST_SIZE];
    for (out, word) in result.chunks_exact_mut(4).zip(state.iter()) {
        out.copy_from_slice(&word.to_be_bytes());
    }
    result
}

fn derive_constants() -> Constants {
    let mut initial_state = [0u32; STATE_WORDS];
    let mut round_constants = [0u32; ROUNDS];
    let primes = (2u32..).filter(|&n| is_prime(n)).take(ROUNDS);
    for (i, prime) in primes.enumerate() {
        let n = f64::from(prime);
        if i < STATE_WORDS {
            initial_state[i] = fractional_bits(n.sqrt());
        }
        round_constants[i] = fractional_bits(n.cbrt());
    }
    Constants { initial_state, round_constants }
}

fn is_prime(n: u32) -> bool {
    n >= 2 && (2..).take_while(|f| f * f <= n).all(|f| n % f != 0)
}

/// First 32 bits of the fractional part of `x`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fractional_bits(x: f64) -> u32 {
    ((x - x.floor()) * 4_294_967_296.0) as u32
}

/// Appends the `1` bit, zero padding and the 64-bit big-endian message length in bits, so that the result is a whole
/// number of blocks. Messages with fewer than 9 bytes of room left in their last block spill into an extra block.
fn pad_message(data: &[u8]) -> Vec<u8> {
    let bit_len = (data.len() as u64).wrapping_mul(8);
    let padded_len = (data.len() + 9).div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(data);
    padded.push(0x80);
    padded.resize(padded_len - 8, 0);
    padded.extend_from_slice(&bit_len.to_be_bytes());
    padded
}

fn compress(state: &mut [u32; STATE_WORDS], block: &[u8], k: &[u32; ROUNDS]) {
    let mut schedule = [0u32; ROUNDS];
    for (word, bytes) in schedule.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    for t in 16..ROUNDS {
        schedule[t] = small_sigma1(schedule[t - 2])
            .wrapping_add(schedule[t - 7])
            .wrapping_add(small_sigma0(schedule[t - 15]))
            .wrapping_add(schedule[t - 16]);
    }

    let mut working = *state;
    for (k_t, w_t) in k.iter().zip(schedule.iter()) {
        let [a, b, c, _, e, f, g, h] = working;
        let t1 = h.wrapping_add(big_sigma1(e)).wrapping_add(choice(e, f, g)).wrapping_add(*k_t).wrapping_add(*w_t);
        let t2 = big_sigma0(a).wrapping_add(majority(a, b, c));
        // a..h shift down one place; the new `a` and `e` absorb the round temporaries
        working.rotate_right(1);
        working[0] = t1.wrapping_add(t2);
        working[4] = working[4].wrapping_add(t1);
    }

    for (s, w) in state.iter_mut().zip(working.iter()) {
        *s = s.wrapping_add(*w);
    }
}

#[inline]
fn choice(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline]
fn majority(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

#[inline]
fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline]
fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline]
fn small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline]
fn small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}
