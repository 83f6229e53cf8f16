//! Deterministic bit stream keyed by a [`Seed`]
//!
//! xoshiro256** over the four little-endian lanes of the seed. The
//! generator is not a cryptographic primitive: all entropy comes from the
//! SHA-256 seed, the stream only has to spread it cheaply over the grid.

use super::Seed;
use std::fmt;

// Replacement lanes for the all-zero state, which xoshiro never leaves.
const ZERO_STATE_REMAP: [u64; 4] = [
    0x9E37_79B9_7F4A_7C15,
    0xBF58_476D_1CE4_E5B9,
    0x94D0_49BB_1331_11EB,
    0x2545_F491_4F6C_DD1D,
];

/// Per-invocation pseudorandom cursor.
///
/// A value type owned by one pipeline run; never shared, never global.
#[derive(Clone)]
pub struct BitStream {
    state: [u64; 4],
    word: u64,
    bits_left: u32,
    words_drawn: u64,
}

impl BitStream {
    pub fn from_seed(seed: &Seed) -> Self {
        let bytes = seed.as_bytes();
        let mut state = [0u64; 4];
        for (lane, chunk) in state.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *lane = u64::from_le_bytes(buf);
        }
        Self::from_state(state)
    }

    /// Build a stream from raw lanes; an all-zero state is remapped
    pub fn from_state(state: [u64; 4]) -> Self {
        let state = if state == [0; 4] { ZERO_STATE_REMAP } else { state };
        Self {
            state,
            word: 0,
            bits_left: 0,
            words_drawn: 0,
        }
    }

    /// Next 64-bit output
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s = &mut self.state;
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 17;
        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(45);
        self.words_drawn += 1;
        result
    }

    /// Next single bit, least-significant bit of each word first
    #[inline]
    pub fn next_bit(&mut self) -> bool {
        if self.bits_left == 0 {
            self.word = self.next_u64();
            self.bits_left = 64;
        }
        let bit = self.word & 1 == 1;
        self.word >>= 1;
        self.bits_left -= 1;
        bit
    }

    /// Endless bit iterator borrowing this cursor
    pub fn bits(&mut self) -> impl Iterator<Item = bool> + '_ {
        std::iter::repeat_with(move || self.next_bit())
    }

    /// Number of 64-bit words consumed so far
    pub fn position(&self) -> u64 {
        self.words_drawn
    }
}

// The lanes are seed material; only the cursor position is printable.
impl fmt::Debug for BitStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitStream")
            .field("position", &self.words_drawn)
            .finish_non_exhaustive()
    }
}
