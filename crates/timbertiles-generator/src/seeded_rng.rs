use std::fmt::{self, Display};

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const DRAW_DIVISOR: f64 = 4_294_967_295.0;

/// Deterministic generator used for the daily challenge.
///
/// The state is seeded by hashing the UTF-16 code units of a seed string with a
/// 32-bit FNV-1a variant, then every draw advances it with a 13/7/17 xorshift.
/// All arithmetic wraps at 32 bits. The exact sequence is part of the daily
/// challenge contract: changing any constant changes everybody's board.
///
/// ```
/// use timbertiles_generator::SeededRng;
///
/// let mut a = SeededRng::new("2024-1-1");
/// let mut b = SeededRng::new("2024-1-1");
/// for _ in 0..10 {
///     assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Seeds a generator from a string.
    #[must_use]
    pub fn new(seed: &str) -> Self {
        let state = seed.encode_utf16().fold(FNV_OFFSET_BASIS, |h, unit| {
            let h = h ^ u32::from(unit);
            h.wrapping_add(h << 1)
                .wrapping_add(h << 4)
                .wrapping_add(h << 7)
                .wrapping_add(h << 8)
                .wrapping_add(h << 24)
        });
        Self { state }
    }

    /// Returns the raw 32-bit state.
    #[must_use]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advances the state and returns it.
    pub fn next_u32(&mut self) -> u32 {
        let mut h = self.state;
        h ^= h >> 13;
        h ^= h << 7;
        h ^= h >> 17;
        self.state = h;
        h
    }

    /// Advances the state and returns it scaled into `[0, 1]`.
    ///
    /// The upper bound is reachable only when the state is `u32::MAX`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / DRAW_DIVISOR
    }

    /// Draws an index in `0..len` as `floor(next_f64() * len)`.
    ///
    /// A draw of exactly `1.0` is clamped to the last index.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot draw an index from an empty range");
        let scaled = (self.next_f64() * len as f64).floor() as usize;
        scaled.min(len - 1)
    }
}

impl Display for SeededRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.state)
    }
}
