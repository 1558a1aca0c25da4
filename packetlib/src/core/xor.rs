//! 8-bit XOR checksum for frame integrity verification.
//!
//! Every byte of a frame except the trailing checksum slot is folded
//! together with XOR, starting from zero. The same routine is used when
//! building a frame and when verifying one off the air.
//!
//! # Example
//!
//! ```rust
//! use packetlib::Xor8;
//!
//! let data = b"Hello, World!";
//! let sum = Xor8::compute(data);
//!
//! assert!(Xor8::verify(data, sum));
//! ```

/// Computes the XOR checksum of `data` in one call.
#[inline]
pub fn checksum(data: &[u8]) -> u8 {
    Xor8::compute(data)
}

/// Incremental XOR checksum calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xor8 {
    state: u8,
}

impl Xor8 {
    /// Creates a calculator seeded at zero.
    #[inline]
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    /// Folds `data` into the running checksum.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.state = data.iter().fold(self.state, |acc, &b| acc ^ b);
    }

    /// Returns the checksum.
    #[inline]
    pub const fn finalize(self) -> u8 {
        self.state
    }

    /// Computes the checksum of `data`.
    #[inline]
    pub fn compute(data: &[u8]) -> u8 {
        let mut sum = Self::new();
        sum.update(data);
        sum.finalize()
    }

    /// Verifies that `data` folds to `expected`.
    #[inline]
    pub fn verify(data: &[u8], expected: u8) -> bool {
        Self::compute(data) == expected
    }
}
