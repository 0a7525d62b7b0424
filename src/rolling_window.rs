use std::marker::PhantomData;

use thiserror::Error;

use crate::alphabet::Alphabet;

/// Fingerprints are reduced modulo this Mersenne prime (2^61 - 1).
pub const MODULUS: u64 = (1 << 61) - 1;

/// Coefficient of a symbol outside the alphabet that slid into the window.
pub const UNMAPPED: u64 = 0;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("window size {window_size} is invalid for a text of length {text_len}")]
    InvalidWindow { window_size: usize, text_len: usize },
    #[error("symbol {symbol:#04x} at position {position} is outside the alphabet")]
    InvalidSymbol { symbol: u8, position: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// A fixed-size window over `text` whose polynomial fingerprint is updated
/// in O(1) on every slide.
///
/// For the window `[start, end)` the fingerprint is
/// `sum(value(text[start + i]) * BASE^(window_size - 1 - i)) mod MODULUS`.
#[derive(Debug)]
pub struct RollingWindow<'a, A: Alphabet> {
    text: &'a [u8],
    window_size: usize,
    start: usize,
    end: usize,
    fingerprint: u64,
    // BASE^(window_size - 1) mod MODULUS, the weight of the outgoing symbol
    leading_power: u64,
    alphabet: PhantomData<A>,
}

impl<'a, A: Alphabet> RollingWindow<'a, A> {
    /// Places a window of `window_size` symbols at the start of `text`.
    ///
    /// Only the symbols of the first window are checked against the
    /// alphabet. Symbols met later by [`advance`](Self::advance) that fall
    /// outside it weigh [`UNMAPPED`] in the fingerprint.
    ///
    /// ```
    /// use rabin_karp::alphabet::LowercaseLatin;
    /// use rabin_karp::rolling_window::{Error, RollingWindow};
    ///
    /// let window = RollingWindow::<LowercaseLatin>::new(b"abc", 2).unwrap();
    /// assert_eq!(window.fingerprint(), 1 * 26 + 2);
    ///
    /// assert_eq!(
    ///     RollingWindow::<LowercaseLatin>::new(b"abc", 4).err(),
    ///     Some(Error::InvalidWindow { window_size: 4, text_len: 3 })
    /// );
    /// assert!(RollingWindow::<LowercaseLatin>::new(b"ab!", 2).is_ok());
    /// ```
    pub fn new(text: &'a [u8], window_size: usize) -> Result<Self> {
        if window_size == 0 || window_size > text.len() {
            return Err(Error::InvalidWindow {
                window_size,
                text_len: text.len(),
            });
        }

        let fingerprint = polynomial_fingerprint::<A>(&text[..window_size])?;

        Ok(RollingWindow {
            text,
            window_size,
            start: 0,
            end: window_size,
            fingerprint,
            leading_power: pow_mod(A::BASE % MODULUS, window_size as u64 - 1),
            alphabet: PhantomData,
        })
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn window_text(&self) -> &'a [u8] {
        &self.text[self.start..self.end]
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn can_advance(&self) -> bool {
        self.end < self.text.len()
    }

    /// Slides the window one symbol to the right.
    ///
    /// Does nothing once the window touches the end of the text; check
    /// [`can_advance`](Self::can_advance) before relying on the window moving.
    /// An incoming symbol outside the alphabet counts as [`UNMAPPED`].
    pub fn advance(&mut self) {
        if !self.can_advance() {
            return;
        }

        let outgoing = mul_mod(coefficient::<A>(self.text[self.start]), self.leading_power);
        let remainder = (self.fingerprint + MODULUS - outgoing) % MODULUS;
        let incoming = coefficient::<A>(self.text[self.end]);
        self.fingerprint = (mul_mod(remainder, A::BASE % MODULUS) + incoming) % MODULUS;

        self.start += 1;
        self.end += 1;
    }
}

/// Computes the fingerprint of `symbols` from scratch, most significant
/// symbol first.
pub fn polynomial_fingerprint<A: Alphabet>(symbols: &[u8]) -> Result<u64> {
    let base = A::BASE % MODULUS;
    symbols
        .iter()
        .enumerate()
        .try_fold(0, |fingerprint, (position, &symbol)| -> Result<u64> {
            let value = A::value(symbol).ok_or(Error::InvalidSymbol { symbol, position })?;
            Ok((mul_mod(fingerprint, base) + value % MODULUS) % MODULUS)
        })
}

fn coefficient<A: Alphabet>(symbol: u8) -> u64 {
    A::value(symbol).unwrap_or(UNMAPPED) % MODULUS
}

fn mul_mod(a: u64, b: u64) -> u64 {
    ((a as u128 * b as u128) % MODULUS as u128) as u64
}

fn pow_mod(mut base: u64, mut exponent: u64) -> u64 {
    let mut result = 1;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = mul_mod(result, base);
        }
        base = mul_mod(base, base);
        exponent >>= 1;
    }
    result
}
