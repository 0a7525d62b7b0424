pub mod bytes;
pub mod lowercase;

pub use bytes::Bytes;
pub use lowercase::LowercaseLatin;

/// Maps symbols to the coefficients of the polynomial fingerprint.
///
/// `value` must be injective over the symbols it accepts, and its values
/// must be the digits of a base-`BASE` numeral: either all in `0..BASE`
/// (positional) or all in `1..=BASE` (bijective). Either way, equal-length
/// windows of accepted symbols have distinct fingerprints before the
/// reduction by the modulus.
pub trait Alphabet {
    const BASE: u64;

    fn value(symbol: u8) -> Option<u64>;
}
