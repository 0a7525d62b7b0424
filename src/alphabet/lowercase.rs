use super::Alphabet;

/// `a..=z` mapped to `1..=26` with base 26.
///
/// `z` maps to 26 which equals the base. Digits in `1..=26` still form a
/// bijective base-26 numeral, so equal-length windows only collide after the
/// fingerprint is reduced by the modulus.
#[derive(Debug)]
pub struct LowercaseLatin {}

impl Alphabet for LowercaseLatin {
    const BASE: u64 = 26;

    fn value(symbol: u8) -> Option<u64> {
        match symbol {
            b'a'..=b'z' => Some((symbol - b'a') as u64 + 1),
            _ => None,
        }
    }
}
