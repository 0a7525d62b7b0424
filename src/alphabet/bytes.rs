use super::Alphabet;

/// Every byte is a symbol and maps to itself.
#[derive(Debug)]
pub struct Bytes {}

impl Alphabet for Bytes {
    // smallest prime above the alphabet size
    const BASE: u64 = 257;

    fn value(symbol: u8) -> Option<u64> {
        Some(symbol as u64)
    }
}
