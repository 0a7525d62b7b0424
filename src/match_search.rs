use log::{debug, trace};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::alphabet::Alphabet;
use crate::rolling_window::{polynomial_fingerprint, Error, RollingWindow};
use crate::Position;

///
/// Finds the leftmost occurrence of `needle` in `haystack`
///
/// Empty input, a needle longer than the haystack, or a needle with symbols
/// outside `A` are reported as no match. Haystack symbols outside `A` never
/// take part in a match.
///
/// ```
/// use rabin_karp::alphabet::LowercaseLatin;
/// use rabin_karp::match_search::find_first;
///
/// assert_eq!(find_first::<LowercaseLatin>(b"cupcakes", b"balloonsandcupcakes"), Some(11));
/// assert_eq!(find_first::<LowercaseLatin>(b"cakes", b"cup cakes"), Some(4));
/// assert_eq!(find_first::<LowercaseLatin>(b"xyz", b"abc"), None);
/// ```
pub fn find_first<A: Alphabet>(needle: &[u8], haystack: &[u8]) -> Option<Position> {
    if needle.is_empty() || haystack.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    let needle_fingerprint = match RollingWindow::<A>::new(needle, needle.len()) {
        Ok(needle_window) => needle_window.fingerprint(),
        Err(e) => {
            debug!("needle rejected: {}", e);
            return None;
        }
    };

    // a window over a symbol outside the alphabet cannot equal the needle,
    // so the first window is placed past any such symbol
    let mut offset = 0;
    let mut window = loop {
        match RollingWindow::<A>::new(&haystack[offset..], needle.len()) {
            Ok(window) => break window,
            Err(Error::InvalidSymbol { symbol, position }) => {
                trace!("skipping symbol {:#04x} at {}", symbol, offset + position);
                offset += position + 1;
            }
            Err(e) => {
                debug!("no window left in the haystack: {}", e);
                return None;
            }
        }
    };

    loop {
        if window.fingerprint() == needle_fingerprint {
            // equal fingerprints may still be a collision
            if window.window_text() == needle {
                return Some(offset + window.start());
            }
            trace!("fingerprint collision at {}", offset + window.start());
        }

        if !window.can_advance() {
            break;
        }
        window.advance();
    }

    None
}

///
/// Same result as [`find_first`], with the haystack split across rayon's
/// thread pool
///
/// Each chunk owns `chunk_len` candidate positions and reads
/// `needle.len() - 1` extra symbols past them, so a match straddling two
/// chunks is found by the chunk it starts in. A `chunk_len` of 0 picks a
/// length from the haystack size and the number of threads.
///
/// ```
/// use rabin_karp::alphabet::Bytes;
/// use rabin_karp::match_search::find_first_parallel;
///
/// let haystack = b"the quick brown fox jumps over the lazy dog";
/// assert_eq!(find_first_parallel::<Bytes>(b"the", haystack, 4), Some(0));
/// assert_eq!(find_first_parallel::<Bytes>(b"lazy", haystack, 4), Some(35));
/// ```
pub fn find_first_parallel<A: Alphabet>(
    needle: &[u8],
    haystack: &[u8],
    chunk_len: usize,
) -> Option<Position> {
    if needle.is_empty() || haystack.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    if let Err(e) = polynomial_fingerprint::<A>(needle) {
        debug!("needle rejected: {}", e);
        return None;
    }

    let candidates = haystack.len() - needle.len() + 1;
    let chunk_len = if chunk_len == 0 {
        determine_chunk_len(candidates, rayon::current_num_threads())
    } else {
        chunk_len.min(candidates)
    };
    let chunk_count = candidates.div_ceil(chunk_len);
    debug!(
        "haystack len: {}; candidates: {}; chunk len: {}; chunk count: {}",
        haystack.len(),
        candidates,
        chunk_len,
        chunk_count
    );

    (0..chunk_count)
        .into_par_iter()
        .map(|chunk_number| chunk_number * chunk_len)
        .find_map_first(|chunk_start| {
            let chunk_end = (chunk_start + chunk_len + needle.len() - 1).min(haystack.len());
            find_first::<A>(needle, &haystack[chunk_start..chunk_end])
                .map(|position| chunk_start + position)
        })
}

const MIN_CHUNK_LEN: usize = 1 << 12;

///
/// Splits `candidates` evenly across `threads`, without going below a
/// chunk size where scheduling would cost more than the scan
///
/// ```
/// use rabin_karp::match_search::determine_chunk_len;
///
/// assert_eq!(determine_chunk_len(10, 8), 10);
/// assert_eq!(determine_chunk_len(1 << 20, 4), 1 << 18);
/// ```
pub fn determine_chunk_len(candidates: usize, threads: usize) -> usize {
    let per_thread = candidates.div_ceil(threads.max(1));
    per_thread.max(MIN_CHUNK_LEN).min(candidates).max(1)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use crate::alphabet::{Alphabet, Bytes, LowercaseLatin};

    use super::*;

    #[test_case(b"a", b"abcdefgh", Some(0); "first symbol")]
    #[test_case(b"d", b"abcdefgh", Some(3); "single symbol in the middle")]
    #[test_case(b"cupcakes", b"balloonsandcupcakes", Some(11); "match at the end")]
    #[test_case(b"", b"abc", None; "empty needle")]
    #[test_case(b"abc", b"", None; "empty haystack")]
    #[test_case(b"", b"", None; "both empty")]
    #[test_case(b"xyz", b"abc", None; "absent needle")]
    #[test_case(b"abcdefghi", b"abc", None; "needle longer than haystack")]
    #[test_case(b"abc", b"abc", Some(0); "equal length and content")]
    #[test_case(b"abd", b"abc", None; "equal length different content")]
    #[test_case(b"ana", b"bananas", Some(1); "overlapping occurrences")]
    #[test_case(b"aab", b"aaaaaab", Some(4); "repeated prefix")]
    #[test_case(b"ab", b"ab xx", Some(0); "foreign symbols after the match")]
    #[test_case(b"ab", b"xx ab", Some(3); "foreign symbol before the match")]
    #[test_case(b"ab", b" xab", Some(2); "foreign symbol in the first window")]
    #[test_case(b"ab", b"!!!!ab", Some(4); "run of foreign symbols")]
    #[test_case(b"ab", b"a b", None; "foreign symbol inside the only candidate")]
    #[test_case(b"abc", b"ab!", None; "no window without a foreign symbol")]
    #[test_case(b"Ab", b"xAbx", None; "needle outside the alphabet")]
    fn test_find_first(needle: &[u8], haystack: &[u8], expected: Option<Position>) {
        assert_eq!(find_first::<LowercaseLatin>(needle, haystack), expected);
    }

    #[test_case(b"Ab", b"xAbx"; "capital in the needle")]
    #[test_case(b"ab", b"xx ab"; "space in the haystack")]
    #[test_case(b"b c", b"ab cd"; "space in both")]
    fn test_bytes_alphabet_accepts_every_symbol(needle: &[u8], haystack: &[u8]) {
        assert_eq!(
            find_first::<Bytes>(needle, haystack),
            naive_find(needle, haystack)
        );
        assert!(find_first::<Bytes>(needle, haystack).is_some());
    }

    /// Every position shares one fingerprint, so only verification decides.
    #[derive(Debug)]
    struct Collide {}

    impl Alphabet for Collide {
        const BASE: u64 = 2;

        fn value(_: u8) -> Option<u64> {
            Some(0)
        }
    }

    #[test]
    fn test_collisions_never_match() {
        assert_eq!(find_first::<Collide>(b"needle", b"haystack with no match"), None);
        assert_eq!(find_first::<Collide>(b"needle", b"haystack with a needle"), Some(16));
    }

    fn naive_find(needle: &[u8], haystack: &[u8]) -> Option<Position> {
        if needle.is_empty() {
            return None;
        }
        haystack.windows(needle.len()).position(|window| window == needle)
    }

    #[test]
    fn test_every_substring_is_found_leftmost() {
        let haystack = b"mississippimissouriabracadabra";
        for start in 0..haystack.len() {
            for end in start + 1..=haystack.len() {
                let needle = &haystack[start..end];
                let found = find_first::<LowercaseLatin>(needle, haystack);

                assert_eq!(found, naive_find(needle, haystack));
                let position = found.unwrap();
                assert!(position <= start);
                assert_eq!(&haystack[position..position + needle.len()], needle);
            }
        }
    }

    #[test]
    fn test_large_needle_does_not_overflow() {
        let mut haystack: Vec<u8> = (0..10_000).map(|x: u32| b'a' + (x * 7 % 26) as u8).collect();
        let needle = haystack[6_000..9_000].to_vec();
        haystack[..6_000].copy_from_slice(&[b'z'; 6_000]);

        assert_eq!(find_first::<LowercaseLatin>(&needle, &haystack), Some(6_000));
    }

    fn assert_parallel_agrees<A: Alphabet>(haystack: &[u8], chunk_len: usize) {
        for start in 0..haystack.len() {
            for end in start + 1..(start + 9).min(haystack.len()) {
                let needle = &haystack[start..end];
                let sequential = find_first::<A>(needle, haystack);
                assert_eq!(
                    find_first_parallel::<A>(needle, haystack, chunk_len),
                    sequential,
                    "needle {:?}",
                    String::from_utf8_lossy(needle)
                );
                if needle.iter().all(|&s| A::value(s).is_some()) {
                    assert_eq!(sequential, naive_find(needle, haystack));
                } else {
                    assert_eq!(sequential, None);
                }
            }
        }
        assert_eq!(find_first_parallel::<A>(b"", haystack, chunk_len), None);
        assert_eq!(find_first_parallel::<A>(b"zzz", haystack, chunk_len), None);
    }

    #[test_case(1; "one candidate per chunk")]
    #[test_case(3; "chunks shorter than the needle")]
    #[test_case(7; "uneven chunks")]
    #[test_case(0; "automatic chunk length")]
    #[test_case(usize::MAX; "chunk length past the haystack")]
    fn test_find_first_parallel_agrees_with_sequential(chunk_len: usize) {
        assert_parallel_agrees::<LowercaseLatin>(b"balloonsandcupcakesandmorecupcakes", chunk_len);
        assert_parallel_agrees::<LowercaseLatin>(b" xab balloons and Cupcakes!", chunk_len);
        assert_parallel_agrees::<Bytes>(b"balloonsandcupcakesandmorecupcakes", chunk_len);
        assert_parallel_agrees::<Bytes>(b" xab balloons and Cupcakes!", chunk_len);
    }

    #[test_case(b"ab", b"xxab", Some(2); "plain haystack")]
    #[test_case(b"ab", b"xx ab", Some(3); "foreign symbol before the match")]
    #[test_case(b"ab", b" xab", Some(2); "foreign symbol at the start")]
    #[test_case(b"aB", b"xxaB", None; "needle outside the alphabet")]
    fn test_find_first_parallel_with_oversized_chunks(
        needle: &[u8],
        haystack: &[u8],
        expected: Option<Position>,
    ) {
        assert_eq!(find_first_parallel::<LowercaseLatin>(needle, haystack, usize::MAX), expected);
        assert_eq!(find_first_parallel::<LowercaseLatin>(needle, haystack, 1), expected);
    }

    #[test]
    fn test_find_first_parallel_match_across_chunk_boundary() {
        let haystack = b"aaaaaaaaaaaaaaaaaaaabcaaaa";
        // the match starts in the chunk [16, 20) and ends in the next one
        assert_eq!(find_first_parallel::<LowercaseLatin>(b"aabc", haystack, 4), Some(18));
    }

    #[test_case(10, 8, 10; "fewer candidates than the minimum")]
    #[test_case(1 << 20, 4, 1 << 18; "even split")]
    #[test_case(5_000, 4, MIN_CHUNK_LEN; "minimum chunk length")]
    #[test_case(100, 0, 100; "no threads reported")]
    #[test_case(usize::MAX, 1 << 20, usize::MAX / (1 << 20) + 1; "huge candidate count")]
    fn test_determine_chunk_len(candidates: usize, threads: usize, expected: usize) {
        assert_eq!(determine_chunk_len(candidates, threads), expected);
    }
}
