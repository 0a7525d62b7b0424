pub mod alphabet;
pub mod rolling_window;
pub mod match_search;

pub use alphabet::Alphabet;
pub use match_search::{find_first, find_first_parallel};
pub use rolling_window::RollingWindow;

/// Offset of a match in the haystack.
pub type Position = usize;
