// Shared low-level utilities for the Yul optimizer crates.

pub mod strings;
pub use strings::StringInterner;
pub mod hash;
pub use hash::{invert_map, FastHashMap, FastHashSet};
