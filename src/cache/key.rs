//! Cache Key Module
//!
//! Key bound for the cache engine. Keys need equality, hashing, and a total
//! order, and may reject malformed values before they reach the store.

use std::fmt::Debug;
use std::hash::Hash;

use crate::cache::MAX_KEY_LENGTH;

// == Cache Key Trait ==
/// Types usable as cache keys.
///
/// `validate` is the hook behind the engine's invalid-key rejection: string
/// keys refuse empty and oversized values, while keys that are valid by
/// construction (integers) use the default.
pub trait CacheKey: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {
    /// Returns a description of the defect for a malformed key, or `None`
    /// if the key is usable.
    fn validate(&self) -> Option<String> {
        None
    }
}

fn validate_str(key: &str) -> Option<String> {
    if key.is_empty() {
        Some("key must not be empty".to_string())
    } else if key.len() > MAX_KEY_LENGTH {
        Some(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ))
    } else {
        None
    }
}

impl CacheKey for String {
    fn validate(&self) -> Option<String> {
        validate_str(self)
    }
}

impl CacheKey for &'static str {
    fn validate(&self) -> Option<String> {
        validate_str(self)
    }
}

macro_rules! impl_cache_key_for_int {
    ($($ty:ty),*) => {
        $(impl CacheKey for $ty {})*
    };
}

impl_cache_key_for_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
