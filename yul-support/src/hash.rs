use ahash::{AHashMap, AHashSet};

pub type FastHashMap<K, V> = AHashMap<K, V>;
pub type FastHashSet<K> = AHashSet<K>;

/// Swaps keys and values. Panics if two keys share a value, since callers
/// only invert mappings that are bijective by construction.
pub fn invert_map<K, V>(map: &FastHashMap<K, V>) -> FastHashMap<V, K>
where
    K: Clone,
    V: Clone + Eq + std::hash::Hash,
{
    let mut inverted = FastHashMap::with_capacity(map.len());
    for (key, value) in map {
        let previous = inverted.insert(value.clone(), key.clone());
        assert!(previous.is_none(), "invert_map: mapping is not injective");
    }
    inverted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_hashmap_basic() {
        let mut map: FastHashMap<String, usize> = FastHashMap::default();
        map.insert("one".to_string(), 1);
        map.insert("two".to_string(), 2);
        assert_eq!(map.get("one"), Some(&1));
        assert_eq!(map.get("none"), None);
    }

    #[test]
    fn test_invert_map() {
        let mut map: FastHashMap<&str, &str> = FastHashMap::default();
        map.insert("f", "f_1");
        map.insert("g", "g_2");
        let inverted = invert_map(&map);
        assert_eq!(inverted.get("f_1"), Some(&"f"));
        assert_eq!(inverted.get("g_2"), Some(&"g"));
        assert_eq!(inverted.len(), 2);
    }

    #[test]
    #[should_panic(expected = "not injective")]
    fn test_invert_map_rejects_collisions() {
        let mut map: FastHashMap<&str, &str> = FastHashMap::default();
        map.insert("f", "x");
        map.insert("g", "x");
        invert_map(&map);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn invert_twice_is_identity(entries in proptest::collection::hash_map(0u32..1000, 0u32..1000, 0..64)) {
            // Make the values unique by pairing them with their key.
            let map: FastHashMap<u32, (u32, u32)> =
                entries.into_iter().map(|(k, v)| (k, (k, v))).collect();
            let back = invert_map(&invert_map(&map));
            prop_assert_eq!(back, map);
        }
    }
}
