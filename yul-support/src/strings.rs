use crate::hash::FastHashSet;
use std::sync::RwLock;

/// Process-wide identifier table. Every distinct text is leaked once and
/// lives for the rest of the process, so interned names can be `Copy`.
pub struct StringInterner {
    names: RwLock<FastHashSet<&'static str>>,
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl StringInterner {
    pub fn new() -> Self {
        Self {
            names: RwLock::new(FastHashSet::default()),
        }
    }

    /// Returns the canonical copy of `s`. Equal texts always yield the same
    /// pointer.
    pub fn intern(&self, s: &str) -> &'static str {
        if let Some(name) = self.lookup(s) {
            return name;
        }

        let mut names = self.names.write().unwrap_or_else(|e| e.into_inner());
        // Another thread may have won the race for the write lock.
        if let Some(&name) = names.get(s) {
            return name;
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        names.insert(leaked);
        leaked
    }

    /// The canonical copy of `s`, if it was interned before.
    pub fn lookup(&self, s: &str) -> Option<&'static str> {
        let names = self.names.read().unwrap_or_else(|e| e.into_inner());
        names.get(s).copied()
    }

    pub fn len(&self) -> usize {
        self.names.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_same_name_same_pointer() {
        let interner = StringInterner::new();
        let f1 = interner.intern("f_1");
        let f1_again = interner.intern(&format!("f_{}", 1));
        assert!(std::ptr::eq(f1, f1_again));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let interner = StringInterner::new();
        assert!(interner.is_empty());
        assert_eq!(interner.lookup("x"), None);
        assert!(interner.is_empty());
        let x = interner.intern("x");
        assert_eq!(interner.lookup("x"), Some(x));
        assert_ne!(interner.intern("y"), x);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_concurrent_interning_agrees() {
        let interner = Arc::new(StringInterner::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let interner = interner.clone();
                thread::spawn(move || interner.intern("shared").as_ptr() as usize)
            })
            .collect();
        let expected = interner.intern("shared").as_ptr() as usize;
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    proptest! {
        #[test]
        fn test_intern_preserves_text(s in any::<String>()) {
            let interner = StringInterner::new();
            let interned = interner.intern(&s);
            prop_assert_eq!(interned, s.as_str());
            prop_assert!(std::ptr::eq(interner.intern(&s), interned));
        }
    }
}
