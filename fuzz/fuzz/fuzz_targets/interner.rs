#![no_main]
use libfuzzer_sys::fuzz_target;
use std::str;
use yul_support::StringInterner;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = str::from_utf8(data) {
        let interner = StringInterner::new();
        let first = interner.intern(s);
        assert_eq!(first, s);

        // Concurrent interning of the same text must agree on one slot.
        let arc = std::sync::Arc::new(interner);
        let mut threads = Vec::new();
        for _ in 0..4 {
            let a = arc.clone();
            let local = s.to_string();
            threads.push(std::thread::spawn(move || a.intern(&local)));
        }
        for t in threads {
            if let Ok(interned) = t.join() {
                assert!(std::ptr::eq(interned, first));
            }
        }
    }
});
