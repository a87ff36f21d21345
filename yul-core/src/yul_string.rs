use once_cell::sync::Lazy;
use std::fmt;
use yul_support::StringInterner;

static INTERNER: Lazy<StringInterner> = Lazy::new(StringInterner::new);

/// An interned identifier. Copying is free and equality compares the text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YulString(&'static str);

impl YulString {
    pub fn new(s: &str) -> Self {
        Self(INTERNER.intern(s))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for YulString {
    fn default() -> Self {
        Self("")
    }
}

impl From<&str> for YulString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for YulString {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl PartialEq<str> for YulString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for YulString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for YulString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Debug for YulString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0, f)
    }
}
