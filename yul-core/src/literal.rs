use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Number,
    String,
    Boolean,
}

impl LiteralKind {
    pub fn name(&self) -> &'static str {
        match self {
            LiteralKind::Number => "number",
            LiteralKind::String => "string",
            LiteralKind::Boolean => "bool",
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a number literal as written in source, decimal or `0x` hex.
/// Returns `None` when the value does not fit in 64 bits.
pub fn parse_number(text: &str) -> Option<u64> {
    if let Some(hex) = text.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}
