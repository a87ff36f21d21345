use crate::analysis::NameCollector;
use crate::ast::Block;
use crate::dialect::Dialect;
use yul_core::YulString;
use yul_support::FastHashSet;

/// Hands out names that collide with nothing in the program, the dialect or
/// the reserved set. A name is never handed out twice.
pub struct NameDispenser<'d> {
    dialect: &'d Dialect,
    used_names: FastHashSet<YulString>,
    counter: usize,
}

impl<'d> NameDispenser<'d> {
    pub fn new(dialect: &'d Dialect, ast: &Block, reserved: FastHashSet<YulString>) -> Self {
        let mut used_names = NameCollector::collect(ast);
        used_names.extend(reserved);
        Self::with_used_names(dialect, used_names)
    }

    pub fn with_used_names(dialect: &'d Dialect, used_names: FastHashSet<YulString>) -> Self {
        Self {
            dialect,
            used_names,
            counter: 0,
        }
    }

    /// Returns `hint` if it is still free, otherwise `hint_N` for the next
    /// free N. The counter is shared by all hints.
    pub fn new_name(&mut self, hint: YulString) -> YulString {
        let mut name = hint;
        while self.illegal_name(name) {
            self.counter += 1;
            name = YulString::new(&format!("{}_{}", hint, self.counter));
        }
        self.used_names.insert(name);
        name
    }

    pub fn mark_used(&mut self, name: YulString) {
        self.used_names.insert(name);
    }

    pub fn is_used(&self, name: YulString) -> bool {
        self.used_names.contains(&name)
    }

    fn illegal_name(&self, name: YulString) -> bool {
        self.used_names.contains(&name) || self.dialect.is_restricted_identifier(name)
    }
}
