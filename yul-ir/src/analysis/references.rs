use crate::ast::{Block, FunctionCall, Identifier};
use crate::visitor::ReadOnlyVisitor;
use yul_core::YulString;
use yul_support::FastHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountWhat {
    VariablesAndFunctions,
    OnlyVariables,
}

/// Counts how often each name is referenced. Declarations (variables,
/// parameters, return variables, function names) are not references;
/// reads, assignment targets and call targets are.
pub struct ReferencesCounter {
    count_what: CountWhat,
    references: FastHashMap<YulString, usize>,
}

impl ReferencesCounter {
    pub fn new(count_what: CountWhat) -> Self {
        Self {
            count_what,
            references: FastHashMap::default(),
        }
    }

    pub fn count_references(block: &Block, count_what: CountWhat) -> FastHashMap<YulString, usize> {
        let mut counter = Self::new(count_what);
        counter.visit_block(block);
        counter.references
    }
}

impl ReadOnlyVisitor for ReferencesCounter {
    fn visit_identifier(&mut self, identifier: &Identifier) {
        *self.references.entry(identifier.name).or_default() += 1;
    }

    fn visit_function_call(&mut self, call: &FunctionCall) {
        if self.count_what == CountWhat::VariablesAndFunctions {
            *self.references.entry(call.function_name.name).or_default() += 1;
        }
        self.walk_function_call(call);
    }
}
