use crate::ast::{Block, FunctionCall, FunctionDefinition, Identifier, TypedName};
use crate::visitor::ReadOnlyVisitor;
use yul_core::YulString;
use yul_support::FastHashSet;

/// Collects every name that occurs anywhere in a tree, declared or
/// referenced, so a name dispenser can avoid all of them.
#[derive(Default)]
pub struct NameCollector {
    names: FastHashSet<YulString>,
}

impl NameCollector {
    pub fn collect(block: &Block) -> FastHashSet<YulString> {
        let mut collector = Self::default();
        collector.visit_block(block);
        collector.names
    }
}

impl ReadOnlyVisitor for NameCollector {
    fn visit_function_definition(&mut self, function: &FunctionDefinition) {
        self.names.insert(function.name);
        self.walk_function_definition(function);
    }

    fn visit_function_call(&mut self, call: &FunctionCall) {
        self.names.insert(call.function_name.name);
        self.walk_function_call(call);
    }

    fn visit_identifier(&mut self, identifier: &Identifier) {
        self.names.insert(identifier.name);
    }

    fn visit_typed_name(&mut self, name: &TypedName) {
        self.names.insert(name.name);
    }
}
