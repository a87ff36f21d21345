use crate::ast::{Block, FunctionCall, Identifier, Statement, TypedName};
use crate::name_dispenser::NameDispenser;
use crate::visitor::Visitor;
use yul_core::YulString;
use yul_support::{FastHashMap, FastHashSet};

/// Renames every declaration of, and every reference to, the given names to
/// fresh names from the dispenser. The rest of the tree is left untouched.
pub struct NameDisplacer<'d, 'a> {
    dispenser: &'d mut NameDispenser<'a>,
    names_to_free: FastHashSet<YulString>,
    translations: FastHashMap<YulString, YulString>,
}

impl<'d, 'a> NameDisplacer<'d, 'a> {
    pub fn new(dispenser: &'d mut NameDispenser<'a>, names_to_free: FastHashSet<YulString>) -> Self {
        for name in &names_to_free {
            dispenser.mark_used(*name);
        }
        Self {
            dispenser,
            names_to_free,
            translations: FastHashMap::default(),
        }
    }

    /// Old name to new name, for every name that was displaced.
    pub fn translations(&self) -> &FastHashMap<YulString, YulString> {
        &self.translations
    }

    pub fn into_translations(self) -> FastHashMap<YulString, YulString> {
        self.translations
    }

    /// Declaration site: mint the replacement.
    fn check_and_replace_new(&mut self, name: &mut YulString) {
        assert!(
            !self.translations.contains_key(&*name),
            "name '{}' declared twice while displacing",
            name
        );
        if self.names_to_free.contains(&*name) {
            let new_name = self.dispenser.new_name(*name);
            log::trace!("displacing '{}' -> '{}'", name, new_name);
            self.translations.insert(*name, new_name);
            *name = new_name;
        }
    }

    /// Use site: apply an existing replacement.
    fn check_and_replace(&self, name: &mut YulString) {
        if let Some(new_name) = self.translations.get(&*name) {
            *name = *new_name;
        }
    }
}

impl Visitor for NameDisplacer<'_, '_> {
    fn visit_block(&mut self, block: &mut Block) {
        // Functions are visible in the whole block, so rename them before
        // any statement that may call them.
        for statement in block.statements.iter_mut() {
            if let Statement::FunctionDefinition(function) = statement {
                self.check_and_replace_new(&mut function.name);
            }
        }
        self.walk_block(block);
    }

    fn visit_typed_name(&mut self, name: &mut TypedName) {
        self.check_and_replace_new(&mut name.name);
    }

    fn visit_identifier(&mut self, identifier: &mut Identifier) {
        self.check_and_replace(&mut identifier.name);
    }

    fn visit_function_call(&mut self, call: &mut FunctionCall) {
        self.check_and_replace(&mut call.function_name.name);
        self.walk_function_call(call);
    }
}
