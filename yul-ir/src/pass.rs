use crate::ast::Block;
use crate::dialect::Dialect;
use crate::name_dispenser::NameDispenser;
use crate::validation::Validator;
use yul_core::YulString;
use yul_support::FastHashSet;

/// Everything a pass may need besides the tree itself.
pub struct OptimiserStepContext<'a> {
    pub dialect: &'a Dialect,
    pub dispenser: NameDispenser<'a>,
    pub reserved_identifiers: &'a FastHashSet<YulString>,
}

pub trait Pass {
    fn name(&self) -> &str;
    fn run(&mut self, context: &mut OptimiserStepContext<'_>, ast: &mut Block);
}

pub struct PassRunner {
    passes: Vec<Box<dyn Pass>>,
    validate_after_pass: bool,
    reserved_identifiers: FastHashSet<YulString>,
}

impl Default for PassRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl PassRunner {
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            validate_after_pass: false,
            reserved_identifiers: FastHashSet::default(),
        }
    }

    pub fn set_validate_globally(&mut self, validate: bool) {
        self.validate_after_pass = validate;
    }

    /// Names that no pass may introduce, e.g. names used by surrounding code.
    pub fn set_reserved_identifiers(&mut self, reserved: FastHashSet<YulString>) {
        self.reserved_identifiers = reserved;
    }

    pub fn add<P: Pass + 'static>(&mut self, pass: P) {
        self.passes.push(Box::new(pass));
    }

    /// Every registered pass, in the order `-O` runs them.
    pub fn add_default_optimization_passes(&mut self) {
        for name in Self::get_all_pass_names() {
            self.add_by_name(name);
        }
    }

    pub fn get_all_pass_names() -> Vec<&'static str> {
        vec!["unused-function-parameter-pruner"]
    }

    pub fn add_by_name(&mut self, name: &str) -> bool {
        match name {
            "unused-function-parameter-pruner" => self.add(
                crate::passes::unused_function_parameter_pruner::UnusedFunctionParameterPruner,
            ),
            _ => return false,
        }
        true
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn run(&mut self, ast: &mut Block, dialect: &Dialect) {
        for pass in &mut self.passes {
            log::debug!("running pass '{}'", pass.name());
            let dispenser = NameDispenser::new(dialect, ast, self.reserved_identifiers.clone());
            let mut context = OptimiserStepContext {
                dialect,
                dispenser,
                reserved_identifiers: &self.reserved_identifiers,
            };
            pass.run(&mut context, ast);

            if self.validate_after_pass {
                let validator = Validator::new(ast, dialect);
                let (valid, errors) = validator.validate();
                if !valid {
                    let err_msg = errors.join("\n");
                    panic!(
                        "Validation failed after pass '{}':\n{}",
                        pass.name(),
                        err_msg
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::printer::print;

    struct MockPass;

    impl Pass for MockPass {
        fn name(&self) -> &str {
            "MockPass"
        }

        fn run(&mut self, context: &mut OptimiserStepContext<'_>, ast: &mut Block) {
            for statement in &mut ast.statements {
                if let crate::ast::Statement::FunctionDefinition(f) = statement {
                    f.name = context.dispenser.new_name(f.name);
                }
            }
        }
    }

    #[test]
    fn test_pass_runner() {
        let mut ast = parse("{ function test() { } }").unwrap();
        let mut runner = PassRunner::new();
        runner.add(MockPass);
        runner.run(&mut ast, &Dialect::evm());
        assert_eq!(print(&ast), "{\n    function test_1()\n    { }\n}");
    }

    #[test]
    fn test_pass_runner_respects_reserved_identifiers() {
        let mut ast = parse("{ function test() { } }").unwrap();
        let mut runner = PassRunner::new();
        runner.set_reserved_identifiers([YulString::new("test_1")].into_iter().collect());
        runner.add(MockPass);
        runner.run(&mut ast, &Dialect::evm());
        assert_eq!(ast.statements[0].as_function_definition().unwrap().name, "test_2");
    }

    #[test]
    fn test_pass_runner_validation_failure() {
        struct BrokenPass;
        impl Pass for BrokenPass {
            fn name(&self) -> &str {
                "BrokenPass"
            }
            fn run(&mut self, _context: &mut OptimiserStepContext<'_>, ast: &mut Block) {
                // Drop the definition but keep the call.
                ast.statements.retain(|s| s.as_function_definition().is_none());
            }
        }

        let mut ast = parse("{ function f() { } f() }").unwrap();
        let mut runner = PassRunner::new();
        runner.set_validate_globally(true);
        runner.add(BrokenPass);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            runner.run(&mut ast, &Dialect::evm());
        }));

        assert!(
            result.is_err(),
            "PassRunner should panic on validation error"
        );
    }

    #[test]
    fn test_pass_names() {
        let mut runner = PassRunner::new();
        for name in PassRunner::get_all_pass_names() {
            assert!(runner.add_by_name(name), "unknown pass {}", name);
        }
        assert!(!runner.add_by_name("no-such-pass"));
        assert_eq!(runner.len(), 1);

        let mut defaults = PassRunner::default();
        assert!(defaults.is_empty());
        defaults.add_default_optimization_passes();
        assert_eq!(defaults.len(), PassRunner::get_all_pass_names().len());
    }
}
