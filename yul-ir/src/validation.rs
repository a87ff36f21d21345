use crate::ast::{Block, Expression, FunctionCall, FunctionDefinition, Statement, TypedName};
use crate::dialect::Dialect;
use crate::visitor::ReadOnlyVisitor;
use yul_core::YulString;
use yul_support::{FastHashMap, FastHashSet};

#[derive(Clone, Copy)]
struct Signature {
    parameters: usize,
    returns: usize,
}

/// Structural checks on a program: visible and unique function names,
/// call arities and value counts.
pub struct Validator<'a> {
    ast: &'a Block,
    dialect: &'a Dialect,
    scopes: Vec<FastHashMap<YulString, Signature>>,
    valid: bool,
    errors: Vec<String>,
}

impl<'a> Validator<'a> {
    pub fn new(ast: &'a Block, dialect: &'a Dialect) -> Self {
        Self {
            ast,
            dialect,
            scopes: Vec::new(),
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn validate(mut self) -> (bool, Vec<String>) {
        let ast = self.ast;
        self.visit_block(ast);
        (self.valid, self.errors)
    }

    fn fail(&mut self, msg: &str) {
        self.valid = false;
        self.errors.push(msg.to_string());
    }

    fn is_visible_function(&self, name: YulString) -> bool {
        self.scopes.iter().any(|scope| scope.contains_key(&name))
    }

    fn signature(&self, name: YulString) -> Option<Signature> {
        if let Some(builtin) = self.dialect.builtin(name) {
            return Some(Signature {
                parameters: builtin.parameters,
                returns: builtin.returns,
            });
        }
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }

    /// Number of values an expression produces, if it can be determined.
    fn value_count(&self, expr: &Expression) -> Option<usize> {
        match expr {
            Expression::FunctionCall(call) => self
                .signature(call.function_name.name)
                .map(|signature| signature.returns),
            Expression::Identifier(_) | Expression::Literal(_) => Some(1),
        }
    }

    fn check_value_count(&mut self, what: &str, targets: usize, value: &Expression) {
        if let Some(count) = self.value_count(value) {
            if count != targets {
                self.fail(&format!(
                    "{} of {} variable(s) from an expression producing {} value(s): {}",
                    what, targets, count, value
                ));
            }
        }
    }
}

impl ReadOnlyVisitor for Validator<'_> {
    fn visit_block(&mut self, block: &Block) {
        let mut scope = FastHashMap::default();
        for function in block.function_definitions() {
            let signature = Signature {
                parameters: function.parameters.len(),
                returns: function.return_variables.len(),
            };
            if self.dialect.is_restricted_identifier(function.name) {
                self.fail(&format!("Function name '{}' is reserved", function.name));
            }
            if self.is_visible_function(function.name) {
                self.fail(&format!("Function '{}' shadows an outer function", function.name));
            }
            if scope.insert(function.name, signature).is_some() {
                self.fail(&format!("Function '{}' is declared twice", function.name));
            }
        }
        self.scopes.push(scope);
        self.walk_block(block);
        self.scopes.pop();
    }

    fn visit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::ExpressionStatement(s) => {
                if let Some(count) = self.value_count(&s.expression) {
                    if count != 0 {
                        self.fail(&format!(
                            "Expression statement discards {} value(s): {}",
                            count, s.expression
                        ));
                    }
                }
            }
            Statement::Assignment(s) => {
                self.check_value_count("Assignment", s.variable_names.len(), &s.value)
            }
            Statement::VariableDeclaration(s) => {
                if let Some(value) = &s.value {
                    self.check_value_count("Declaration", s.variables.len(), value);
                }
            }
            _ => {}
        }
        self.walk_statement(statement);
    }

    fn visit_function_definition(&mut self, function: &FunctionDefinition) {
        let mut seen = FastHashSet::default();
        for slot in function.parameters.iter().chain(&function.return_variables) {
            if !seen.insert(slot.name) {
                self.fail(&format!(
                    "Function '{}': variable '{}' is declared twice",
                    function.name, slot.name
                ));
            }
        }
        self.walk_function_definition(function);
    }

    fn visit_typed_name(&mut self, name: &TypedName) {
        if self.is_visible_function(name.name) {
            self.fail(&format!("Variable '{}' shadows a function", name.name));
        }
    }

    fn visit_function_call(&mut self, call: &FunctionCall) {
        let name = call.function_name.name;
        match self.signature(name) {
            Some(signature) if signature.parameters != call.arguments.len() => {
                self.fail(&format!(
                    "Function '{}' expects {} argument(s), got {}",
                    name,
                    signature.parameters,
                    call.arguments.len()
                ));
            }
            Some(_) => {}
            None => self.fail(&format!("Call target not found: {}", name)),
        }
        self.walk_function_call(call);
    }
}
