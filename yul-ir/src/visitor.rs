use crate::ast::{
    Assignment, Block, Case, Expression, FunctionCall, FunctionDefinition, Identifier, Literal,
    Statement, TypedName, VariableDeclaration,
};

/// Mutable tree walker. Override a `visit_*` hook to act on a node; call the
/// matching `walk_*` from the override to keep descending, or skip it to
/// prune the traversal at that node.
pub trait Visitor {
    fn visit_block(&mut self, block: &mut Block) {
        self.walk_block(block);
    }

    fn visit_statement(&mut self, statement: &mut Statement) {
        self.walk_statement(statement);
    }

    fn visit_function_definition(&mut self, function: &mut FunctionDefinition) {
        self.walk_function_definition(function);
    }

    fn visit_variable_declaration(&mut self, declaration: &mut VariableDeclaration) {
        self.walk_variable_declaration(declaration);
    }

    fn visit_assignment(&mut self, assignment: &mut Assignment) {
        self.walk_assignment(assignment);
    }

    fn visit_expression(&mut self, expr: &mut Expression) {
        self.walk_expression(expr);
    }

    fn visit_function_call(&mut self, call: &mut FunctionCall) {
        self.walk_function_call(call);
    }

    /// A name being read (or assigned to).
    fn visit_identifier(&mut self, _identifier: &mut Identifier) {}

    /// A name being declared.
    fn visit_typed_name(&mut self, _name: &mut TypedName) {}

    fn visit_literal(&mut self, _literal: &mut Literal) {}

    fn walk_block(&mut self, block: &mut Block) {
        for statement in block.statements.iter_mut() {
            self.visit_statement(statement);
        }
    }

    fn walk_statement(&mut self, statement: &mut Statement) {
        match statement {
            Statement::ExpressionStatement(s) => self.visit_expression(&mut s.expression),
            Statement::Assignment(s) => self.visit_assignment(s),
            Statement::VariableDeclaration(s) => self.visit_variable_declaration(s),
            Statement::FunctionDefinition(f) => self.visit_function_definition(f),
            Statement::If(s) => {
                self.visit_expression(&mut s.condition);
                self.visit_block(&mut s.body);
            }
            Statement::Switch(s) => {
                self.visit_expression(&mut s.expression);
                for case in s.cases.iter_mut() {
                    self.walk_case(case);
                }
            }
            Statement::ForLoop(s) => {
                self.visit_block(&mut s.pre);
                self.visit_expression(&mut s.condition);
                self.visit_block(&mut s.post);
                self.visit_block(&mut s.body);
            }
            Statement::Break(_) | Statement::Continue(_) | Statement::Leave(_) => {}
            Statement::Block(block) => self.visit_block(block),
        }
    }

    fn walk_case(&mut self, case: &mut Case) {
        if let Some(value) = &mut case.value {
            self.visit_literal(value);
        }
        self.visit_block(&mut case.body);
    }

    fn walk_function_definition(&mut self, function: &mut FunctionDefinition) {
        for parameter in function.parameters.iter_mut() {
            self.visit_typed_name(parameter);
        }
        for variable in function.return_variables.iter_mut() {
            self.visit_typed_name(variable);
        }
        self.visit_block(&mut function.body);
    }

    fn walk_variable_declaration(&mut self, declaration: &mut VariableDeclaration) {
        if let Some(value) = &mut declaration.value {
            self.visit_expression(value);
        }
        for variable in declaration.variables.iter_mut() {
            self.visit_typed_name(variable);
        }
    }

    fn walk_assignment(&mut self, assignment: &mut Assignment) {
        for name in assignment.variable_names.iter_mut() {
            self.visit_identifier(name);
        }
        self.visit_expression(&mut assignment.value);
    }

    fn walk_expression(&mut self, expr: &mut Expression) {
        match expr {
            Expression::FunctionCall(call) => self.visit_function_call(call),
            Expression::Identifier(identifier) => self.visit_identifier(identifier),
            Expression::Literal(literal) => self.visit_literal(literal),
        }
    }

    fn walk_function_call(&mut self, call: &mut FunctionCall) {
        // Arguments are evaluated right to left; walk them in that order.
        for argument in call.arguments.iter_mut().rev() {
            self.visit_expression(argument);
        }
    }
}

/// Read-only counterpart of [`Visitor`].
pub trait ReadOnlyVisitor {
    fn visit_block(&mut self, block: &Block) {
        self.walk_block(block);
    }

    fn visit_statement(&mut self, statement: &Statement) {
        self.walk_statement(statement);
    }

    fn visit_function_definition(&mut self, function: &FunctionDefinition) {
        self.walk_function_definition(function);
    }

    fn visit_variable_declaration(&mut self, declaration: &VariableDeclaration) {
        self.walk_variable_declaration(declaration);
    }

    fn visit_assignment(&mut self, assignment: &Assignment) {
        self.walk_assignment(assignment);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        self.walk_expression(expr);
    }

    fn visit_function_call(&mut self, call: &FunctionCall) {
        self.walk_function_call(call);
    }

    fn visit_identifier(&mut self, _identifier: &Identifier) {}

    fn visit_typed_name(&mut self, _name: &TypedName) {}

    fn visit_literal(&mut self, _literal: &Literal) {}

    fn walk_block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.visit_statement(statement);
        }
    }

    fn walk_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::ExpressionStatement(s) => self.visit_expression(&s.expression),
            Statement::Assignment(s) => self.visit_assignment(s),
            Statement::VariableDeclaration(s) => self.visit_variable_declaration(s),
            Statement::FunctionDefinition(f) => self.visit_function_definition(f),
            Statement::If(s) => {
                self.visit_expression(&s.condition);
                self.visit_block(&s.body);
            }
            Statement::Switch(s) => {
                self.visit_expression(&s.expression);
                for case in &s.cases {
                    self.walk_case(case);
                }
            }
            Statement::ForLoop(s) => {
                self.visit_block(&s.pre);
                self.visit_expression(&s.condition);
                self.visit_block(&s.post);
                self.visit_block(&s.body);
            }
            Statement::Break(_) | Statement::Continue(_) | Statement::Leave(_) => {}
            Statement::Block(block) => self.visit_block(block),
        }
    }

    fn walk_case(&mut self, case: &Case) {
        if let Some(value) = &case.value {
            self.visit_literal(value);
        }
        self.visit_block(&case.body);
    }

    fn walk_function_definition(&mut self, function: &FunctionDefinition) {
        for parameter in &function.parameters {
            self.visit_typed_name(parameter);
        }
        for variable in &function.return_variables {
            self.visit_typed_name(variable);
        }
        self.visit_block(&function.body);
    }

    fn walk_variable_declaration(&mut self, declaration: &VariableDeclaration) {
        if let Some(value) = &declaration.value {
            self.visit_expression(value);
        }
        for variable in &declaration.variables {
            self.visit_typed_name(variable);
        }
    }

    fn walk_assignment(&mut self, assignment: &Assignment) {
        for name in &assignment.variable_names {
            self.visit_identifier(name);
        }
        self.visit_expression(&assignment.value);
    }

    fn walk_expression(&mut self, expr: &Expression) {
        match expr {
            Expression::FunctionCall(call) => self.visit_function_call(call),
            Expression::Identifier(identifier) => self.visit_identifier(identifier),
            Expression::Literal(literal) => self.visit_literal(literal),
        }
    }

    fn walk_function_call(&mut self, call: &FunctionCall) {
        for argument in call.arguments.iter().rev() {
            self.visit_expression(argument);
        }
    }
}
