use crate::ast::{Block, Expression, Statement};
use crate::visitor::ReadOnlyVisitor;

/// Per-node weights for [`CodeSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeWeights {
    pub expression_statement: usize,
    pub assignment: usize,
    pub variable_declaration: usize,
    pub function_definition: usize,
    pub if_: usize,
    pub switch: usize,
    pub case: usize,
    pub for_loop: usize,
    pub break_: usize,
    pub continue_: usize,
    pub leave: usize,
    pub block: usize,
    pub function_call: usize,
    pub identifier: usize,
    pub literal: usize,
}

impl Default for CodeWeights {
    fn default() -> Self {
        Self {
            expression_statement: 0,
            assignment: 0,
            variable_declaration: 0,
            function_definition: 1,
            if_: 2,
            switch: 1,
            case: 0,
            for_loop: 3,
            break_: 1,
            continue_: 1,
            leave: 0,
            block: 0,
            function_call: 1,
            identifier: 0,
            literal: 1,
        }
    }
}

/// Structural size metric. Moving variables around and plain assignments
/// are free; calls, literals and control flow cost.
pub struct CodeSize {
    weights: CodeWeights,
    ignore_functions: bool,
    size: usize,
}

impl CodeSize {
    pub fn new(weights: CodeWeights, ignore_functions: bool) -> Self {
        Self {
            weights,
            ignore_functions,
            size: 0,
        }
    }

    /// Size of a block, not counting nested function definitions.
    pub fn code_size(block: &Block) -> usize {
        Self::code_size_with(block, CodeWeights::default())
    }

    pub fn code_size_with(block: &Block, weights: CodeWeights) -> usize {
        let mut cs = Self::new(weights, true);
        cs.visit_block(block);
        cs.size
    }

    /// Size of a block including everything inside nested functions.
    pub fn code_size_including_functions(block: &Block) -> usize {
        let mut cs = Self::new(CodeWeights::default(), false);
        cs.visit_block(block);
        cs.size
    }
}

impl ReadOnlyVisitor for CodeSize {
    fn visit_statement(&mut self, statement: &Statement) {
        let w = &self.weights;
        self.size += match statement {
            Statement::FunctionDefinition(_) if self.ignore_functions => return,
            Statement::FunctionDefinition(_) => w.function_definition,
            Statement::ExpressionStatement(_) => w.expression_statement,
            Statement::Assignment(_) => w.assignment,
            Statement::VariableDeclaration(_) => w.variable_declaration,
            Statement::If(_) => w.if_,
            Statement::Switch(s) => w.switch + w.case * s.cases.len(),
            Statement::ForLoop(_) => w.for_loop,
            Statement::Break(_) => w.break_,
            Statement::Continue(_) => w.continue_,
            Statement::Leave(_) => w.leave,
            Statement::Block(_) => w.block,
        };
        self.walk_statement(statement);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        let w = &self.weights;
        self.size += match expr {
            Expression::FunctionCall(_) => w.function_call,
            Expression::Identifier(_) => w.identifier,
            Expression::Literal(_) => w.literal,
        };
        self.walk_expression(expr);
    }
}
