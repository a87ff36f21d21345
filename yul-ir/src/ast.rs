use yul_core::{LiteralKind, SourceLocation, YulString};

/// A declared name with an optional type annotation, used for variables,
/// function parameters and function return variables.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedName {
    pub location: SourceLocation,
    pub name: YulString,
    pub type_: Option<YulString>,
}

impl TypedName {
    pub fn new(name: impl Into<YulString>) -> Self {
        Self {
            location: SourceLocation::default(),
            name: name.into(),
            type_: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub location: SourceLocation,
    pub name: YulString,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub location: SourceLocation,
    pub kind: LiteralKind,
    /// Source text of the value; string literals are stored without quotes
    /// and with escapes as written.
    pub value: YulString,
    pub type_: Option<YulString>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub location: SourceLocation,
    pub function_name: Identifier,
    pub arguments: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    FunctionCall(FunctionCall),
    Identifier(Identifier),
    Literal(Literal),
}

impl Expression {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expression::FunctionCall(call) => call.location,
            Expression::Identifier(identifier) => identifier.location,
            Expression::Literal(literal) => literal.location,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionStatement {
    pub location: SourceLocation,
    pub expression: Expression,
}

/// `a, b := value`
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub location: SourceLocation,
    pub variable_names: Vec<Identifier>,
    pub value: Box<Expression>,
}

/// `let a, b := value` or `let a`
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDeclaration {
    pub location: SourceLocation,
    pub variables: Vec<TypedName>,
    pub value: Option<Box<Expression>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDefinition {
    pub location: SourceLocation,
    pub name: YulString,
    pub parameters: Vec<TypedName>,
    pub return_variables: Vec<TypedName>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct If {
    pub location: SourceLocation,
    pub condition: Box<Expression>,
    pub body: Block,
}

/// A `case` arm; `value` is `None` for `default`.
#[derive(Clone, Debug, PartialEq)]
pub struct Case {
    pub location: SourceLocation,
    pub value: Option<Literal>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Switch {
    pub location: SourceLocation,
    pub expression: Box<Expression>,
    pub cases: Vec<Case>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
    pub location: SourceLocation,
    pub pre: Block,
    pub condition: Box<Expression>,
    pub post: Block,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    ExpressionStatement(ExpressionStatement),
    Assignment(Assignment),
    VariableDeclaration(VariableDeclaration),
    FunctionDefinition(FunctionDefinition),
    If(If),
    Switch(Switch),
    ForLoop(ForLoop),
    Break(SourceLocation),
    Continue(SourceLocation),
    Leave(SourceLocation),
    Block(Block),
}

impl Statement {
    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::ExpressionStatement(s) => s.location,
            Statement::Assignment(s) => s.location,
            Statement::VariableDeclaration(s) => s.location,
            Statement::FunctionDefinition(s) => s.location,
            Statement::If(s) => s.location,
            Statement::Switch(s) => s.location,
            Statement::ForLoop(s) => s.location,
            Statement::Break(location)
            | Statement::Continue(location)
            | Statement::Leave(location) => *location,
            Statement::Block(s) => s.location,
        }
    }

    pub fn as_function_definition(&self) -> Option<&FunctionDefinition> {
        match self {
            Statement::FunctionDefinition(function) => Some(function),
            _ => None,
        }
    }
}

impl From<FunctionDefinition> for Statement {
    fn from(function: FunctionDefinition) -> Self {
        Statement::FunctionDefinition(function)
    }
}

impl From<Assignment> for Statement {
    fn from(assignment: Assignment) -> Self {
        Statement::Assignment(assignment)
    }
}

impl From<ExpressionStatement> for Statement {
    fn from(statement: ExpressionStatement) -> Self {
        Statement::ExpressionStatement(statement)
    }
}

impl From<VariableDeclaration> for Statement {
    fn from(declaration: VariableDeclaration) -> Self {
        Statement::VariableDeclaration(declaration)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    pub location: SourceLocation,
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            location: SourceLocation::default(),
            statements,
        }
    }

    pub fn function_definitions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.statements
            .iter()
            .filter_map(Statement::as_function_definition)
    }

    pub fn find_function(&self, name: YulString) -> Option<&FunctionDefinition> {
        self.function_definitions().find(|f| f.name == name)
    }
}

/// Builds nodes that all share one source location, the way optimizer
/// steps attribute synthesized code to the node it replaces.
#[derive(Clone, Copy, Debug, Default)]
pub struct IrBuilder {
    location: SourceLocation,
}

impl IrBuilder {
    pub fn new(location: SourceLocation) -> Self {
        Self { location }
    }

    pub fn identifier(&self, name: YulString) -> Identifier {
        Identifier {
            location: self.location,
            name,
        }
    }

    pub fn identifier_expr(&self, name: YulString) -> Expression {
        Expression::Identifier(self.identifier(name))
    }

    pub fn number(&self, value: u64) -> Expression {
        Expression::Literal(Literal {
            location: self.location,
            kind: LiteralKind::Number,
            value: YulString::new(&value.to_string()),
            type_: None,
        })
    }

    pub fn call(&self, function: YulString, arguments: Vec<Expression>) -> FunctionCall {
        FunctionCall {
            location: self.location,
            function_name: self.identifier(function),
            arguments,
        }
    }

    pub fn expression_statement(&self, expression: Expression) -> Statement {
        Statement::ExpressionStatement(ExpressionStatement {
            location: self.location,
            expression,
        })
    }

    pub fn assignment(&self, targets: Vec<YulString>, value: Expression) -> Statement {
        Statement::Assignment(Assignment {
            location: self.location,
            variable_names: targets.into_iter().map(|t| self.identifier(t)).collect(),
            value: Box::new(value),
        })
    }

    pub fn block(&self, statements: Vec<Statement>) -> Block {
        Block {
            location: self.location,
            statements,
        }
    }

    pub fn function(
        &self,
        name: YulString,
        parameters: Vec<TypedName>,
        return_variables: Vec<TypedName>,
        body: Vec<Statement>,
    ) -> FunctionDefinition {
        FunctionDefinition {
            location: self.location,
            name,
            parameters,
            return_variables,
            body: self.block(body),
        }
    }
}
