pub mod analysis;
pub mod ast;
pub mod dialect;
pub mod name_dispenser;
pub mod parser;
pub mod pass;
pub mod passes;
pub mod printer;
pub mod validation;
pub mod visitor;

pub use ast::{
    Assignment, Block, Case, Expression, ExpressionStatement, ForLoop, FunctionCall,
    FunctionDefinition, Identifier, If, IrBuilder, Literal, Statement, Switch, TypedName,
    VariableDeclaration,
};
pub use dialect::{BuiltinFunction, Dialect};
pub use name_dispenser::NameDispenser;
pub use parser::{parse, ParseError};
pub use pass::{OptimiserStepContext, Pass, PassRunner};
pub use printer::print;
pub use validation::Validator;
pub use visitor::{ReadOnlyVisitor, Visitor};
