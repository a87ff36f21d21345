use crate::ast::{
    Block, Case, Expression, FunctionDefinition, Literal, Statement, TypedName,
};
use std::fmt::{self, Write};
use yul_core::LiteralKind;

const INDENT: &str = "    ";

/// Renders a block as Yul source. The output parses back to an equal tree
/// (up to source locations).
pub fn print(block: &Block) -> String {
    let mut out = String::new();
    AsmPrinter { out: &mut out }
        .block(block)
        .expect("writing to a String cannot fail");
    out
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print(self))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        AsmPrinter { out: &mut out }.statement(self)?;
        f.write_str(&out)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        AsmPrinter { out: &mut out }.expression(self)?;
        f.write_str(&out)
    }
}

struct AsmPrinter<'o> {
    out: &'o mut String,
}

impl AsmPrinter<'_> {
    fn block(&mut self, block: &Block) -> fmt::Result {
        if block.statements.is_empty() {
            return self.out.write_str("{ }");
        }
        self.out.write_str("{\n")?;
        for statement in &block.statements {
            let mut inner = String::new();
            AsmPrinter { out: &mut inner }.statement(statement)?;
            for line in inner.lines() {
                if line.is_empty() {
                    self.out.write_char('\n')?;
                } else {
                    writeln!(self.out, "{}{}", INDENT, line)?;
                }
            }
        }
        self.out.write_char('}')
    }

    fn statement(&mut self, statement: &Statement) -> fmt::Result {
        match statement {
            Statement::ExpressionStatement(s) => self.expression(&s.expression),
            Statement::Assignment(s) => {
                let targets: Vec<&str> = s.variable_names.iter().map(|n| n.name.as_str()).collect();
                write!(self.out, "{} := ", targets.join(", "))?;
                self.expression(&s.value)
            }
            Statement::VariableDeclaration(s) => {
                self.out.write_str("let ")?;
                self.typed_names(&s.variables)?;
                if let Some(value) = &s.value {
                    self.out.write_str(" := ")?;
                    self.expression(value)?;
                }
                Ok(())
            }
            Statement::FunctionDefinition(f) => self.function_definition(f),
            Statement::If(s) => {
                self.out.write_str("if ")?;
                self.expression(&s.condition)?;
                self.out.write_char(' ')?;
                self.block(&s.body)
            }
            Statement::Switch(s) => {
                self.out.write_str("switch ")?;
                self.expression(&s.expression)?;
                for case in &s.cases {
                    self.out.write_char('\n')?;
                    self.case(case)?;
                }
                Ok(())
            }
            Statement::ForLoop(s) => {
                self.out.write_str("for ")?;
                self.block(&s.pre)?;
                self.out.write_char(' ')?;
                self.expression(&s.condition)?;
                self.out.write_char(' ')?;
                self.block(&s.post)?;
                self.out.write_char('\n')?;
                self.block(&s.body)
            }
            Statement::Break(_) => self.out.write_str("break"),
            Statement::Continue(_) => self.out.write_str("continue"),
            Statement::Leave(_) => self.out.write_str("leave"),
            Statement::Block(block) => self.block(block),
        }
    }

    fn function_definition(&mut self, function: &FunctionDefinition) -> fmt::Result {
        write!(self.out, "function {}(", function.name)?;
        self.typed_names(&function.parameters)?;
        self.out.write_char(')')?;
        if !function.return_variables.is_empty() {
            self.out.write_str(" -> ")?;
            self.typed_names(&function.return_variables)?;
        }
        self.out.write_char('\n')?;
        self.block(&function.body)
    }

    fn case(&mut self, case: &Case) -> fmt::Result {
        match &case.value {
            Some(value) => {
                self.out.write_str("case ")?;
                self.literal(value)?;
            }
            None => self.out.write_str("default")?,
        }
        self.out.write_char(' ')?;
        self.block(&case.body)
    }

    fn typed_names(&mut self, names: &[TypedName]) -> fmt::Result {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            self.out.write_str(name.name.as_str())?;
            if let Some(type_) = name.type_ {
                write!(self.out, ":{}", type_)?;
            }
        }
        Ok(())
    }

    fn expression(&mut self, expr: &Expression) -> fmt::Result {
        match expr {
            Expression::FunctionCall(call) => {
                write!(self.out, "{}(", call.function_name.name)?;
                for (i, argument) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        self.out.write_str(", ")?;
                    }
                    self.expression(argument)?;
                }
                self.out.write_char(')')
            }
            Expression::Identifier(identifier) => self.out.write_str(identifier.name.as_str()),
            Expression::Literal(literal) => self.literal(literal),
        }
    }

    fn literal(&mut self, literal: &Literal) -> fmt::Result {
        match literal.kind {
            LiteralKind::String => write!(self.out, "\"{}\"", literal.value)?,
            LiteralKind::Number | LiteralKind::Boolean => {
                self.out.write_str(literal.value.as_str())?
            }
        }
        if let Some(type_) = literal.type_ {
            write!(self.out, ":{}", type_)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_print_empty_block() {
        assert_eq!(print(&Block::default()), "{ }");
    }

    #[test]
    fn test_print_function_and_calls() {
        let ast = parse("{ function f(a:u256, b) -> x { x := add(a, 0x20) } pop(f(1, \"ab\")) }").unwrap();
        assert_eq!(
            print(&ast),
            "{\n    function f(a:u256, b) -> x\n    {\n        x := add(a, 0x20)\n    }\n    pop(f(1, \"ab\"))\n}"
        );
    }

    #[test]
    fn test_print_control_flow() {
        let source = "{
    for { let i := 0 } lt(i, 3) { i := add(i, 1) }
    {
        switch i
        case 0 { continue }
        default { break }
    }
    if true { }
}";
        let ast = parse(source).unwrap();
        assert_eq!(
            print(&ast),
            "{\n    for {\n        let i := 0\n    } lt(i, 3) {\n        i := add(i, 1)\n    }\n    {\n        switch i\n        case 0 {\n            continue\n        }\n        default {\n            break\n        }\n    }\n    if true { }\n}"
        );
    }

    #[test]
    fn test_print_parse_round_trip_is_stable() {
        let source = "{ function g() -> r, s { r, s := h() leave } function h() -> a, b { } let u, v := g() }";
        let once = print(&parse(source).unwrap());
        let twice = print(&parse(&once).unwrap());
        assert_eq!(once, twice);
    }
}
