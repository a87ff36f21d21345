use crate::ast::{
    Assignment, Block, Case, Expression, ExpressionStatement, ForLoop, FunctionCall,
    FunctionDefinition, Identifier, If, Literal, Statement, Switch, TypedName,
    VariableDeclaration,
};
use logos::Logos;
use std::fmt;
use std::iter::Peekable;
use yul_core::{LiteralKind, SourceLocation, YulString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos)]
pub enum TokenKind {
    #[regex(r"[ \t\r\n\f]+")]
    #[regex(r"//[^\n]*")]
    #[token("/*", block_comment)]
    Trivia,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":=")]
    ColonEq,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,

    #[token("function")]
    KwFunction,
    #[token("let")]
    KwLet,
    #[token("if")]
    KwIf,
    #[token("switch")]
    KwSwitch,
    #[token("case")]
    KwCase,
    #[token("default")]
    KwDefault,
    #[token("for")]
    KwFor,
    #[token("break")]
    KwBreak,
    #[token("continue")]
    KwContinue,
    #[token("leave")]
    KwLeave,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$.]*")]
    Identifier,
    #[regex(r"0x[0-9a-fA-F]+|[0-9]+")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    Error,
    Eof,
}

impl TokenKind {
    fn describe(&self) -> &'static str {
        match self {
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::ColonEq => "':='",
            TokenKind::Colon => "':'",
            TokenKind::Arrow => "'->'",
            TokenKind::KwFunction => "'function'",
            TokenKind::KwLet => "'let'",
            TokenKind::KwIf => "'if'",
            TokenKind::KwSwitch => "'switch'",
            TokenKind::KwCase => "'case'",
            TokenKind::KwDefault => "'default'",
            TokenKind::KwFor => "'for'",
            TokenKind::KwBreak => "'break'",
            TokenKind::KwContinue => "'continue'",
            TokenKind::KwLeave => "'leave'",
            TokenKind::KwTrue => "'true'",
            TokenKind::KwFalse => "'false'",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string literal",
            TokenKind::Trivia => "whitespace",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of input",
        }
    }
}

/// Consumes a `/* ... */` comment after its opening token. An unterminated
/// comment lexes as an error.
fn block_comment(lex: &mut logos::Lexer<'_, TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Words that can never be used as identifiers.
pub const KEYWORDS: &[&str] = &[
    "function", "let", "if", "switch", "case", "default", "for", "break", "continue", "leave",
    "true", "false",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

impl std::error::Error for ParseError {}

type Result<T> = std::result::Result<T, ParseError>;

/// Parses a Yul object body: a single outermost block.
pub fn parse(source: &str) -> Result<Block> {
    let mut parser = Parser {
        source,
        iter: TokenKind::lexer(source)
            .spanned()
            .filter(|(kind, _)| *kind != Ok(TokenKind::Trivia))
            .map(|(kind, span)| Token {
                kind: kind.unwrap_or(TokenKind::Error),
                location: SourceLocation::new(span.start, span.end),
            })
            .peekable(),
    };
    let block = parser.block()?;
    parser.expect(TokenKind::Eof)?;
    Ok(block)
}

#[derive(Clone, Copy)]
struct Token {
    kind: TokenKind,
    location: SourceLocation,
}

struct Parser<'src, I: Iterator<Item = Token>> {
    source: &'src str,
    iter: Peekable<I>,
}

impl<'src, I: Iterator<Item = Token>> Parser<'src, I> {
    fn peek(&mut self) -> TokenKind {
        self.iter.peek().map_or(TokenKind::Eof, |token| token.kind)
    }

    fn peek_location(&mut self) -> SourceLocation {
        let end = self.source.len();
        self.iter
            .peek()
            .map_or(SourceLocation::new(end, end), |token| token.location)
    }

    fn bump(&mut self) -> Token {
        let location = self.peek_location();
        self.iter.next().unwrap_or(Token {
            kind: TokenKind::Eof,
            location,
        })
    }

    fn text(&self, token: Token) -> &'src str {
        &self.source[token.location.start..token.location.end]
    }

    fn error<T>(&mut self, expected: &str) -> Result<T> {
        let location = self.peek_location();
        let found = self.peek();
        Err(ParseError {
            message: format!("expected {}, found {}", expected, found.describe()),
            location,
        })
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.peek() == kind {
            Ok(self.bump())
        } else {
            self.error(kind.describe())
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn block(&mut self) -> Result<Block> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while self.peek() != TokenKind::RBrace {
            if self.peek() == TokenKind::Eof {
                return self.error("'}'");
            }
            statements.push(self.statement()?);
        }
        let close = self.bump();
        Ok(Block {
            location: open.location.join(close.location),
            statements,
        })
    }

    fn statement(&mut self) -> Result<Statement> {
        let start = self.peek_location();
        match self.peek() {
            TokenKind::LBrace => Ok(Statement::Block(self.block()?)),
            TokenKind::KwFunction => Ok(Statement::FunctionDefinition(self.function_definition()?)),
            TokenKind::KwLet => {
                self.bump();
                let variables = self.typed_names()?;
                let value = if self.eat(TokenKind::ColonEq) {
                    Some(Box::new(self.expression()?))
                } else {
                    None
                };
                let end = value.as_ref().map_or_else(
                    || variables.last().map_or(start, |v| v.location),
                    |v| v.location(),
                );
                Ok(Statement::VariableDeclaration(VariableDeclaration {
                    location: start.join(end),
                    variables,
                    value,
                }))
            }
            TokenKind::KwIf => {
                self.bump();
                let condition = Box::new(self.expression()?);
                let body = self.block()?;
                Ok(Statement::If(If {
                    location: start.join(body.location),
                    condition,
                    body,
                }))
            }
            TokenKind::KwSwitch => self.switch(),
            TokenKind::KwFor => {
                self.bump();
                let pre = self.block()?;
                let condition = Box::new(self.expression()?);
                let post = self.block()?;
                let body = self.block()?;
                Ok(Statement::ForLoop(ForLoop {
                    location: start.join(body.location),
                    pre,
                    condition,
                    post,
                    body,
                }))
            }
            TokenKind::KwBreak => Ok(Statement::Break(self.bump().location)),
            TokenKind::KwContinue => Ok(Statement::Continue(self.bump().location)),
            TokenKind::KwLeave => Ok(Statement::Leave(self.bump().location)),
            TokenKind::Identifier => self.assignment_or_expression_statement(),
            TokenKind::Number | TokenKind::String | TokenKind::KwTrue | TokenKind::KwFalse => {
                let expression = self.expression()?;
                Ok(Statement::ExpressionStatement(ExpressionStatement {
                    location: expression.location(),
                    expression,
                }))
            }
            _ => self.error("statement"),
        }
    }

    fn assignment_or_expression_statement(&mut self) -> Result<Statement> {
        let first = self.identifier()?;
        match self.peek() {
            TokenKind::LParen => {
                let call = self.call_arguments(first)?;
                Ok(Statement::ExpressionStatement(ExpressionStatement {
                    location: call.location,
                    expression: Expression::FunctionCall(call),
                }))
            }
            TokenKind::Comma | TokenKind::ColonEq => {
                let mut variable_names = vec![first];
                while self.eat(TokenKind::Comma) {
                    variable_names.push(self.identifier()?);
                }
                self.expect(TokenKind::ColonEq)?;
                let value = self.expression()?;
                Ok(Statement::Assignment(Assignment {
                    location: variable_names[0].location.join(value.location()),
                    variable_names,
                    value: Box::new(value),
                }))
            }
            _ => Ok(Statement::ExpressionStatement(ExpressionStatement {
                location: first.location,
                expression: Expression::Identifier(first),
            })),
        }
    }

    fn switch(&mut self) -> Result<Statement> {
        let start = self.bump().location;
        let expression = Box::new(self.expression()?);
        let mut cases = Vec::new();
        while self.peek() == TokenKind::KwCase {
            let case_start = self.bump().location;
            let value = self.literal()?;
            let body = self.block()?;
            cases.push(Case {
                location: case_start.join(body.location),
                value: Some(value),
                body,
            });
        }
        if self.peek() == TokenKind::KwDefault {
            let case_start = self.bump().location;
            let body = self.block()?;
            cases.push(Case {
                location: case_start.join(body.location),
                value: None,
                body,
            });
        }
        if cases.is_empty() {
            return self.error("'case' or 'default'");
        }
        let end = cases.last().map_or(start, |c| c.location);
        Ok(Statement::Switch(Switch {
            location: start.join(end),
            expression,
            cases,
        }))
    }

    fn function_definition(&mut self) -> Result<FunctionDefinition> {
        let start = self.expect(TokenKind::KwFunction)?.location;
        let name = self.identifier()?.name;
        self.expect(TokenKind::LParen)?;
        let parameters = if self.peek() == TokenKind::RParen {
            Vec::new()
        } else {
            self.typed_names()?
        };
        self.expect(TokenKind::RParen)?;
        let return_variables = if self.eat(TokenKind::Arrow) {
            self.typed_names()?
        } else {
            Vec::new()
        };
        let body = self.block()?;
        Ok(FunctionDefinition {
            location: start.join(body.location),
            name,
            parameters,
            return_variables,
            body,
        })
    }

    fn typed_names(&mut self) -> Result<Vec<TypedName>> {
        let mut names = vec![self.typed_name()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.typed_name()?);
        }
        Ok(names)
    }

    fn typed_name(&mut self) -> Result<TypedName> {
        let identifier = self.identifier()?;
        let (type_, location) = self.type_suffix(identifier.location)?;
        Ok(TypedName {
            location,
            name: identifier.name,
            type_,
        })
    }

    fn type_suffix(
        &mut self,
        location: SourceLocation,
    ) -> Result<(Option<YulString>, SourceLocation)> {
        if self.eat(TokenKind::Colon) {
            let type_ = self.identifier()?;
            Ok((Some(type_.name), location.join(type_.location)))
        } else {
            Ok((None, location))
        }
    }

    fn identifier(&mut self) -> Result<Identifier> {
        if self.peek() != TokenKind::Identifier {
            return self.error("identifier");
        }
        let token = self.bump();
        Ok(Identifier {
            location: token.location,
            name: YulString::new(self.text(token)),
        })
    }

    fn expression(&mut self) -> Result<Expression> {
        match self.peek() {
            TokenKind::Identifier => {
                let identifier = self.identifier()?;
                if self.peek() == TokenKind::LParen {
                    Ok(Expression::FunctionCall(self.call_arguments(identifier)?))
                } else {
                    Ok(Expression::Identifier(identifier))
                }
            }
            TokenKind::Number | TokenKind::String | TokenKind::KwTrue | TokenKind::KwFalse => {
                Ok(Expression::Literal(self.literal()?))
            }
            _ => self.error("expression"),
        }
    }

    fn call_arguments(&mut self, function_name: Identifier) -> Result<FunctionCall> {
        self.expect(TokenKind::LParen)?;
        let mut arguments = Vec::new();
        if self.peek() != TokenKind::RParen {
            arguments.push(self.expression()?);
            while self.eat(TokenKind::Comma) {
                arguments.push(self.expression()?);
            }
        }
        let close = self.expect(TokenKind::RParen)?;
        Ok(FunctionCall {
            location: function_name.location.join(close.location),
            function_name,
            arguments,
        })
    }

    fn literal(&mut self) -> Result<Literal> {
        let kind = match self.peek() {
            TokenKind::Number => LiteralKind::Number,
            TokenKind::String => LiteralKind::String,
            TokenKind::KwTrue | TokenKind::KwFalse => LiteralKind::Boolean,
            _ => return self.error("literal"),
        };
        let token = self.bump();
        let text = self.text(token);
        let value = match kind {
            LiteralKind::String => &text[1..text.len() - 1],
            LiteralKind::Number | LiteralKind::Boolean => text,
        };
        let (type_, location) = self.type_suffix(token.location)?;
        Ok(Literal {
            location,
            kind,
            value: YulString::new(value),
            type_,
        })
    }
}
