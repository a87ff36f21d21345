use crate::ast::{Block, Expression, ForLoop, FunctionCall, FunctionDefinition, Literal, Statement};
use crate::dialect::Dialect;
use std::collections::BTreeMap;
use std::fmt;
use yul_core::{parse_number, LiteralKind, YulString};
use yul_support::FastHashMap;

/// Machine word of the evaluator. Values are 64 bits wide and arithmetic
/// wraps, which is enough to compare two programs for equal behaviour.
pub type Word = u64;

const DEFAULT_STEP_LIMIT: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    Stop,
    Return(Word, Word),
    Revert(Word, Word),
    Invalid,
}

/// Observable effects of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub storage: BTreeMap<Word, Word>,
    pub memory: BTreeMap<Word, Word>,
    pub calldata: Vec<Word>,
    pub halted: Option<Halt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    UnknownFunction(YulString),
    UnknownVariable(YulString),
    ArityMismatch {
        function: YulString,
        expected: usize,
        found: usize,
    },
    UnsupportedBuiltin(YulString),
    InvalidLiteral(YulString),
    StepLimitExceeded,
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::UnknownFunction(name) => write!(f, "call to unknown function '{}'", name),
            EvaluationError::UnknownVariable(name) => write!(f, "use of unknown variable '{}'", name),
            EvaluationError::ArityMismatch {
                function,
                expected,
                found,
            } => write!(
                f,
                "function '{}' expects {} values, got {}",
                function, expected, found
            ),
            EvaluationError::UnsupportedBuiltin(name) => {
                write!(f, "builtin '{}' is not supported by the evaluator", name)
            }
            EvaluationError::InvalidLiteral(value) => write!(f, "invalid literal '{}'", value),
            EvaluationError::StepLimitExceeded => f.write_str("step limit exceeded"),
        }
    }
}

impl std::error::Error for EvaluationError {}

type Result<T> = std::result::Result<T, EvaluationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Normal,
    Break,
    Continue,
    Leave,
    Halt,
}

/// Variables visible inside one function invocation, innermost scope last.
#[derive(Default)]
struct Frame {
    scopes: Vec<FastHashMap<YulString, Word>>,
}

impl Frame {
    fn lookup(&self, name: YulString) -> Result<Word> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
            .ok_or(EvaluationError::UnknownVariable(name))
    }

    fn assign(&mut self, name: YulString, value: Word) -> Result<()> {
        let slot = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(&name))
            .ok_or(EvaluationError::UnknownVariable(name))?;
        *slot = value;
        Ok(())
    }

    fn declare(&mut self, name: YulString, value: Word) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, value);
        }
    }
}

/// Reference interpreter for Yul programs.
pub struct Evaluator<'a> {
    root: &'a Block,
    dialect: Dialect,
    functions: Vec<FastHashMap<YulString, &'a FunctionDefinition>>,
    state: State,
    steps: usize,
    max_steps: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a Block) -> Self {
        Self {
            root,
            dialect: Dialect::evm(),
            functions: Vec::new(),
            state: State::default(),
            steps: 0,
            max_steps: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn with_calldata(mut self, calldata: Vec<Word>) -> Self {
        self.state.calldata = calldata;
        self
    }

    pub fn with_storage(mut self, storage: BTreeMap<Word, Word>) -> Self {
        self.state.storage = storage;
        self
    }

    pub fn with_step_limit(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Executes the outermost block.
    pub fn run(mut self) -> Result<State> {
        let root = self.root;
        let mut frame = Frame::default();
        self.block(root, &mut frame)?;
        Ok(self.state)
    }

    /// Calls a function declared at the top level of the program without
    /// running the program's other statements.
    pub fn call(mut self, name: &str, arguments: &[Word]) -> Result<(Vec<Word>, State)> {
        let root = self.root;
        self.functions.push(Self::declared_functions(root));
        let name = YulString::new(name);
        let function = self
            .functions
            .last()
            .and_then(|scope| scope.get(&name).copied())
            .ok_or(EvaluationError::UnknownFunction(name))?;
        let outputs = self.invoke(function, arguments.to_vec())?;
        Ok((outputs, self.state))
    }

    fn declared_functions(block: &'a Block) -> FastHashMap<YulString, &'a FunctionDefinition> {
        block
            .function_definitions()
            .map(|function| (function.name, function))
            .collect()
    }

    fn step(&mut self) -> Result<()> {
        self.steps += 1;
        if self.steps > self.max_steps {
            Err(EvaluationError::StepLimitExceeded)
        } else {
            Ok(())
        }
    }

    fn halted(&self) -> bool {
        self.state.halted.is_some()
    }

    fn block(&mut self, block: &'a Block, frame: &mut Frame) -> Result<Flow> {
        self.functions.push(Self::declared_functions(block));
        frame.scopes.push(FastHashMap::default());
        let mut flow = Ok(Flow::Normal);
        for statement in &block.statements {
            flow = self.statement(statement, frame);
            if !matches!(flow, Ok(Flow::Normal)) {
                break;
            }
        }
        frame.scopes.pop();
        self.functions.pop();
        flow
    }

    fn statement(&mut self, statement: &'a Statement, frame: &mut Frame) -> Result<Flow> {
        self.step()?;
        let flow = match statement {
            Statement::ExpressionStatement(s) => {
                self.expression(&s.expression, frame)?;
                Flow::Normal
            }
            Statement::Assignment(s) => {
                let values = self.expression(&s.value, frame)?;
                self.check_count(&s.value, s.variable_names.len(), values.len())?;
                if !self.halted() {
                    for (name, value) in s.variable_names.iter().zip(values) {
                        frame.assign(name.name, value)?;
                    }
                }
                Flow::Normal
            }
            Statement::VariableDeclaration(s) => {
                let values = match &s.value {
                    Some(value) => {
                        let values = self.expression(value, frame)?;
                        self.check_count(value, s.variables.len(), values.len())?;
                        values
                    }
                    None => vec![0; s.variables.len()],
                };
                for (variable, value) in s.variables.iter().zip(values) {
                    frame.declare(variable.name, value);
                }
                Flow::Normal
            }
            // Hoisted when the enclosing block is entered.
            Statement::FunctionDefinition(_) => Flow::Normal,
            Statement::If(s) => {
                let condition = self.single(&s.condition, frame)?;
                if !self.halted() && condition != 0 {
                    self.block(&s.body, frame)?
                } else {
                    Flow::Normal
                }
            }
            Statement::Switch(s) => {
                let value = self.single(&s.expression, frame)?;
                let mut selected = None;
                for case in &s.cases {
                    match &case.value {
                        Some(literal) if self.literal(literal)? == value => {
                            selected = Some(&case.body);
                            break;
                        }
                        Some(_) => {}
                        None => selected = Some(&case.body),
                    }
                }
                match selected {
                    Some(body) if !self.halted() => self.block(body, frame)?,
                    _ => Flow::Normal,
                }
            }
            Statement::ForLoop(s) => self.for_loop(s, frame)?,
            Statement::Break(_) => Flow::Break,
            Statement::Continue(_) => Flow::Continue,
            Statement::Leave(_) => Flow::Leave,
            Statement::Block(block) => self.block(block, frame)?,
        };
        Ok(if self.halted() { Flow::Halt } else { flow })
    }

    fn for_loop(&mut self, s: &'a ForLoop, frame: &mut Frame) -> Result<Flow> {
        // Variables declared in the init block stay visible for the whole loop.
        self.functions.push(Self::declared_functions(&s.pre));
        frame.scopes.push(FastHashMap::default());
        let result = self.for_loop_inner(s, frame);
        frame.scopes.pop();
        self.functions.pop();
        result
    }

    fn for_loop_inner(&mut self, s: &'a ForLoop, frame: &mut Frame) -> Result<Flow> {
        for statement in &s.pre.statements {
            let flow = self.statement(statement, frame)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        loop {
            self.step()?;
            let condition = self.single(&s.condition, frame)?;
            if self.halted() {
                return Ok(Flow::Halt);
            }
            if condition == 0 {
                return Ok(Flow::Normal);
            }
            match self.block(&s.body, frame)? {
                Flow::Break => return Ok(Flow::Normal),
                Flow::Leave => return Ok(Flow::Leave),
                Flow::Halt => return Ok(Flow::Halt),
                Flow::Normal | Flow::Continue => {}
            }
            match self.block(&s.post, frame)? {
                Flow::Leave => return Ok(Flow::Leave),
                Flow::Halt => return Ok(Flow::Halt),
                _ => {}
            }
        }
    }

    fn check_count(&self, expr: &Expression, expected: usize, found: usize) -> Result<()> {
        if expected == found || self.halted() {
            return Ok(());
        }
        let function = match expr {
            Expression::FunctionCall(call) => call.function_name.name,
            _ => YulString::default(),
        };
        Err(EvaluationError::ArityMismatch {
            function,
            expected,
            found,
        })
    }

    fn single(&mut self, expr: &'a Expression, frame: &mut Frame) -> Result<Word> {
        let values = self.expression(expr, frame)?;
        self.check_count(expr, 1, values.len())?;
        Ok(values.first().copied().unwrap_or(0))
    }

    fn expression(&mut self, expr: &'a Expression, frame: &mut Frame) -> Result<Vec<Word>> {
        match expr {
            Expression::FunctionCall(call) => self.function_call(call, frame),
            Expression::Identifier(identifier) => Ok(vec![frame.lookup(identifier.name)?]),
            Expression::Literal(literal) => Ok(vec![self.literal(literal)?]),
        }
    }

    fn literal(&self, literal: &Literal) -> Result<Word> {
        match literal.kind {
            LiteralKind::Number => parse_number(literal.value.as_str())
                .ok_or(EvaluationError::InvalidLiteral(literal.value)),
            LiteralKind::Boolean => Ok((literal.value == "true") as Word),
            LiteralKind::String => {
                let mut bytes = [0u8; 8];
                for (slot, byte) in bytes.iter_mut().zip(literal.value.as_str().bytes()) {
                    *slot = byte;
                }
                Ok(Word::from_be_bytes(bytes))
            }
        }
    }

    fn function_call(&mut self, call: &'a FunctionCall, frame: &mut Frame) -> Result<Vec<Word>> {
        self.step()?;
        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in call.arguments.iter().rev() {
            arguments.push(self.single(argument, frame)?);
        }
        arguments.reverse();

        let name = call.function_name.name;
        let user_function = self
            .functions
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied());
        match user_function {
            Some(function) => {
                if self.halted() {
                    return Ok(vec![0; function.return_variables.len()]);
                }
                self.invoke(function, arguments)
            }
            None => self.builtin(name, &arguments),
        }
    }

    fn invoke(&mut self, function: &'a FunctionDefinition, arguments: Vec<Word>) -> Result<Vec<Word>> {
        if function.parameters.len() != arguments.len() {
            return Err(EvaluationError::ArityMismatch {
                function: function.name,
                expected: function.parameters.len(),
                found: arguments.len(),
            });
        }
        let mut frame = Frame::default();
        frame.scopes.push(FastHashMap::default());
        for (parameter, value) in function.parameters.iter().zip(arguments) {
            frame.declare(parameter.name, value);
        }
        for variable in &function.return_variables {
            frame.declare(variable.name, 0);
        }
        self.block(&function.body, &mut frame)?;
        function
            .return_variables
            .iter()
            .map(|variable| frame.lookup(variable.name))
            .collect()
    }

    fn builtin(&mut self, name: YulString, args: &[Word]) -> Result<Vec<Word>> {
        let arity = |n: usize| -> Result<()> {
            if args.len() == n {
                Ok(())
            } else {
                Err(EvaluationError::ArityMismatch {
                    function: name,
                    expected: n,
                    found: args.len(),
                })
            }
        };
        let bool_word = |b: bool| b as Word;
        let value = match name.as_str() {
            "add" | "sub" | "mul" | "div" | "mod" | "lt" | "gt" | "eq" | "and" | "or" | "xor"
            | "shl" | "shr" => {
                arity(2)?;
                let (a, b) = (args[0], args[1]);
                match name.as_str() {
                    "add" => a.wrapping_add(b),
                    "sub" => a.wrapping_sub(b),
                    "mul" => a.wrapping_mul(b),
                    "div" => a.checked_div(b).unwrap_or(0),
                    "mod" => a.checked_rem(b).unwrap_or(0),
                    "lt" => bool_word(a < b),
                    "gt" => bool_word(a > b),
                    "eq" => bool_word(a == b),
                    "and" => a & b,
                    "or" => a | b,
                    "xor" => a ^ b,
                    "shl" => u32::try_from(a).ok().and_then(|s| b.checked_shl(s)).unwrap_or(0),
                    _ => u32::try_from(a).ok().and_then(|s| b.checked_shr(s)).unwrap_or(0),
                }
            }
            "iszero" => {
                arity(1)?;
                bool_word(args[0] == 0)
            }
            "not" => {
                arity(1)?;
                !args[0]
            }
            "mload" => {
                arity(1)?;
                self.state.memory.get(&args[0]).copied().unwrap_or(0)
            }
            "sload" => {
                arity(1)?;
                self.state.storage.get(&args[0]).copied().unwrap_or(0)
            }
            "calldataload" => {
                arity(1)?;
                usize::try_from(args[0] / 32)
                    .ok()
                    .and_then(|i| self.state.calldata.get(i).copied())
                    .unwrap_or(0)
            }
            "calldatasize" => {
                arity(0)?;
                self.state.calldata.len() as Word * 32
            }
            "mstore" | "sstore" => {
                arity(2)?;
                if !self.halted() {
                    let target = if name == "mstore" {
                        &mut self.state.memory
                    } else {
                        &mut self.state.storage
                    };
                    target.insert(args[0], args[1]);
                }
                return Ok(vec![]);
            }
            "pop" => {
                arity(1)?;
                return Ok(vec![]);
            }
            "stop" | "invalid" | "return" | "revert" => {
                let halt = match name.as_str() {
                    "stop" => {
                        arity(0)?;
                        Halt::Stop
                    }
                    "invalid" => {
                        arity(0)?;
                        Halt::Invalid
                    }
                    "return" => {
                        arity(2)?;
                        Halt::Return(args[0], args[1])
                    }
                    _ => {
                        arity(2)?;
                        Halt::Revert(args[0], args[1])
                    }
                };
                self.state.halted.get_or_insert(halt);
                return Ok(vec![]);
            }
            _ if self.dialect.is_builtin(name) => {
                return Err(EvaluationError::UnsupportedBuiltin(name))
            }
            _ => return Err(EvaluationError::UnknownFunction(name)),
        };
        Ok(vec![value])
    }
}
