use crate::parser::KEYWORDS;
use yul_core::YulString;
use yul_support::FastHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub parameters: usize,
    pub returns: usize,
    /// Execution does not continue past a call to this builtin.
    pub terminates: bool,
}

const fn builtin(name: &'static str, parameters: usize, returns: usize) -> BuiltinFunction {
    BuiltinFunction {
        name,
        parameters,
        returns,
        terminates: false,
    }
}

const fn terminating(name: &'static str, parameters: usize) -> BuiltinFunction {
    BuiltinFunction {
        name,
        parameters,
        returns: 0,
        terminates: true,
    }
}

const EVM_BUILTINS: &[BuiltinFunction] = &[
    builtin("add", 2, 1),
    builtin("sub", 2, 1),
    builtin("mul", 2, 1),
    builtin("div", 2, 1),
    builtin("sdiv", 2, 1),
    builtin("mod", 2, 1),
    builtin("smod", 2, 1),
    builtin("exp", 2, 1),
    builtin("addmod", 3, 1),
    builtin("mulmod", 3, 1),
    builtin("lt", 2, 1),
    builtin("gt", 2, 1),
    builtin("slt", 2, 1),
    builtin("sgt", 2, 1),
    builtin("eq", 2, 1),
    builtin("iszero", 1, 1),
    builtin("and", 2, 1),
    builtin("or", 2, 1),
    builtin("xor", 2, 1),
    builtin("not", 1, 1),
    builtin("byte", 2, 1),
    builtin("shl", 2, 1),
    builtin("shr", 2, 1),
    builtin("sar", 2, 1),
    builtin("keccak256", 2, 1),
    builtin("mload", 1, 1),
    builtin("mstore", 2, 0),
    builtin("mstore8", 2, 0),
    builtin("msize", 0, 1),
    builtin("sload", 1, 1),
    builtin("sstore", 2, 0),
    builtin("calldataload", 1, 1),
    builtin("calldatasize", 0, 1),
    builtin("calldatacopy", 3, 0),
    builtin("caller", 0, 1),
    builtin("callvalue", 0, 1),
    builtin("address", 0, 1),
    builtin("gas", 0, 1),
    builtin("pop", 1, 0),
    builtin("log0", 2, 0),
    builtin("log1", 3, 0),
    builtin("call", 7, 1),
    builtin("staticcall", 6, 1),
    terminating("stop", 0),
    terminating("return", 2),
    terminating("revert", 2),
    terminating("invalid", 0),
];

/// The set of builtin functions available to a program. Builtin names are
/// reserved: user code cannot declare them and fresh names never use them.
#[derive(Debug, Clone)]
pub struct Dialect {
    builtins: FastHashMap<YulString, BuiltinFunction>,
}

impl Dialect {
    pub fn evm() -> Self {
        Self::with_builtins(EVM_BUILTINS)
    }

    pub fn with_builtins(builtins: &[BuiltinFunction]) -> Self {
        Self {
            builtins: builtins
                .iter()
                .map(|b| (YulString::new(b.name), *b))
                .collect(),
        }
    }

    pub fn builtin(&self, name: YulString) -> Option<&BuiltinFunction> {
        self.builtins.get(&name)
    }

    pub fn is_builtin(&self, name: YulString) -> bool {
        self.builtins.contains_key(&name)
    }

    /// Builtins and keywords.
    pub fn is_restricted_identifier(&self, name: YulString) -> bool {
        self.is_builtin(name) || KEYWORDS.contains(&name.as_str())
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::evm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evm_builtins() {
        let dialect = Dialect::evm();
        let sstore = dialect.builtin(YulString::new("sstore")).unwrap();
        assert_eq!((sstore.parameters, sstore.returns), (2, 0));
        assert!(dialect.builtin(YulString::new("revert")).unwrap().terminates);
        assert!(dialect.builtin(YulString::new("f")).is_none());
    }

    #[test]
    fn test_restricted_identifiers() {
        let dialect = Dialect::evm();
        assert!(dialect.is_restricted_identifier(YulString::new("add")));
        assert!(dialect.is_restricted_identifier(YulString::new("leave")));
        assert!(!dialect.is_restricted_identifier(YulString::new("add_1")));
    }
}
