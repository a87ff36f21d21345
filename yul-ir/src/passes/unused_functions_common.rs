//! Helpers shared by passes that shrink function signatures.

use crate::analysis::CodeSize;
use crate::ast::{Expression, FunctionDefinition, IrBuilder, TypedName};
use crate::name_dispenser::NameDispenser;
use yul_core::YulString;
use yul_support::FastHashMap;

/// Which parameters and return variables of one function are referenced
/// in its body. `true` keeps the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageMask {
    pub parameters: Vec<bool>,
    pub return_variables: Vec<bool>,
}

impl UsageMask {
    pub fn measure(function: &FunctionDefinition, references: &FastHashMap<YulString, usize>) -> Self {
        let used = |slot: &TypedName| references.contains_key(&slot.name);
        Self {
            parameters: compute_usage_mask(&function.parameters, used),
            return_variables: compute_usage_mask(&function.return_variables, used),
        }
    }

    pub fn has_unused(&self) -> bool {
        any_unused(&self.parameters) || any_unused(&self.return_variables)
    }
}

pub fn compute_usage_mask<T>(slots: &[T], is_used: impl Fn(&T) -> bool) -> Vec<bool> {
    slots.iter().map(is_used).collect()
}

pub fn any_unused(mask: &[bool]) -> bool {
    mask.iter().any(|used| !used)
}

/// Keeps the entries whose mask bit is set, in their original order.
pub fn filter_by_mask<T>(list: Vec<T>, mask: &[bool]) -> Vec<T> {
    assert_eq!(list.len(), mask.len(), "mask does not match list");
    list.into_iter()
        .zip(mask)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}

/// Functions this small are left for the inliner.
pub fn too_simple_to_be_pruned(function: &FunctionDefinition) -> bool {
    function.body.statements.len() <= 1 && CodeSize::code_size(&function.body) <= 1
}

/// Splits `original` into a function with only the used slots, named
/// `restored_name`, and a function keeping `original`'s name and full
/// signature that forwards to it. Returned in that order.
pub fn create_linking_function(
    mut original: FunctionDefinition,
    mask: &UsageMask,
    dispenser: &mut NameDispenser<'_>,
    restored_name: YulString,
) -> (FunctionDefinition, FunctionDefinition) {
    let builder = IrBuilder::new(original.location);
    let mut fresh = |slot: &TypedName| TypedName {
        location: slot.location,
        name: dispenser.new_name(slot.name),
        type_: slot.type_,
    };
    let parameters: Vec<TypedName> = original.parameters.iter().map(&mut fresh).collect();
    let return_variables: Vec<TypedName> = original.return_variables.iter().map(&mut fresh).collect();

    let arguments = filter_by_mask(parameters.clone(), &mask.parameters)
        .into_iter()
        .map(|p| builder.identifier_expr(p.name))
        .collect();
    let targets: Vec<YulString> = filter_by_mask(return_variables.clone(), &mask.return_variables)
        .into_iter()
        .map(|r| r.name)
        .collect();

    let call = Expression::FunctionCall(builder.call(restored_name, arguments));
    let forward = if targets.is_empty() {
        builder.expression_statement(call)
    } else {
        builder.assignment(targets, call)
    };
    let linking = builder.function(original.name, parameters, return_variables, vec![forward]);

    original.name = restored_name;
    original.parameters = filter_by_mask(original.parameters, &mask.parameters);
    original.return_variables = filter_by_mask(original.return_variables, &mask.return_variables);

    (original, linking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::parser::parse;
    use crate::printer::print;
    use crate::ast::{Block, Statement};
    use proptest::prelude::*;
    use yul_support::FastHashSet;

    fn first_function(ast: &Block) -> FunctionDefinition {
        ast.function_definitions().next().unwrap().clone()
    }

    #[test]
    fn test_masks() {
        assert!(!any_unused(&[]));
        assert!(!any_unused(&[true, true]));
        assert!(any_unused(&[true, false]));
        assert_eq!(filter_by_mask(vec!['a', 'b', 'c'], &[false, true, true]), vec!['b', 'c']);
    }

    #[test]
    #[should_panic(expected = "mask does not match list")]
    fn test_filter_by_mask_length_mismatch() {
        filter_by_mask(vec![1, 2], &[true]);
    }

    #[test]
    fn test_usage_mask_measure() {
        let ast = parse("{ function f(x, y) -> a, b { a := add(y, 1) } }").unwrap();
        let references =
            crate::analysis::ReferencesCounter::count_references(&ast, crate::analysis::CountWhat::VariablesAndFunctions);
        let mask = UsageMask::measure(&first_function(&ast), &references);
        assert_eq!(mask.parameters, vec![false, true]);
        assert_eq!(mask.return_variables, vec![true, false]);
        assert!(mask.has_unused());
    }

    #[test]
    fn test_too_simple_to_be_pruned() {
        for (source, expected) in [
            ("{ function f(x) -> r { } }", true),
            ("{ function f(x) -> r { r := 7 } }", true),
            ("{ function f(x) -> r { r := add(x, 1) } }", false),
            ("{ function f(x) -> r { r := 1 r := 2 } }", false),
        ] {
            let ast = parse(source).unwrap();
            assert_eq!(too_simple_to_be_pruned(&first_function(&ast)), expected, "{}", source);
        }
    }

    #[test]
    fn test_create_linking_function() {
        let dialect = Dialect::evm();
        let ast = parse("{ function f_1(x, y:u256) -> a, b { a := add(y, 1) } }").unwrap();
        let mut dispenser = NameDispenser::new(&dialect, &ast, FastHashSet::default());
        let mask = UsageMask {
            parameters: vec![false, true],
            return_variables: vec![true, false],
        };
        let (pruned, linking) =
            create_linking_function(first_function(&ast), &mask, &mut dispenser, YulString::new("f"));

        let printed = print(&Block::new(vec![Statement::from(pruned), Statement::from(linking)]));
        assert_eq!(
            printed,
            "{\n    function f(y:u256) -> a\n    {\n        a := add(y, 1)\n    }\n    function f_1(x_1, y_2:u256) -> a_3, b_4\n    {\n        a_3 := f(y_2)\n    }\n}"
        );
    }

    #[test]
    fn test_linking_function_without_returns_is_a_call() {
        let dialect = Dialect::evm();
        let ast = parse("{ function g_1(p, q) { sstore(q, 1) sstore(q, 2) } }").unwrap();
        let mut dispenser = NameDispenser::new(&dialect, &ast, FastHashSet::default());
        let mask = UsageMask {
            parameters: vec![false, true],
            return_variables: vec![],
        };
        let (pruned, linking) =
            create_linking_function(first_function(&ast), &mask, &mut dispenser, YulString::new("g"));
        assert_eq!(pruned.parameters.len(), 1);
        assert_eq!(linking.body.statements.len(), 1);
        assert_eq!(linking.body.statements[0].to_string(), "g(q_2)");
    }

    proptest! {
        #[test]
        fn test_filter_by_mask_keeps_order(mask in proptest::collection::vec(any::<bool>(), 0..32)) {
            let list: Vec<usize> = (0..mask.len()).collect();
            let kept = filter_by_mask(list, &mask);
            prop_assert_eq!(kept.len(), mask.iter().filter(|b| **b).count());
            prop_assert!(kept.windows(2).all(|w| w[0] < w[1]));
            for index in &kept {
                prop_assert!(mask[*index]);
            }
        }

        #[test]
        fn test_linking_function_matches_mask(
            parameters in proptest::collection::vec(any::<bool>(), 0..6),
            return_variables in proptest::collection::vec(any::<bool>(), 0..6),
        ) {
            let dialect = Dialect::evm();
            let builder = IrBuilder::default();
            let slots = |prefix: &str, n: usize| -> Vec<TypedName> {
                (0..n).map(|i| TypedName::new(format!("{}{}", prefix, i).as_str())).collect()
            };
            let original = builder.function(
                YulString::new("h_1"),
                slots("p", parameters.len()),
                slots("r", return_variables.len()),
                vec![],
            );
            let mut dispenser = NameDispenser::with_used_names(&dialect, FastHashSet::default());
            let mask = UsageMask { parameters: parameters.clone(), return_variables: return_variables.clone() };
            let (pruned, linking) =
                create_linking_function(original, &mask, &mut dispenser, YulString::new("h"));

            prop_assert_eq!(linking.parameters.len(), parameters.len());
            prop_assert_eq!(linking.return_variables.len(), return_variables.len());
            let expected: Vec<String> = parameters
                .iter()
                .enumerate()
                .filter(|(_, keep)| **keep)
                .map(|(i, _)| format!("p{}", i))
                .collect();
            let actual: Vec<String> = pruned.parameters.iter().map(|p| p.name.to_string()).collect();
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(
                pruned.return_variables.len(),
                return_variables.iter().filter(|b| **b).count()
            );
        }
    }
}
