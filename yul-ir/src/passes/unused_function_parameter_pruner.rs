use crate::analysis::{CountWhat, ReferencesCounter};
use crate::ast::{Block, Statement};
use crate::pass::{OptimiserStepContext, Pass};
use crate::passes::name_displacer::NameDisplacer;
use crate::passes::unused_functions_common::{
    create_linking_function, too_simple_to_be_pruned, UsageMask,
};
use crate::visitor::Visitor;
use std::collections::BTreeMap;
use yul_core::YulString;
use yul_support::invert_map;

/// Removes parameters and return variables that a top-level function never
/// references. Each such function `f` is split in two:
///
/// ```text
/// function f(x, y) -> a, b { a := add(y, 1) }
/// ```
///
/// becomes
///
/// ```text
/// function f(y) -> a { a := add(y, 1) }
/// function f_1(x_2, y_3) -> a_4, b_5 { a_4 := f(y_3) }
/// ```
///
/// and every call site is redirected to `f_1`, which keeps the original
/// signature. Later inlining removes the forwarding function.
pub struct UnusedFunctionParameterPruner;

impl Pass for UnusedFunctionParameterPruner {
    fn name(&self) -> &str {
        "UnusedFunctionParameterPruner"
    }

    fn run(&mut self, context: &mut OptimiserStepContext<'_>, ast: &mut Block) {
        let references = ReferencesCounter::count_references(ast, CountWhat::VariablesAndFunctions);

        // 1. Find top-level functions with unreferenced slots.
        let mut masks: BTreeMap<YulString, UsageMask> = BTreeMap::new();
        for function in ast.function_definitions() {
            if too_simple_to_be_pruned(function) {
                continue;
            }
            let mask = UsageMask::measure(function, &references);
            if mask.has_unused() {
                masks.insert(function.name, mask);
            }
        }

        if masks.is_empty() {
            log::trace!("no function has unused parameters or return variables");
            return;
        }

        // 2. Move every targeted function, and every call to it, to a fresh
        // name.
        let mut displacer = NameDisplacer::new(&mut context.dispenser, masks.keys().copied().collect());
        displacer.visit_block(ast);
        let new_to_original = invert_map(displacer.translations());

        // 3. Give the pruned body the original name back and let the fresh
        // name forward to it.
        let statements = std::mem::take(&mut ast.statements);
        ast.statements.reserve(statements.len() + masks.len());
        for statement in statements {
            let (function, original_name) = match statement {
                Statement::FunctionDefinition(function) => {
                    match new_to_original.get(&function.name).copied() {
                        Some(original_name) => (function, original_name),
                        None => {
                            ast.statements.push(function.into());
                            continue;
                        }
                    }
                }
                other => {
                    ast.statements.push(other);
                    continue;
                }
            };
            let mask = masks
                .get(&original_name)
                .unwrap_or_else(|| panic!("no usage mask recorded for '{}'", original_name));
            log::debug!(
                "pruning '{}': parameters {:?}, return variables {:?}",
                original_name,
                mask.parameters,
                mask.return_variables
            );
            let (pruned, linking) =
                create_linking_function(function, mask, &mut context.dispenser, original_name);
            ast.statements.push(pruned.into());
            ast.statements.push(linking.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::name_dispenser::NameDispenser;
    use crate::parser::parse;
    use crate::printer::print;
    use yul_support::FastHashSet;

    fn prune(source: &str) -> String {
        let dialect = Dialect::evm();
        let mut ast = parse(source).unwrap();
        let reserved = FastHashSet::default();
        let mut context = OptimiserStepContext {
            dialect: &dialect,
            dispenser: NameDispenser::new(&dialect, &ast, FastHashSet::default()),
            reserved_identifiers: &reserved,
        };
        UnusedFunctionParameterPruner.run(&mut context, &mut ast);
        print(&ast)
    }

    fn reprint(source: &str) -> String {
        print(&parse(source).unwrap())
    }

    #[test]
    fn test_prunes_unused_parameter_and_return() {
        let result = prune(
            "{
                let t, u := f(1, 2)
                sstore(t, u)
                function f(x, y) -> a, b { a := add(y, 1) }
            }",
        );
        assert_eq!(
            result,
            reprint(
                "{
                    let t, u := f_1(1, 2)
                    sstore(t, u)
                    function f(y) -> a { a := add(y, 1) }
                    function f_1(x_2, y_3) -> a_4, b_5 { a_4 := f(y_3) }
                }"
            )
        );
    }

    #[test]
    fn test_fully_used_function_is_unchanged() {
        let source = "{ function g(p) -> q { q := add(p, 1) sstore(q, p) } pop(g(3)) }";
        assert_eq!(prune(source), reprint(source));
    }

    #[test]
    fn test_trivial_function_is_skipped() {
        let source = "{ function h(p) -> q { q := 1 } pop(h(3)) }";
        assert_eq!(prune(source), reprint(source));
    }

    #[test]
    fn test_all_returns_unused_gives_bare_call() {
        let result = prune(
            "{
                function k(p) -> r { sstore(p, 1) sstore(p, 2) }
                let v := k(7)
            }",
        );
        assert_eq!(
            result,
            reprint(
                "{
                    function k(p) { sstore(p, 1) sstore(p, 2) }
                    function k_1(p_2) -> r_3 { k(p_2) }
                    let v := k_1(7)
                }"
            )
        );
    }

    #[test]
    fn test_name_used_elsewhere_counts_as_used() {
        // `x` is referenced in another function, so the counter sees it.
        let source = "{
            function f(x) -> r { r := add(1, 2) }
            function g() -> y { let x := 3 y := add(x, 1) }
            pop(f(g()))
        }";
        assert_eq!(prune(source), reprint(source));
    }

    #[test]
    fn test_order_of_unrelated_statements_is_kept() {
        let result = prune(
            "{
                sstore(0, m(1, 2))
                function m(a, b) -> c { c := add(b, 1) }
                sstore(1, 2)
            }",
        );
        assert_eq!(
            result,
            reprint(
                "{
                    sstore(0, m_1(1, 2))
                    function m(b) -> c { c := add(b, 1) }
                    function m_1(a_2, b_3) -> c_4 { c_4 := m(b_3) }
                    sstore(1, 2)
                }"
            )
        );
    }

    #[test]
    fn test_nested_functions_are_not_pruned() {
        let source = "{
            function outer() -> r {
                function inner(u, v) -> w { w := add(v, 1) }
                r := inner(1, 2)
            }
            pop(outer())
        }";
        assert_eq!(prune(source), reprint(source));
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let once = prune(
            "{
                let t, u := f(1, 2)
                sstore(t, u)
                function f(x, y) -> a, b { a := add(y, 1) }
            }",
        );
        assert_eq!(prune(&once), once);
    }
}
