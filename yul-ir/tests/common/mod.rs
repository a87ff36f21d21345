use similar::{ChangeTag, TextDiff};
use std::fs;
use yul_ir::{parse, print, Dialect, PassRunner};

const SEPARATOR: &str = "// ----";

/// Runs the step named in an expectation file over its source and compares
/// the printed result with the expected output below the separator.
pub fn run_optimizer_test(path: &str) {
    let _ = env_logger::builder().is_test(true).try_init();

    let content = fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {}", path, e));
    let (source, expectation) = content
        .split_once(SEPARATOR)
        .unwrap_or_else(|| panic!("{}: missing '{}' separator", path, SEPARATOR));

    let mut lines = expectation
        .lines()
        .skip_while(|line| line.trim().is_empty())
        .map(|line| {
            line.strip_prefix("// ")
                .or_else(|| line.strip_prefix("//"))
                .unwrap_or(line)
        });
    let step = lines
        .next()
        .and_then(|line| line.strip_prefix("step:"))
        .map(str::trim)
        .unwrap_or_else(|| panic!("{}: missing 'step:' line", path));
    let expected = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    let mut ast = parse(source).unwrap_or_else(|e| panic!("{}: {}", path, e));
    let mut runner = PassRunner::new();
    runner.set_validate_globally(true);
    let pass_name = kebab_case(step);
    assert!(runner.add_by_name(&pass_name), "{}: unknown step '{}'", path, step);
    runner.run(&mut ast, &Dialect::evm());

    let actual = print(&ast);
    if actual != expected {
        let diff = TextDiff::from_lines(&expected, &actual);
        let mut report = String::new();
        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            report.push_str(&format!("{}{}", sign, change));
            if change.missing_newline() {
                report.push('\n');
            }
        }
        panic!("{}: output differs from expectation\n{}", path, report);
    }
}

fn kebab_case(step: &str) -> String {
    let mut name = String::new();
    for c in step.chars() {
        if c.is_ascii_uppercase() {
            if !name.is_empty() {
                name.push('-');
            }
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}
