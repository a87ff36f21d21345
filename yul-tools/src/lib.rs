use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::Read;
use std::path::Path;
use yul_core::YulString;
use yul_ir::{parse, print, Dialect, PassRunner, Validator};
use yul_support::FastHashSet;

pub fn read_input_string(path: &Path) -> anyhow::Result<String> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {:?}", path))
    }
}

pub fn write_output(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    if path.to_str() == Some("-") {
        use std::io::Write;
        std::io::stdout().write_all(data)?;
        Ok(())
    } else {
        std::fs::write(path, data).with_context(|| format!("Failed to write output file {:?}", path))
    }
}

pub fn yul_opt_command() -> Command {
    let mut cmd = Command::new("yul-opt")
        .about("Optimizes Yul programs")
        .arg(
            Arg::new("input")
                .help("Input file, or - for stdin")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file, or - for stdout (the default)"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Log every pass that runs"),
        )
        .arg(
            Arg::new("validate")
                .long("validate")
                .action(ArgAction::SetTrue)
                .help("Validate the input and the result of every pass"),
        )
        .arg(
            Arg::new("reserved")
                .long("reserved")
                .value_name("NAME")
                .action(ArgAction::Append)
                .help("Identifier that passes must not introduce"),
        )
        .arg(
            Arg::new("optimize")
                .short('O')
                .action(ArgAction::Append)
                .num_args(0)
                .default_missing_value("true")
                .help("Run every optimization pass"),
        );

    // Register all passes as long flags
    for name in PassRunner::get_all_pass_names() {
        cmd = cmd.arg(
            Arg::new(name)
                .long(name)
                .action(ArgAction::Append)
                .num_args(0)
                .default_missing_value("true")
                .help(format!("Run the {} pass", name)),
        );
    }
    cmd
}

enum Action {
    Optimize,
    Pass(&'static str),
}

/// Builds a runner with the passes requested on the command line, in the
/// order they were given.
pub fn configure_runner(matches: &ArgMatches) -> anyhow::Result<PassRunner> {
    let mut runner = PassRunner::new();
    runner.set_validate_globally(matches.get_flag("validate"));

    let reserved: FastHashSet<YulString> = matches
        .get_many::<String>("reserved")
        .into_iter()
        .flatten()
        .map(|name| YulString::new(name))
        .collect();
    runner.set_reserved_identifiers(reserved);

    let mut actions = Vec::new();
    if let Some(indices) = matches.indices_of("optimize") {
        actions.extend(indices.map(|idx| (idx, Action::Optimize)));
    }
    for name in PassRunner::get_all_pass_names() {
        if let Some(indices) = matches.indices_of(name) {
            actions.extend(indices.map(|idx| (idx, Action::Pass(name))));
        }
    }
    actions.sort_by_key(|(idx, _)| *idx);

    for (_, action) in actions {
        match action {
            Action::Optimize => runner.add_default_optimization_passes(),
            Action::Pass(name) => {
                if !runner.add_by_name(name) {
                    bail!("Unknown pass: --{}", name);
                }
            }
        }
    }
    Ok(runner)
}

/// Parses `source`, optionally validates it, runs the passes and prints the
/// result.
pub fn optimize_source(
    source: &str,
    runner: &mut PassRunner,
    validate: bool,
) -> anyhow::Result<String> {
    let dialect = Dialect::evm();
    let mut ast = parse(source).context("Failed to parse input")?;

    if validate {
        let (valid, errors) = Validator::new(&ast, &dialect).validate();
        if !valid {
            bail!("Input is invalid:\n{}", errors.join("\n"));
        }
    }

    log::debug!("running {} pass(es)", runner.len());
    runner.run(&mut ast, &dialect);

    let mut output = print(&ast);
    output.push('\n');
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SOURCE: &str = "{ function f(x, y) -> a { a := add(y, 1) sstore(a, a) } pop(f(1, 2)) }";

    #[test]
    fn test_read_and_write_files() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        input.write_all(SOURCE.as_bytes()).unwrap();
        assert_eq!(read_input_string(input.path()).unwrap(), SOURCE);

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.yul");
        write_output(&output, b"{ }\n").unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "{ }\n");

        assert!(read_input_string(&dir.path().join("missing.yul")).is_err());
    }

    #[test]
    fn test_passes_run_in_command_line_order() {
        let matches = yul_opt_command()
            .try_get_matches_from([
                "yul-opt",
                "in.yul",
                "--unused-function-parameter-pruner",
                "-O",
                "--reserved",
                "f_1",
                "--validate",
            ])
            .unwrap();
        let runner = configure_runner(&matches).unwrap();
        assert_eq!(runner.len(), 1 + PassRunner::get_all_pass_names().len());
    }

    #[test]
    fn test_each_flag_occurrence_queues_passes() {
        let matches = yul_opt_command()
            .try_get_matches_from(["yul-opt", "in.yul", "-O"])
            .unwrap();
        assert_eq!(
            configure_runner(&matches).unwrap().len(),
            PassRunner::get_all_pass_names().len()
        );

        let matches = yul_opt_command()
            .try_get_matches_from([
                "yul-opt",
                "in.yul",
                "--unused-function-parameter-pruner",
                "--unused-function-parameter-pruner",
            ])
            .unwrap();
        assert_eq!(configure_runner(&matches).unwrap().len(), 2);

        let matches = yul_opt_command().try_get_matches_from(["yul-opt", "in.yul"]).unwrap();
        assert!(configure_runner(&matches).unwrap().is_empty());
    }

    #[test]
    fn test_optimize_source_rewrites_program() {
        let matches = yul_opt_command()
            .try_get_matches_from(["yul-opt", "-", "--unused-function-parameter-pruner"])
            .unwrap();
        let mut runner = configure_runner(&matches).unwrap();
        let output = optimize_source(SOURCE, &mut runner, true).unwrap();
        assert!(output.contains("pop(f_1(1, 2))"), "{}", output);
    }

    #[test]
    fn test_optimize_source_respects_reserved_names() {
        let matches = yul_opt_command()
            .try_get_matches_from(["yul-opt", "-", "-O", "--reserved", "f_1"])
            .unwrap();
        let mut runner = configure_runner(&matches).unwrap();
        let output = optimize_source(SOURCE, &mut runner, true).unwrap();
        assert!(output.contains("function f(y) -> a"), "{}", output);
        assert!(output.contains("pop(f_2(1, 2))"), "{}", output);
        assert!(!output.contains("f_1"), "{}", output);
    }

    #[test]
    fn test_invalid_input_is_reported() {
        let mut runner = PassRunner::new();
        let err = optimize_source("{ pop(g()) }", &mut runner, true).unwrap_err();
        assert!(err.to_string().contains("Input is invalid"));
        assert!(optimize_source("{ let := 1 }", &mut runner, false).is_err());
    }
}
