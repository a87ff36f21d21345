use anyhow::Context;
use std::path::PathBuf;
use yul_tools::{configure_runner, optimize_source, read_input_string, write_output, yul_opt_command};

fn main() -> anyhow::Result<()> {
    let matches = yul_opt_command().get_matches();

    let mut logger = env_logger::Builder::from_default_env();
    if matches.get_flag("debug") {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let input_path: PathBuf = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .context("missing input file")?;
    let output_path: PathBuf = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("-"));

    let mut runner = configure_runner(&matches)?;
    let source = read_input_string(&input_path)?;
    let output = optimize_source(&source, &mut runner, matches.get_flag("validate"))
        .with_context(|| format!("Failed to optimize {:?}", input_path))?;
    write_output(&output_path, output.as_bytes())
}
