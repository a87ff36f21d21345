#![no_main]
use libfuzzer_sys::fuzz_target;
use yul_ir::{parse, Dialect, PassRunner, Validator};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut ast) = parse(source) else {
        return;
    };
    let dialect = Dialect::evm();
    if !Validator::new(&ast, &dialect).validate().0 {
        return;
    }

    // Validation after the pass panics on any malformed output.
    let mut runner = PassRunner::new();
    runner.set_validate_globally(true);
    runner.add_default_optimization_passes();
    runner.run(&mut ast, &dialect);
});
