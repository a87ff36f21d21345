extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use std::fs;
use std::path::{Path, PathBuf};
use syn::{parse_macro_input, ItemMod};

/// Adds one `#[test]` per `tests/<module name>/*.yul` expectation file to
/// the annotated module. Each test calls `crate::common::run_optimizer_test`.
#[proc_macro_attribute]
pub fn yul_optimizer_tests(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut module = parse_macro_input!(item as ItemMod);

    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let tests_dir = Path::new(&manifest_dir)
        .join("tests")
        .join(module.ident.to_string());

    let mut sources: Vec<PathBuf> = match fs::read_dir(&tests_dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| is_expectation_file(path))
            .collect(),
        Err(_) => Vec::new(),
    };
    sources.sort();

    let mut test_functions = Vec::new();
    for path in &sources {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed");
        let test_name = format_ident!("{}", sanitize(stem));
        let path_str = path.to_string_lossy().into_owned();

        test_functions.push(quote! {
            #[test]
            fn #test_name() {
                crate::common::run_optimizer_test(#path_str);
            }
        });
    }

    if let Some((_, content)) = &mut module.content {
        for test_fn in test_functions {
            match syn::parse2(test_fn) {
                Ok(item) => content.push(item),
                Err(err) => return err.to_compile_error().into(),
            }
        }
    } else {
        return syn::Error::new_spanned(
            &module,
            "yul_optimizer_tests must be applied to an inline module: `mod pass_name {}`",
        )
        .to_compile_error()
        .into();
    }

    quote! {
        #module
    }
    .into()
}

fn is_expectation_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("yul")
}

fn sanitize(stem: &str) -> String {
    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if name.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
