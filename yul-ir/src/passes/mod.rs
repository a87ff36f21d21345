pub mod name_displacer;
pub mod unused_function_parameter_pruner;
pub mod unused_functions_common;

pub use name_displacer::NameDisplacer;
pub use unused_function_parameter_pruner::UnusedFunctionParameterPruner;
