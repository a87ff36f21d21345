pub mod cost;
pub mod evaluator;
pub mod names;
pub mod references;

pub use cost::{CodeSize, CodeWeights};
pub use evaluator::{EvaluationError, Evaluator, State};
pub use names::NameCollector;
pub use references::{CountWhat, ReferencesCounter};
