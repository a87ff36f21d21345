mod yul_string;
pub use yul_string::*;

mod literal;
pub use literal::*;

mod location;
pub use location::*;
