//! OpenAPI documents and the resource tree built from them

pub mod parser;
pub mod tree;
pub mod types;


pub use parser::OpenApiParser;
pub use tree::{display_name, ResourceTreeBuilder};
pub use types::*;
