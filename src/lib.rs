pub mod node;
pub mod literal;
pub mod ops;
pub mod names;
pub mod codegen;
pub mod combinators;
pub mod resolver;
pub mod diag;
pub mod runtime;
pub mod json;
pub mod driver;
pub mod error;

pub use codegen::{render, render_node, render_with};
pub use combinators::{chain, checked, sequence};
pub use diag::DiagContext;
pub use error::CompileError;
pub use node::Node;
pub use resolver::{CallDescriptor, NoResolver, ResolveError, Resolver};
