//! Extension hook for call forms the compiler does not know.
//!
//! A list whose head is a map literal is treated as a reference to an
//! externally defined capability. The map is wrapped in a [`CallDescriptor`]
//! and handed, with the remaining items, to the [`Resolver`] chosen for the
//! render. The default resolver leaves such calls unresolved and they render
//! as nothing.

use crate::diag::DiagContext;
use crate::node::Node;
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("resolution failed: {0}")]
    Failed(String),
}

/// Borrowed view of a call-descriptor map.
#[derive(Debug, Clone, Copy)]
pub struct CallDescriptor<'a> {
    entries: &'a IndexMap<Node, Node>,
}

impl<'a> CallDescriptor<'a> {
    pub fn new(entries: &'a IndexMap<Node, Node>) -> Self {
        Self { entries }
    }

    /// Value stored under keyword `key`.
    pub fn get(&self, key: &str) -> Option<&'a Node> {
        self.entries.get(&Node::Keyword(key.to_string()))
    }

    /// The `:fn-name` entry, if present as a symbol, keyword or string.
    pub fn name(&self) -> Option<&'a str> {
        match self.get("fn-name")? {
            Node::Symbol(s) | Node::Keyword(s) | Node::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn entries(&self) -> &'a IndexMap<Node, Node> {
        self.entries
    }

    /// Name used in error messages.
    pub fn describe(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => Node::Map(self.entries.clone()).to_string(),
        }
    }
}

pub trait Resolver {
    /// Render `call` applied to `args`. `Ok(None)` means unresolved.
    fn resolve(
        &self,
        call: CallDescriptor<'_>,
        args: &[Node],
        diag: &DiagContext,
    ) -> Result<Option<String>, ResolveError>;
}

/// Leaves every call unresolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResolver;

impl Resolver for NoResolver {
    fn resolve(
        &self,
        _call: CallDescriptor<'_>,
        _args: &[Node],
        _diag: &DiagContext,
    ) -> Result<Option<String>, ResolveError> {
        Ok(None)
    }
}

/// Any matching closure can serve as a resolver.
impl<F> Resolver for F
where
    F: Fn(CallDescriptor<'_>, &[Node], &DiagContext) -> Result<Option<String>, ResolveError>,
{
    fn resolve(
        &self,
        call: CallDescriptor<'_>,
        args: &[Node],
        diag: &DiagContext,
    ) -> Result<Option<String>, ResolveError> {
        self(call, args, diag)
    }
}
