//! Input tree accepted by the compiler.
//!
//! A [`Node`] is built by the caller (directly, through the constructor
//! helpers below, or from JSON via [`crate::json`]) and consumed by
//! [`crate::codegen::render`]. Nodes are plain values: nothing in the
//! compiler mutates them.

use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Nil,
    Int(i64),
    /// Exact fraction, rendered as its decimal value.
    Ratio { numer: i64, denom: i64 },
    Str(String),
    Keyword(String),
    Symbol(String),
    /// Ordered form; the head decides how the whole list is rendered.
    List(Vec<Node>),
    Vector(Vec<Node>),
    Map(IndexMap<Node, Node>),
    /// Left behind by an empty splice. Dropped from any enclosing list.
    EmptySplice,
}

// IndexMap has no Hash impl. Map equality ignores entry order, so only the
// length of a map participates in its hash.
impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Node::Nil | Node::EmptySplice => {}
            Node::Int(n) => n.hash(state),
            Node::Ratio { numer, denom } => {
                numer.hash(state);
                denom.hash(state);
            }
            Node::Str(s) | Node::Keyword(s) | Node::Symbol(s) => s.hash(state),
            Node::List(items) | Node::Vector(items) => items.hash(state),
            Node::Map(entries) => entries.len().hash(state),
        }
    }
}

impl Node {
    /// Name of a symbol node, if this is one.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Node::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_splice(&self) -> bool {
        matches!(self, Node::EmptySplice)
    }

    /// True for a list whose head is the symbol `name`.
    pub fn is_form(&self, name: &str) -> bool {
        match self {
            Node::List(items) => items.first().and_then(Node::as_symbol) == Some(name),
            _ => false,
        }
    }

    /// Head symbol of a list form.
    pub fn head_symbol(&self) -> Option<&str> {
        match self {
            Node::List(items) => items.first().and_then(Node::as_symbol),
            _ => None,
        }
    }
}

/// Reader-like display, used in diagnostics.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Node], close: &str) -> fmt::Result {
            write!(f, "{open}")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{item}")?;
            }
            write!(f, "{close}")
        }

        match self {
            Node::Nil => write!(f, "nil"),
            Node::Int(n) => write!(f, "{n}"),
            Node::Ratio { numer, denom } => write!(f, "{numer}/{denom}"),
            Node::Str(s) => write!(f, "{s:?}"),
            Node::Keyword(k) => write!(f, ":{k}"),
            Node::Symbol(s) => write!(f, "{s}"),
            Node::List(items) => seq(f, "(", items, ")"),
            Node::Vector(items) => seq(f, "[", items, "]"),
            Node::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} {v}")?;
                }
                write!(f, "}}")
            }
            Node::EmptySplice => write!(f, "~@()"),
        }
    }
}

pub fn nil() -> Node {
    Node::Nil
}

pub fn int(n: i64) -> Node {
    Node::Int(n)
}

pub fn ratio(numer: i64, denom: i64) -> Node {
    Node::Ratio { numer, denom }
}

pub fn string(s: impl Into<String>) -> Node {
    Node::Str(s.into())
}

pub fn kw(name: impl Into<String>) -> Node {
    Node::Keyword(name.into())
}

pub fn sym(name: impl Into<String>) -> Node {
    Node::Symbol(name.into())
}

pub fn list(items: impl IntoIterator<Item = Node>) -> Node {
    Node::List(items.into_iter().collect())
}

pub fn vector(items: impl IntoIterator<Item = Node>) -> Node {
    Node::Vector(items.into_iter().collect())
}

/// Build a map literal. A repeated key keeps its first position and its last value.
pub fn map(entries: impl IntoIterator<Item = (Node, Node)>) -> Node {
    Node::Map(entries.into_iter().collect())
}

pub fn splice() -> Node {
    Node::EmptySplice
}

/// `(head args...)` with a symbol head.
pub fn form(head: &str, args: impl IntoIterator<Item = Node>) -> Node {
    let mut items = vec![sym(head)];
    items.extend(args);
    Node::List(items)
}
