//! JSON encoding of trees, used by the command-line front end.
//!
//! | JSON | Node |
//! |---|---|
//! | `null` | nil |
//! | integer | integer |
//! | string | string |
//! | array | list form |
//! | `{"sym": "x"}` / `{"kw": "x"}` / `{"str": "x"}` | symbol / keyword / string |
//! | `{"ratio": [n, d]}` | ratio |
//! | `{"vec": [...]}` | vector |
//! | `{"map": [[k, v], ...]}` | map |
//! | `{"splice": null}` | empty splice |
//!
//! A document is a single form, or `{"forms": [...]}` for several top-level forms.

use crate::error::CompileError;
use crate::node::Node;
use indexmap::IndexMap;
use serde_json::{Map, Value};

pub fn parse_document(src: &str) -> Result<Vec<Node>, CompileError> {
    let value: Value = serde_json::from_str(src)
        .map_err(|e| CompileError::interchange(format!("invalid JSON: {}", e)))?;
    document_from_value(&value)
}

pub fn document_from_value(value: &Value) -> Result<Vec<Node>, CompileError> {
    if let Value::Object(obj) = value {
        if let Some(forms) = obj.get("forms") {
            if obj.len() != 1 {
                return Err(CompileError::interchange("`forms` must be the only key"));
            }
            let Value::Array(forms) = forms else {
                return Err(CompileError::interchange("`forms` must be an array"));
            };
            return forms.iter().map(node_from_value).collect();
        }
    }
    Ok(vec![node_from_value(value)?])
}

pub fn node_from_value(value: &Value) -> Result<Node, CompileError> {
    match value {
        Value::Null => Ok(Node::Nil),
        Value::Bool(b) => Err(CompileError::interchange(format!(
            "booleans have no node form: {}",
            b
        ))),
        Value::Number(n) => n
            .as_i64()
            .map(Node::Int)
            .ok_or_else(|| CompileError::interchange(format!("not an integer: {}", n))),
        Value::String(s) => Ok(Node::Str(s.clone())),
        Value::Array(items) => Ok(Node::List(nodes(items)?)),
        Value::Object(obj) => tagged(obj),
    }
}

fn nodes(items: &[Value]) -> Result<Vec<Node>, CompileError> {
    items.iter().map(node_from_value).collect()
}

fn tagged(obj: &Map<String, Value>) -> Result<Node, CompileError> {
    let mut iter = obj.iter();
    let (tag, body) = match (iter.next(), iter.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(CompileError::interchange(
                "tagged objects must have exactly one key",
            ));
        }
    };

    match (tag.as_str(), body) {
        ("sym", Value::String(s)) => Ok(Node::Symbol(s.clone())),
        ("kw", Value::String(s)) => Ok(Node::Keyword(s.clone())),
        ("str", Value::String(s)) => Ok(Node::Str(s.clone())),
        ("ratio", Value::Array(parts)) => match parts.as_slice() {
            [n, d] => match (n.as_i64(), d.as_i64()) {
                (Some(numer), Some(denom)) => Ok(Node::Ratio { numer, denom }),
                _ => Err(CompileError::interchange("ratio parts must be integers")),
            },
            _ => Err(CompileError::interchange("ratio must be [numerator, denominator]")),
        },
        ("vec", Value::Array(items)) => Ok(Node::Vector(nodes(items)?)),
        ("map", Value::Array(pairs)) => {
            let mut entries = IndexMap::with_capacity(pairs.len());
            for pair in pairs {
                match pair {
                    Value::Array(kv) if kv.len() == 2 => {
                        entries.insert(node_from_value(&kv[0])?, node_from_value(&kv[1])?);
                    }
                    other => {
                        return Err(CompileError::interchange(format!(
                            "map entries must be [key, value] pairs, got {}",
                            other
                        )));
                    }
                }
            }
            Ok(Node::Map(entries))
        }
        ("splice", Value::Null) => Ok(Node::EmptySplice),
        (tag, body) => Err(CompileError::interchange(format!(
            "unknown or malformed tag `{}`: {}",
            tag, body
        ))),
    }
}
