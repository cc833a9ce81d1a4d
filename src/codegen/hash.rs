//! Associative arrays on top of the `hash_set` / `hash_echo` runtime helpers.
//!
//! Array and key names are rendered, then mangled into shell identifiers, so
//! `var`, `assoc!`, `merge!` and `get` agree on the name for the same logical
//! array and key.

use super::{EmitContext, emit};
use crate::error::CompileError;
use crate::names::mangle;
use crate::node::Node;
use indexmap::IndexMap;

pub(super) fn emit_hash_set(
    var: &Node,
    key: &Node,
    value: &Node,
    cx: &EmitContext<'_>,
) -> Result<String, CompileError> {
    Ok(format!(
        "hash_set {} {} {}",
        mangle(&emit(var, cx)?),
        mangle(&emit(key, cx)?),
        emit(value, cx)?
    ))
}

/// One `hash_set` line per entry.
pub(super) fn emit_map_assign(
    var: &Node,
    entries: &IndexMap<Node, Node>,
    cx: &EmitContext<'_>,
) -> Result<String, CompileError> {
    let lines = entries
        .iter()
        .map(|(k, v)| emit_hash_set(var, k, v, cx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

pub(super) fn emit_get(var: &Node, key: &Node, cx: &EmitContext<'_>) -> Result<String, CompileError> {
    Ok(format!(
        "$(hash_echo {} {} -n)",
        mangle(&emit(var, cx)?),
        mangle(&emit(key, cx)?)
    ))
}
