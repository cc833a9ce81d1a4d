use crate::error::CompileError;
use crate::node::Node;

/// Render an atomic node exactly. No quoting or escaping happens here; the
/// surrounding form decides whether a value needs quotes.
pub fn emit_literal(node: &Node) -> Result<String, CompileError> {
    match node {
        Node::Nil => Ok("null".to_string()),
        Node::Int(n) => Ok(n.to_string()),
        Node::Ratio { numer, denom } => emit_ratio(*numer, *denom),
        Node::Str(s) => Ok(s.clone()),
        Node::Keyword(name) | Node::Symbol(name) => Ok(name.clone()),
        Node::EmptySplice => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

fn emit_ratio(numer: i64, denom: i64) -> Result<String, CompileError> {
    if denom == 0 {
        return Err(CompileError::structural(format!(
            "ratio {}/{} has a zero denominator",
            numer, denom
        )));
    }
    let value = numer as f64 / denom as f64;
    // Whole values keep a fractional digit so they still read as decimals.
    if value.fract() == 0.0 && value.is_finite() {
        Ok(format!("{:.1}", value))
    } else {
        Ok(value.to_string())
    }
}
