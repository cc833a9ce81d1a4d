//! Operator classification and infix rendering.

use crate::codegen::{EmitContext, emit};
use crate::error::CompileError;
use crate::node::Node;

const INFIX_OPERATORS: &[&str] = &[
    "+", "-", "/", "*", "%", "==", "=", "<", ">", "<=", ">=", "!=", "<<", ">>", "<<<", ">>>",
    "&", "|", "&&", "||", "and", "or",
];

// Infix operators that produce a test result. Their operands get quoted.
const TEST_INFIX_OPERATORS: &[&str] = &[
    "==", "=", "<", ">", "<=", ">=", "!=", "<<", ">>", "<<<", ">>>", "&", "|", "&&", "||", "and",
    "or",
];

const PREDICATES: &[(&str, &str)] = &[
    ("file-exists?", "-e"),
    ("directory?", "-d"),
    ("symlink?", "-h"),
    ("readable?", "-r"),
    ("writeable?", "-w"),
    ("empty?", "-z"),
];

pub fn is_infix(op: &str) -> bool {
    INFIX_OPERATORS.contains(&op)
}

/// Operators that make a form a test, bracketed with `[ ]` as a condition.
pub fn is_logical(op: &str) -> bool {
    TEST_INFIX_OPERATORS.contains(&op) || op == "not" || predicate_flag(op).is_some()
}

pub fn is_quoted(op: &str) -> bool {
    TEST_INFIX_OPERATORS.contains(&op)
}

/// `test` flag for a predicate form such as `file-exists?`.
pub fn predicate_flag(op: &str) -> Option<&'static str> {
    PREDICATES
        .iter()
        .find(|(name, _)| *name == op)
        .map(|(_, flag)| *flag)
}

/// Shell spelling of an operator inside `test`.
fn convert(op: &str) -> &str {
    match op {
        "&&" | "and" => "-a",
        "||" | "or" => "-o",
        "<" => "\\<",
        ">" => "\\>",
        "=" => "==",
        other => other,
    }
}

pub fn add_quotes(s: &str) -> String {
    format!("\"{}\"", s)
}

/// Quote a rendered operand unless it already looks like a test expression.
pub(crate) fn quote_unless_expr(s: String) -> String {
    let is_expr = ["\\(", "!", "-", "@"].iter().any(|p| s.starts_with(p));
    if is_expr { s } else { add_quotes(&s) }
}

/// Render `(op a b ...)`. Extra operands fold to the left. With `bare`, the
/// outermost grouping is left off; conditions use that inside `[ ]`.
pub(crate) fn emit_infix(
    op: &str,
    args: &[Node],
    bare: bool,
    cx: &EmitContext<'_>,
) -> Result<String, CompileError> {
    if args.len() < 2 {
        return Err(CompileError::structural(format!(
            "infix operator `{}` needs at least 2 arguments, got {}",
            op,
            args.len()
        )));
    }

    let logical = is_logical(op);
    let (open, close) = if logical { ("\\( ", " \\)") } else { ("(", ")") };
    let operand = |arg: &Node| -> Result<String, CompileError> {
        let s = emit(arg, cx)?;
        Ok(if is_quoted(op) { quote_unless_expr(s) } else { s })
    };

    let shell_op = convert(op);
    let mut acc = operand(&args[0])?;
    for (i, arg) in args[1..].iter().enumerate() {
        let inner = format!("{} {} {}", acc, shell_op, operand(arg)?);
        let outermost = i + 2 == args.len();
        acc = if outermost && bare {
            inner
        } else {
            format!("{}{}{}", open, inner, close)
        };
    }
    Ok(acc)
}
