mod hash;

use crate::diag::DiagContext;
use crate::error::CompileError;
use crate::literal::emit_literal;
use crate::names::check_identifier;
use crate::node::Node;
use crate::ops::{self, add_quotes};
use crate::resolver::{CallDescriptor, NoResolver, Resolver};
use indexmap::IndexMap;

/// What a single render carries besides the tree itself.
#[derive(Clone, Copy)]
pub(crate) struct EmitContext<'a> {
    resolver: &'a dyn Resolver,
    diag: &'a DiagContext,
}

impl<'a> EmitContext<'a> {
    pub(crate) fn new(resolver: &'a dyn Resolver, diag: &'a DiagContext) -> Self {
        Self { resolver, diag }
    }
}

/// Render top-level forms with no resolver and no location.
pub fn render(nodes: &[Node]) -> Result<String, CompileError> {
    render_with(nodes, &NoResolver, &DiagContext::default())
}

pub fn render_node(node: &Node) -> Result<String, CompileError> {
    render(std::slice::from_ref(node))
}

/// Render top-level forms. A single form renders as itself; several forms
/// render as a statement sequence.
pub fn render_with(
    nodes: &[Node],
    resolver: &dyn Resolver,
    diag: &DiagContext,
) -> Result<String, CompileError> {
    let cx = EmitContext::new(resolver, diag);
    let out = match nodes {
        [single] => emit(single, &cx),
        many => emit_statements(many, &cx),
    };
    out.map_err(|e| e.with_location(diag))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialForm {
    If,
    IfNot,
    When,
    While,
    Doseq,
    Case,
    Local,
    Var,
    Defvar,
    Let,
    Alias,
    Str,
    Quoted,
    Println,
    Print,
    Return,
    Set,
    New,
    Aget,
    Aset,
    Get,
    Merge,
    Assoc,
    Deref,
    Do,
    Group,
    Pipe,
    ChainOr,
    ChainAnd,
    Apply,
    Defn,
    Not,
    Predicate(&'static str),
}

impl SpecialForm {
    fn from_symbol(name: &str) -> Option<Self> {
        let form = match name {
            "if" => Self::If,
            "if-not" => Self::IfNot,
            "when" => Self::When,
            "while" => Self::While,
            "doseq" => Self::Doseq,
            "case" => Self::Case,
            "local" => Self::Local,
            "var" => Self::Var,
            "defvar" => Self::Defvar,
            "let" => Self::Let,
            "alias" => Self::Alias,
            "str" => Self::Str,
            "quoted" => Self::Quoted,
            "println" => Self::Println,
            "print" => Self::Print,
            "return" => Self::Return,
            "set!" => Self::Set,
            "new" => Self::New,
            "aget" => Self::Aget,
            "aset" => Self::Aset,
            "get" => Self::Get,
            "merge!" => Self::Merge,
            "assoc!" => Self::Assoc,
            "deref" => Self::Deref,
            "do" => Self::Do,
            "group" => Self::Group,
            "pipe" => Self::Pipe,
            "chain-or" => Self::ChainOr,
            "chain-and" => Self::ChainAnd,
            "apply" => Self::Apply,
            "defn" => Self::Defn,
            "not" => Self::Not,
            other => return ops::predicate_flag(other).map(Self::Predicate),
        };
        Some(form)
    }
}

pub(crate) fn emit(node: &Node, cx: &EmitContext<'_>) -> Result<String, CompileError> {
    match node {
        Node::List(items) => emit_list(items, cx),
        Node::Vector(items) => emit_vector(items, cx),
        Node::Map(entries) => emit_map(entries, cx),
        atom => emit_literal(atom),
    }
}

fn emit_list(items: &[Node], cx: &EmitContext<'_>) -> Result<String, CompileError> {
    let Some((head, args)) = items.split_first() else {
        return Ok(String::new());
    };

    match head {
        Node::Symbol(name) => {
            if let Some(form) = SpecialForm::from_symbol(name) {
                return emit_special(form, name, args, cx);
            }
            if ops::is_infix(name) {
                return ops::emit_infix(name, args, false, cx);
            }
            if let Some(method) = name.strip_prefix('.') {
                if !method.is_empty() {
                    return emit_method(method, args, cx);
                }
            }
            emit_invoke(items, cx)
        }
        Node::Map(entries) => emit_external(CallDescriptor::new(entries), args, cx),
        _ => emit_invoke(items, cx),
    }
}

fn emit_special(
    form: SpecialForm,
    name: &str,
    args: &[Node],
    cx: &EmitContext<'_>,
) -> Result<String, CompileError> {
    match form {
        SpecialForm::If | SpecialForm::IfNot => {
            arity(name, args, 2, 3)?;
            let negate = form == SpecialForm::IfNot;
            let mut out = format!("if {}; then", emit_condition(&args[0], negate, cx)?);
            out.push_str(&emit_branch(&args[1], cx)?);
            if let Some(else_form) = args.get(2) {
                out.push_str("else");
                out.push_str(&emit_branch(else_form, cx)?);
            }
            out.push_str("fi");
            Ok(out)
        }
        SpecialForm::When => {
            arity(name, args, 1, usize::MAX)?;
            let body = emit_statements(&args[1..], cx)?;
            let body = match body.trim() {
                "" => ":",
                body => body,
            };
            Ok(format!(
                "if {}; then\n{}\nfi",
                emit_condition(&args[0], false, cx)?,
                body
            ))
        }
        SpecialForm::While => {
            arity(name, args, 1, usize::MAX)?;
            Ok(format!(
                "while {}; do\n{}done",
                emit_condition(&args[0], false, cx)?,
                emit_statements(&args[1..], cx)?
            ))
        }
        SpecialForm::Doseq => emit_doseq(args, cx),
        SpecialForm::Case => emit_case(args, cx),
        SpecialForm::Local => {
            arity(name, args, 1, 2)?;
            let var = emit(&args[0], cx)?;
            check_identifier(&var)?;
            match args.get(1) {
                Some(value) => Ok(format!("local {}={}", var, emit(value, cx)?)),
                None => Ok(format!("local {}", var)),
            }
        }
        SpecialForm::Var => {
            arity(name, args, 2, 2)?;
            if let Node::Map(entries) = &args[1] {
                return hash::emit_map_assign(&args[0], entries, cx);
            }
            let var = emit(&args[0], cx)?;
            check_identifier(&var)?;
            Ok(format!("{}={}", var, emit(&args[1], cx)?))
        }
        SpecialForm::Defvar => {
            arity(name, args, 2, 2)?;
            Ok(format!("{}={}", emit(&args[0], cx)?, emit(&args[1], cx)?))
        }
        SpecialForm::Let => {
            arity(name, args, 2, 2)?;
            Ok(format!("let {}={}", emit(&args[0], cx)?, emit(&args[1], cx)?))
        }
        SpecialForm::Alias => {
            arity(name, args, 2, 2)?;
            Ok(format!("alias {}='{}'", emit(&args[0], cx)?, emit(&args[1], cx)?))
        }
        SpecialForm::Str => {
            let mut out = String::new();
            for arg in args {
                out.push_str(&emit(arg, cx)?);
            }
            Ok(out)
        }
        SpecialForm::Quoted => {
            arity(name, args, 1, 1)?;
            Ok(add_quotes(&emit(&args[0], cx)?))
        }
        SpecialForm::Println => Ok(prefixed("echo", &emit_words(args, cx)?)),
        SpecialForm::Print => Ok(prefixed("echo -n", &emit_words(args, cx)?)),
        SpecialForm::Return => {
            arity(name, args, 0, 1)?;
            match args.first() {
                Some(value) => Ok(format!("return {}", emit(value, cx)?)),
                None => Ok("return".to_string()),
            }
        }
        SpecialForm::Set => {
            arity(name, args, 2, 2)?;
            let var = emit(&args[0], cx)?;
            check_identifier(&var)?;
            Ok(format!("{}={}", var, emit(&args[1], cx)?))
        }
        SpecialForm::New => {
            arity(name, args, 1, usize::MAX)?;
            Ok(format!(
                "new {}{}",
                emit(&args[0], cx)?,
                comma_list(&args[1..], cx)?
            ))
        }
        SpecialForm::Aget => {
            arity(name, args, 2, 2)?;
            Ok(format!("${{{}[{}]}}", emit(&args[0], cx)?, emit(&args[1], cx)?))
        }
        SpecialForm::Aset => {
            arity(name, args, 3, 3)?;
            Ok(format!(
                "{}[{}]={}",
                emit(&args[0], cx)?,
                emit(&args[1], cx)?,
                emit(&args[2], cx)?
            ))
        }
        SpecialForm::Get => {
            arity(name, args, 2, 2)?;
            hash::emit_get(&args[0], &args[1], cx)
        }
        SpecialForm::Merge => {
            arity(name, args, 2, 2)?;
            match &args[1] {
                Node::Map(entries) => hash::emit_map_assign(&args[0], entries, cx),
                other => Err(CompileError::structural(format!(
                    "merge! expects a map literal, got {}",
                    other
                ))),
            }
        }
        SpecialForm::Assoc => {
            arity(name, args, 3, 3)?;
            hash::emit_hash_set(&args[0], &args[1], &args[2], cx)
        }
        SpecialForm::Deref => {
            arity(name, args, 1, 1)?;
            let inner = emit(&args[0], cx)?;
            match &args[0] {
                Node::List(_) => Ok(format!("$({})", inner)),
                _ => Ok(format!("${{{}}}", inner)),
            }
        }
        SpecialForm::Do => emit_statements(args, cx),
        SpecialForm::Group => {
            let parts = emit_parts(args, cx)?;
            let parts: Vec<&str> = parts.iter().map(|p| p.trim()).collect();
            Ok(format!("{{ {}; }}", parts.join("; ")))
        }
        SpecialForm::Pipe => Ok(emit_parts(args, cx)?.join(" | ")),
        SpecialForm::ChainOr => Ok(emit_parts(args, cx)?.join(" || ")),
        SpecialForm::ChainAnd => Ok(emit_parts(args, cx)?.join(" && ")),
        SpecialForm::Apply => {
            arity(name, args, 1, usize::MAX)?;
            let (last, init) = match args.split_last() {
                Some(split) => split,
                None => return Ok(String::new()),
            };
            let mut items: Vec<Node> = init.to_vec();
            match last {
                Node::Vector(spread) | Node::List(spread) => items.extend(spread.iter().cloned()),
                other => items.push(other.clone()),
            }
            emit_list(&items, cx)
        }
        SpecialForm::Defn => emit_defn(args, cx),
        SpecialForm::Not => {
            arity(name, args, 1, 1)?;
            Ok(format!("! {}", emit(&args[0], cx)?))
        }
        SpecialForm::Predicate(flag) => {
            arity(name, args, 1, 1)?;
            Ok(format!("{} {}", flag, emit(&args[0], cx)?))
        }
    }
}

fn arity(name: &str, args: &[Node], min: usize, max: usize) -> Result<(), CompileError> {
    if args.len() >= min && args.len() <= max {
        return Ok(());
    }
    let expected = if min == max {
        format!("{}", min)
    } else if max == usize::MAX {
        format!("at least {}", min)
    } else {
        format!("{} to {}", min, max)
    };
    Err(CompileError::structural(format!(
        "`{}` expects {} arguments, got {}",
        name,
        expected,
        args.len()
    )))
}

fn prefixed(cmd: &str, words: &str) -> String {
    if words.is_empty() {
        cmd.to_string()
    } else {
        format!("{} {}", cmd, words)
    }
}

/// `[ test ]` for logical forms, the bare command otherwise.
fn emit_condition(test: &Node, negate: bool, cx: &EmitContext<'_>) -> Result<String, CompileError> {
    let logical = test.head_symbol().is_some_and(ops::is_logical);
    match (logical, negate) {
        (true, false) => Ok(format!("[ {} ]", emit_test(test, cx)?)),
        // `!` binds tighter than -a/-o, so the negated test keeps its grouping.
        (true, true) => Ok(format!("[ ! {} ]", emit(test, cx)?)),
        (false, false) => emit(test, cx),
        (false, true) => Ok(format!("! {}", emit(test, cx)?)),
    }
}

fn emit_test(test: &Node, cx: &EmitContext<'_>) -> Result<String, CompileError> {
    if let Node::List(items) = test {
        if let Some(op) = test.head_symbol().filter(|op| ops::is_infix(op)) {
            return ops::emit_infix(op, &items[1..], true, cx);
        }
    }
    emit(test, cx)
}

fn emit_branch(form: &Node, cx: &EmitContext<'_>) -> Result<String, CompileError> {
    let body = emit(form, cx)?;
    let compound = form.is_form("do") || form.is_form("if") || form.is_form("if-not");
    if compound || body.contains('\n') {
        Ok(format!("\n{}\n", body.trim()))
    } else {
        Ok(format!(" {};", body))
    }
}

/// Each non-empty statement ends with exactly one newline of its own.
pub(crate) fn emit_statements(forms: &[Node], cx: &EmitContext<'_>) -> Result<String, CompileError> {
    let mut out = String::new();
    for form in forms.iter().filter(|f| !f.is_splice()) {
        let stmt = emit(form, cx)?;
        if stmt.is_empty() {
            continue;
        }
        out.push_str(&stmt);
        if !stmt.ends_with('\n') {
            out.push('\n');
        }
    }
    Ok(out)
}

/// Rendered forms with splices and blank results removed.
fn emit_parts(forms: &[Node], cx: &EmitContext<'_>) -> Result<Vec<String>, CompileError> {
    let mut parts = Vec::with_capacity(forms.len());
    for form in forms.iter().filter(|f| !f.is_splice()) {
        let part = emit(form, cx)?;
        if !part.trim().is_empty() {
            parts.push(part);
        }
    }
    Ok(parts)
}

fn emit_words(forms: &[Node], cx: &EmitContext<'_>) -> Result<String, CompileError> {
    Ok(emit_parts(forms, cx)?.join(" "))
}

fn emit_invoke(items: &[Node], cx: &EmitContext<'_>) -> Result<String, CompileError> {
    emit_words(items, cx)
}

fn emit_external(
    call: CallDescriptor<'_>,
    args: &[Node],
    cx: &EmitContext<'_>,
) -> Result<String, CompileError> {
    match cx.resolver.resolve(call, args, cx.diag) {
        Ok(text) => Ok(text.unwrap_or_default()),
        Err(source) => Err(CompileError::Extension {
            call: call.describe(),
            location: cx.diag.location(),
            source,
        }),
    }
}

fn comma_list(forms: &[Node], cx: &EmitContext<'_>) -> Result<String, CompileError> {
    let parts = forms
        .iter()
        .map(|f| emit(f, cx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("({})", parts.join(", ")))
}

fn emit_method(method: &str, args: &[Node], cx: &EmitContext<'_>) -> Result<String, CompileError> {
    let Some((obj, rest)) = args.split_first() else {
        return Err(CompileError::structural(format!(
            "method call `.{}` needs a target",
            method
        )));
    };
    Ok(format!("{}.{}{}", emit(obj, cx)?, method, comma_list(rest, cx)?))
}

fn emit_doseq(args: &[Node], cx: &EmitContext<'_>) -> Result<String, CompileError> {
    let binding = match args.split_first() {
        Some((Node::Vector(binding), _)) if binding.len() == 2 => binding,
        _ => {
            return Err(CompileError::structural(
                "doseq expects a binding vector [item values]",
            ));
        }
    };
    let values = match &binding[1] {
        Node::Vector(items) => emit_words(items, cx)?,
        other => emit(other, cx)?,
    };
    Ok(format!(
        "for {} in {}; do\n{}done",
        emit(&binding[0], cx)?,
        values,
        emit_statements(&args[1..], cx)?
    ))
}

fn emit_case(args: &[Node], cx: &EmitContext<'_>) -> Result<String, CompileError> {
    let Some((expr, clauses)) = args.split_first() else {
        return Err(CompileError::structural("case expects an expression"));
    };
    if clauses.len() % 2 != 0 {
        return Err(CompileError::structural(
            "case expects match/body pairs after the expression",
        ));
    }
    let mut out = format!("case {} in\n", emit(expr, cx)?);
    for pair in clauses.chunks(2) {
        out.push_str(&format!("{})\n{};;\n", emit(&pair[0], cx)?, emit(&pair[1], cx)?));
    }
    out.push_str("esac");
    Ok(out)
}

fn emit_defn(args: &[Node], cx: &EmitContext<'_>) -> Result<String, CompileError> {
    let (name, rest) = match args.first() {
        Some(Node::Symbol(name)) => (Some(name.as_str()), &args[1..]),
        _ => (None, args),
    };
    let Some((Node::Vector(params), body)) = rest.split_first() else {
        return Err(CompileError::structural(
            "defn expects a parameter vector",
        ));
    };

    let mut out = match name {
        Some(name) => format!("function {}() {{\n", name),
        None => "function () {\n".to_string(),
    };
    for (idx, param) in params.iter().enumerate() {
        out.push_str(&format!("{}=${}\n", emit(param, cx)?, idx + 1));
    }
    out.push_str(&emit_statements(body, cx)?);
    out.push_str("}\n");
    Ok(out)
}

fn emit_vector(items: &[Node], cx: &EmitContext<'_>) -> Result<String, CompileError> {
    Ok(format!("({})", emit_words(items, cx)?))
}

fn emit_map(entries: &IndexMap<Node, Node>, cx: &EmitContext<'_>) -> Result<String, CompileError> {
    let pairs = entries
        .iter()
        .map(|(k, v)| Ok(format!("[{}]={}", emit(k, cx)?, emit(v, cx)?)))
        .collect::<Result<Vec<_>, CompileError>>()?;
    Ok(format!("({})", pairs.join(" ")))
}
