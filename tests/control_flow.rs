mod common;
use common::*;
use shform::CompileError;
use shform::node::{form, int, list, string, sym, vector};

#[test]
fn if_logical_test_is_bracketed_and_quoted() {
    let out = compile(form(
        "if",
        [form("==", [sym("a"), sym("b")]), list([sym("echo"), sym("ok")])],
    ));
    assert_eq!(out, "if [ \"a\" == \"b\" ]; then echo ok;fi");
}

#[test]
fn if_with_else_branch() {
    let out = compile(form(
        "if",
        [
            form("=", [sym("a"), sym("b")]),
            list([sym("echo"), sym("yes")]),
            list([sym("echo"), sym("no")]),
        ],
    ));
    assert_eq!(out, "if [ \"a\" == \"b\" ]; then echo yes;else echo no;fi");
}

#[test]
fn if_command_test_is_not_bracketed() {
    let out = compile(form(
        "if",
        [
            list([sym("grep"), sym("-q"), sym("x"), sym("f")]),
            list([sym("echo"), sym("found")]),
        ],
    ));
    assert_eq!(out, "if grep -q x f; then echo found;fi");
}

#[test]
fn if_compound_body_is_wrapped_on_lines() {
    let out = compile(form(
        "if",
        [
            form("file-exists?", [string("/tmp/x")]),
            form(
                "do",
                [list([sym("echo"), sym("a")]), list([sym("echo"), sym("b")])],
            ),
        ],
    ));
    assert_eq!(out, "if [ -e /tmp/x ]; then\necho a\necho b\nfi");
}

#[test]
fn nested_if_is_wrapped_on_lines() {
    let inner = form(
        "if",
        [form("empty?", [sym("x")]), list([sym("echo"), sym("empty")])],
    );
    let out = compile(form("if", [form("directory?", [sym("d")]), inner]));
    assert_eq!(
        out,
        "if [ -d d ]; then\nif [ -z x ]; then echo empty;fi\nfi"
    );
}

#[test]
fn if_not_negates_inside_brackets() {
    let out = compile(form(
        "if-not",
        [form("==", [sym("a"), sym("b")]), list([sym("echo"), sym("differ")])],
    ));
    assert_eq!(out, "if [ ! \\( \"a\" == \"b\" \\) ]; then echo differ;fi");
}

#[test]
fn if_not_prefixes_command_test() {
    let out = compile(form(
        "if-not",
        [
            list([sym("grep"), sym("x"), sym("f")]),
            list([sym("exit"), int(1)]),
        ],
    ));
    assert_eq!(out, "if ! grep x f; then exit 1;fi");
}

#[test]
fn combined_test_keeps_inner_groups() {
    let test = form(
        "&&",
        [
            form("==", [sym("a"), sym("b")]),
            form("!=", [sym("c"), sym("d")]),
        ],
    );
    let out = compile(form("if", [test, list([sym("echo"), sym("ok")])]));
    assert_eq!(
        out,
        "if [ \\( \"a\" == \"b\" \\) -a \\( \"c\" != \"d\" \\) ]; then echo ok;fi"
    );
}

#[test]
fn if_arity_is_checked() {
    let err = compile_err(form("if", [form("==", [sym("a"), sym("b")])]));
    assert!(matches!(err, CompileError::Structural { .. }));
}

#[test]
fn when_renders_statement_body() {
    let out = compile(form(
        "when",
        [
            form("directory?", [sym("d")]),
            list([sym("echo"), sym("a")]),
            list([sym("echo"), sym("b")]),
        ],
    ));
    assert_eq!(out, "if [ -d d ]; then\necho a\necho b\nfi");
}

#[test]
fn when_with_empty_body_uses_null_command() {
    let out = compile(form("when", [form("file-exists?", [sym("f")])]));
    assert_eq!(out, "if [ -e f ]; then\n:\nfi");
}

#[test]
fn while_loop() {
    let out = compile(form(
        "while",
        [form("<", [sym("i"), int(10)]), list([sym("echo"), sym("i")])],
    ));
    assert_eq!(out, "while [ \"i\" \\< \"10\" ]; do\necho i\ndone");
}

#[test]
fn doseq_over_vector() {
    let out = compile(form(
        "doseq",
        [
            vector([sym("x"), vector([int(1), int(2), int(3)])]),
            form("println", [form("deref", [sym("x")])]),
        ],
    ));
    assert_eq!(out, "for x in 1 2 3; do\necho ${x}\ndone");
}

#[test]
fn doseq_over_expression() {
    let out = compile(form(
        "doseq",
        [
            vector([sym("f"), form("deref", [list([sym("ls")])])]),
            list([sym("rm"), form("deref", [sym("f")])]),
        ],
    ));
    assert_eq!(out, "for f in $(ls); do\nrm ${f}\ndone");
}

#[test]
fn doseq_requires_binding_pair() {
    let err = compile_err(form("doseq", [vector([sym("x")])]));
    assert!(matches!(err, CompileError::Structural { .. }));
}

#[test]
fn case_renders_each_clause() {
    let out = compile(form(
        "case",
        [
            form("deref", [sym("x")]),
            string("a"),
            list([sym("echo"), sym("one")]),
            string("*"),
            list([sym("echo"), sym("other")]),
        ],
    ));
    assert_eq!(out, "case ${x} in\na)\necho one;;\n*)\necho other;;\nesac");
}

#[test]
fn case_with_unpaired_clause_fails() {
    let err = compile_err(form("case", [sym("x"), string("a")]));
    assert!(matches!(err, CompileError::Structural { .. }));
}
