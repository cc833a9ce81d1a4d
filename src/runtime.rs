//! Shell helpers that generated scripts may depend on.

use crate::node::Node;

/// Source of `hash_set` and `hash_echo`, used by the associative-array forms.
pub const HASH_RUNTIME: &str = include_str!("runtime/hash.sh");

/// Which helpers a tree calls into.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuntimeUsage {
    pub hash: bool,
}

impl RuntimeUsage {
    pub fn any(&self) -> bool {
        self.hash
    }
}

pub fn scan_usage(nodes: &[Node]) -> RuntimeUsage {
    let mut usage = RuntimeUsage::default();
    for node in nodes {
        visit_node(node, &mut usage);
    }
    usage
}

fn visit_node(node: &Node, usage: &mut RuntimeUsage) {
    match node {
        Node::List(items) => {
            match node.head_symbol() {
                Some("get" | "assoc!" | "merge!") => usage.hash = true,
                Some("var") if matches!(items.get(2), Some(Node::Map(_))) => usage.hash = true,
                _ => {}
            }
            for item in items {
                visit_node(item, usage);
            }
        }
        Node::Vector(items) => {
            for item in items {
                visit_node(item, usage);
            }
        }
        Node::Map(entries) => {
            for (k, v) in entries {
                visit_node(k, usage);
                visit_node(v, usage);
            }
        }
        _ => {}
    }
}

/// Prefix `script` with the helpers it uses.
pub fn with_runtime(script: &str, usage: &RuntimeUsage) -> String {
    let mut out = String::new();
    if usage.hash {
        out.push_str(HASH_RUNTIME);
        if !HASH_RUNTIME.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push_str(script);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{form, kw, map, string, sym};

    #[test]
    fn detects_nested_hash_forms() {
        let tree = form(
            "when",
            [sym("x"), form("println", [form("get", [sym("cfg"), kw("host")])])],
        );
        assert!(scan_usage(&[tree]).hash);
    }

    #[test]
    fn plain_var_needs_no_runtime() {
        let tree = form("var", [sym("x"), string("1")]);
        assert!(!scan_usage(&[tree]).any());

        let tree = form("var", [sym("x"), map([(kw("a"), string("1"))])]);
        assert!(scan_usage(&[tree]).hash);
    }

    #[test]
    fn runtime_is_prepended_only_when_used() {
        let used = RuntimeUsage { hash: true };
        assert!(with_runtime("echo\n", &used).starts_with("# Associative arrays"));
        assert_eq!(with_runtime("echo\n", &RuntimeUsage::default()), "echo\n");
    }
}
