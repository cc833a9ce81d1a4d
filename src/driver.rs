use crate::codegen;
use crate::diag::DiagContext;
use crate::error::CompileError;
use crate::json;
use crate::node::Node;
use crate::resolver::{NoResolver, Resolver};
use crate::runtime::{self, RuntimeUsage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeMode {
    /// Prepend helpers only when the tree uses them.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub shebang: bool,
    pub runtime: RuntimeMode,
    pub diag: DiagContext,
}

/// Render `nodes` into a standalone script.
pub fn compile_nodes(
    nodes: &[Node],
    options: &CompileOptions,
    resolver: &dyn Resolver,
) -> Result<String, CompileError> {
    let body = codegen::render_with(nodes, resolver, &options.diag)?;
    let mut body = body.trim_end_matches('\n').to_string();
    if !body.is_empty() {
        body.push('\n');
    }

    let usage = match options.runtime {
        RuntimeMode::Auto => runtime::scan_usage(nodes),
        RuntimeMode::Always => RuntimeUsage { hash: true },
        RuntimeMode::Never => RuntimeUsage::default(),
    };

    let mut out = String::new();
    if options.shebang {
        out.push_str("#!/bin/sh\n");
    }
    out.push_str(&runtime::with_runtime(&body, &usage));
    Ok(out)
}

/// Decode a JSON document and compile it with no resolver.
pub fn compile_json(src: &str, options: &CompileOptions) -> Result<String, CompileError> {
    let nodes = json::parse_document(src)?;
    compile_nodes(&nodes, options, &NoResolver)
}
