#![allow(dead_code)]
use shform::node::Node;
use shform::{CompileError, render, render_node};
use std::fs;
use std::process::Command;

pub fn compile(node: Node) -> String {
    render_node(&node).expect("render failed")
}

pub fn compile_all(nodes: &[Node]) -> String {
    render(nodes).expect("render failed")
}

pub fn compile_err(node: Node) -> CompileError {
    match render_node(&node) {
        Ok(out) => panic!("Expected compile error, got output {:?}", out),
        Err(e) => e,
    }
}

/// Run a script with `sh` from a scratch directory. Returns (stdout, stderr, status).
pub fn run_sh_script(script: &str) -> (String, String, i32) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let script_path = dir.path().join("script.sh");
    fs::write(&script_path, script).expect("Failed to write temp script");

    let output = Command::new("sh")
        .current_dir(dir.path())
        .arg(&script_path)
        .output()
        .expect("Failed to execute sh");

    let stdout = String::from_utf8_lossy(&output.stdout).replace("\r\n", "\n");
    let stderr = String::from_utf8_lossy(&output.stderr).replace("\r\n", "\n");
    (stdout, stderr, output.status.code().unwrap_or(-1))
}
