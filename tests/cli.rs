use assert_cmd::Command;
use predicates::prelude::*;

fn shform() -> Command {
    Command::new(env!("CARGO_BIN_EXE_shform"))
}

#[test]
fn compiles_stdin_to_stdout() {
    shform()
        .write_stdin(r#"[{"sym": "echo"}, "hi"]"#)
        .assert()
        .success()
        .stdout("echo hi\n");
}

#[test]
fn compiles_several_forms() {
    shform()
        .write_stdin(r#"{"forms": [[{"sym": "local"}, {"sym": "x"}, 1], [{"sym": "println"}, [{"sym": "deref"}, {"sym": "x"}]]]}"#)
        .assert()
        .success()
        .stdout("local x=1\necho ${x}\n");
}

#[test]
fn check_mode_prints_ok() {
    shform()
        .arg("--check")
        .write_stdin(r#"[{"sym": "echo"}, "hi"]"#)
        .assert()
        .success()
        .stdout("OK\n");
}

#[test]
fn invalid_identifier_exits_with_compile_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    std::fs::write(&input, r#"[{"sym": "set!"}, {"sym": "a-b"}, 1]"#).unwrap();

    shform()
        .arg(&input)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid shell identifier `a-b`"))
        .stderr(predicate::str::contains("bad.json"));
}

#[test]
fn malformed_json_exits_with_compile_code() {
    shform()
        .write_stdin("{not json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("interchange error"));
}

#[test]
fn missing_input_file_exits_with_io_code() {
    shform()
        .arg("does/not/exist.json")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to read file"));
}

#[test]
fn runtime_always_prepends_helpers() {
    shform()
        .args(["--runtime", "always"])
        .write_stdin(r#"[{"sym": "echo"}, "hi"]"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("hash_echo() {"))
        .stdout(predicate::str::ends_with("echo hi\n"));
}

#[test]
fn out_writes_executable_script() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("script.sh");

    shform()
        .arg("--shebang")
        .arg("-o")
        .arg(&out)
        .write_stdin(r#"[{"sym": "echo"}, "hi"]"#)
        .assert()
        .success()
        .stdout("");

    let script = std::fs::read_to_string(&out).unwrap();
    assert_eq!(script, "#!/bin/sh\necho hi\n");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&out).unwrap().permissions().mode();
        assert!(mode & 0o111 != 0, "mode {:o}", mode);
    }
}

#[test]
fn emit_tree_prints_decoded_nodes() {
    shform()
        .arg("--emit-tree")
        .write_stdin(r#"[{"sym": "echo"}, {"kw": "k"}]"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Symbol(").and(predicate::str::contains("Keyword(")));
}

#[cfg(unix)]
#[test]
fn no_chmod_x_leaves_mode_alone() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("script.sh");

    shform()
        .args(["--no-chmod-x", "-o"])
        .arg(&out)
        .write_stdin(r#"[{"sym": "echo"}, "hi"]"#)
        .assert()
        .success();

    let mode = std::fs::metadata(&out).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0, "mode {:o}", mode);
}

#[test]
fn out_into_missing_directory_exits_with_io_code() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing").join("script.sh");

    shform()
        .arg("-o")
        .arg(&out)
        .write_stdin(r#"[{"sym": "echo"}, "hi"]"#)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to write"));
}
