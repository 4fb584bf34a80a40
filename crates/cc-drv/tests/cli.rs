//! CLI surface (spec.md §6): `<program> <path-to-C-source>`, exit 0 on
//! success, positive on any error.

use std::io::Write;

use assert_cmd::Command;

fn ccfront() -> Command {
    Command::cargo_bin("ccfront").unwrap()
}

#[test]
fn compiles_a_trivial_source_file_successfully() {
    let mut file = tempfile::NamedTempFile::with_suffix(".c").unwrap();
    file.write_all(b"int main(void) { return 0; }\n").unwrap();

    ccfront().arg(file.path()).assert().success();
}

#[test]
fn exits_nonzero_on_a_conditional_mismatch() {
    let mut file = tempfile::NamedTempFile::with_suffix(".c").unwrap();
    file.write_all(b"#if 1\nint x;\n").unwrap();

    ccfront().arg(file.path()).assert().failure();
}

#[test]
fn exits_nonzero_with_no_input_file() {
    ccfront().assert().failure();
}

#[test]
fn emit_tokens_flag_succeeds_without_parsing() {
    let mut file = tempfile::NamedTempFile::with_suffix(".c").unwrap();
    file.write_all(b"#define X 1\nX\n").unwrap();

    ccfront().arg("--emit-tokens").arg(file.path()).assert().success();
}
