//! Integration tests for gopher-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use gopher_core::platform::Arch;
use gopher_core::platform::Os;
use gopher_core::platform::TargetPlatform;
use gopher_core::test_utils::GoArchiveBuilder;
use predicates::prelude::*;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

struct Env {
    root: TempDir,
    downloads: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create temp dir"),
            downloads: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// A `gopher` command pinned to this root and to linux/amd64.
    fn cmd(&self) -> Command {
        let mut cmd = gopher_cmd();
        cmd.arg("--root")
            .arg(self.root.path())
            .args(["--os", "linux", "--arch", "amd64"]);
        cmd
    }

    fn archive(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.downloads.path().join(name);
        std::fs::write(&path, data).expect("failed to write archive");
        path
    }

    fn toolchain(&self, version: &str) -> PathBuf {
        let data = GoArchiveBuilder::minimal(&linux(), version).build_tar_gz();
        self.archive(&format!("{version}.linux-amd64.tar.gz"), &data)
    }

    fn install(&self, version: &str) {
        let archive = self.toolchain(&format!("go{version}"));
        self.cmd()
            .arg("install")
            .arg(version)
            .arg(&archive)
            .assert()
            .success();
    }
}

fn linux() -> TargetPlatform {
    TargetPlatform::new(Os::Linux, Arch::Amd64)
}

fn gopher_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("gopher");
    cmd.env_remove("GOPHER_ROOT").env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("invalid JSON output")
}

#[test]
fn test_version_flag() {
    gopher_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gopher"));
}

#[test]
fn test_help_flag() {
    gopher_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("uninstall"));
}

#[test]
fn test_install_tar_gz() {
    let env = Env::new();
    let archive = env.toolchain("go1.22.1");

    env.cmd()
        .arg("install")
        .arg("1.22.1")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed 1.22.1"));

    assert!(env.root.path().join("1.22.1/bin/go").is_file());
    assert!(env.root.path().join("1.22.1/.gopher-metadata").is_file());
}

#[test]
fn test_install_zip_json_output() {
    let env = Env::new();
    let data = GoArchiveBuilder::minimal(&linux(), "go1.22.1").build_zip();
    let archive = env.archive("go1.22.1.linux-amd64.zip", &data);

    let json = json_stdout(
        env.cmd()
            .arg("--json")
            .arg("install")
            .arg("1.22.1")
            .arg(&archive),
    );

    assert_eq!(json["status"], "success");
    assert_eq!(json["operation"], "install");
    assert_eq!(json["data"]["version"], "1.22.1");
    assert_eq!(json["data"]["files_extracted"], 2);
    assert_eq!(json["data"]["replaced"], false);
}

#[test]
fn test_reinstall_warns_about_replacement() {
    let env = Env::new();
    env.install("1.22.1");
    let archive = env.toolchain("go1.22.1");

    env.cmd()
        .arg("install")
        .arg("1.22.1")
        .arg(&archive)
        .assert()
        .success()
        .stderr(predicate::str::contains("replaced the existing installation"));
}

#[test]
fn test_install_traversal_archive_fails() {
    let env = Env::new();
    let data = GoArchiveBuilder::minimal(&linux(), "go1.22.1")
        .add_file("go/../../escape", b"pwned")
        .build_tar_gz();
    let archive = env.archive("evil.tar.gz", &data);

    env.cmd()
        .arg("install")
        .arg("1.22.1")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Security violation"))
        .stderr(predicate::str::contains("HINT"));

    assert!(!env.root.path().join("1.22.1").exists());
    assert!(!env.downloads.path().join("escape").exists());
}

#[test]
fn test_install_respects_max_file_size() {
    let env = Env::new();
    let data = GoArchiveBuilder::minimal(&linux(), "go1.22.1")
        .add_raw_file("go/pkg/big.a", 4096, &[0u8; 4096])
        .build_tar_gz();
    let archive = env.archive("go1.22.1.tar.gz", &data);

    env.cmd()
        .arg("install")
        .arg("1.22.1")
        .arg(&archive)
        .arg("--max-file-size")
        .arg("1K")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-file-size"));
}

#[test]
fn test_install_missing_prefix_hint() {
    let env = Env::new();
    let data = GoArchiveBuilder::new()
        .add_file("sdk/VERSION", b"go1.22.1")
        .add_file_with_mode("sdk/bin/go", b"go", 0o755)
        .build_tar_gz();
    let archive = env.archive("go1.22.1.tar.gz", &data);

    env.cmd()
        .arg("install")
        .arg("1.22.1")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not have required prefix"))
        .stderr(predicate::str::contains("--prefix"));

    env.cmd()
        .arg("install")
        .arg("1.22.1")
        .arg(&archive)
        .args(["--prefix", "sdk"])
        .assert()
        .success();
}

#[test]
fn test_install_prefix_normalized_and_validated() {
    let env = Env::new();
    let data = GoArchiveBuilder::new()
        .add_file("sdk/VERSION", b"go1.22.1")
        .add_file_with_mode("sdk/bin/go", b"go", 0o755)
        .build_tar_gz();
    let archive = env.archive("go1.22.1.tar.gz", &data);

    env.cmd()
        .arg("install")
        .arg("1.22.1")
        .arg(&archive)
        .args(["--prefix", "sdk/bin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrapper prefix must be a single path component"));
    assert!(!env.root.path().join("1.22.1").exists());

    env.cmd()
        .arg("install")
        .arg("1.22.1")
        .arg(&archive)
        .args(["--prefix", "sdk/"])
        .assert()
        .success();
    assert!(env.root.path().join("1.22.1/bin/go").is_file());
}

#[test]
fn test_install_msi_not_implemented() {
    let env = Env::new();
    let archive = env.archive("go1.22.1.windows-amd64.msi", b"\xd0\xcf\x11\xe0");

    env.cmd()
        .arg("install")
        .arg("1.22.1")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not implemented"));
}

#[test]
fn test_install_json_error() {
    let env = Env::new();
    let archive = env.archive("notes.txt", b"plain text");

    let json = json_stdout(
        env.cmd()
            .arg("--json")
            .arg("install")
            .arg("1.22.1")
            .arg(&archive),
    );

    assert_eq!(json["status"], "error");
    assert_eq!(json["operation"], "install");
    assert!(json["error"].as_str().unwrap().contains("unsupported archive format"));
}

#[test]
fn test_list_and_uninstall() {
    let env = Env::new();
    env.install("1.22.1");
    env.install("1.21.8");

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::eq("1.21.8\n1.22.1\n"));

    env.cmd()
        .arg("uninstall")
        .arg("1.21.8")
        .assert()
        .success()
        .stdout(predicate::str::contains("Uninstalled 1.21.8"));

    let json = json_stdout(env.cmd().arg("--json").arg("list"));
    assert_eq!(json["data"]["versions"], serde_json::json!(["1.22.1"]));
}

#[test]
fn test_list_empty_root() {
    let env = Env::new();

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No versions installed"));
}

#[test]
fn test_uninstall_missing_version() {
    let env = Env::new();

    env.cmd()
        .arg("uninstall")
        .arg("1.22.1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not installed"))
        .stderr(predicate::str::contains("gopher list"));
}

#[test]
fn test_which_prints_binary_path() {
    let env = Env::new();
    env.install("1.22.1");

    let output = env
        .cmd()
        .arg("which")
        .arg("1.22.1")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let printed = String::from_utf8(output).unwrap();
    assert!(Path::new(printed.trim()).ends_with("1.22.1/bin/go"));
}

#[test]
fn test_which_binary_not_found() {
    let env = Env::new();
    std::fs::create_dir_all(env.root.path().join("1.22.1")).unwrap();

    env.cmd()
        .arg("which")
        .arg("1.22.1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("go binary not found"));
}

#[test]
fn test_info_json() {
    let env = Env::new();
    env.install("1.22.1");

    let json = json_stdout(env.cmd().arg("--json").arg("info").arg("1.22.1"));

    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["version"], "1.22.1");
    assert_eq!(json["data"]["metadata"]["os"], "linux");
    assert_eq!(json["data"]["metadata"]["arch"], "amd64");
    assert!(json["data"]["disk_usage"].as_u64().unwrap() > 0);
    assert!(json["data"]["go_binary"].is_string());
}

#[test]
fn test_root_from_environment() {
    let env = Env::new();
    env.install("1.22.1");

    gopher_cmd()
        .env("GOPHER_ROOT", env.root.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.22.1"));
}

#[test]
fn test_unsafe_version_rejected() {
    let env = Env::new();
    let archive = env.toolchain("go1.22.1");

    env.cmd()
        .arg("install")
        .arg("1.22;rm")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("shell metacharacters"));
}

#[test]
fn test_completion_bash() {
    gopher_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gopher"));
}
