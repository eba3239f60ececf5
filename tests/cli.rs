//! End-to-end tests driving the wasmkit binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

// Every test spawns processes and some write scripts they then exec; running
// them one at a time avoids ETXTBSY from a concurrent fork.

fn wasmkit(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wasmkit").unwrap();
    cmd.env_remove("WASMKIT_PROJECT_DIR")
        .arg("--no-color")
        .arg("-C")
        .arg(project);
    cmd
}

fn game_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("src")).unwrap();
    fs::create_dir_all(temp_dir.path().join("pub")).unwrap();
    temp_dir
}

#[test]
#[serial]
fn help_lists_commands() {
    Command::cargo_bin("wasmkit")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("setup"));
}

#[test]
#[serial]
fn clean_removes_existing_output_dir() {
    let project = game_project();
    let target = project.path().join("target").join("wasm32-unknown-unknown");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("game.wasm"), [0u8; 8]).unwrap();

    wasmkit(project.path()).arg("clean").assert().success();

    assert!(!project.path().join("target").exists());
}

#[test]
#[serial]
fn clean_without_output_dir_is_not_an_error() {
    let project = game_project();

    wasmkit(project.path())
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
#[serial]
fn clean_dry_run_keeps_files() {
    let project = game_project();
    fs::create_dir_all(project.path().join("target")).unwrap();

    wasmkit(project.path())
        .args(["clean", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN]"));

    assert!(project.path().join("target").exists());
}

#[test]
#[serial]
fn invalid_config_reports_hint() {
    let project = game_project();
    fs::write(project.path().join("Wasmkit.toml"), "[server]\nport = \"eighty\"\n").unwrap();

    wasmkit(project.path())
        .arg("clean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("HINT:"));
}

#[test]
#[serial]
fn build_without_toolchain_fails_with_hint() {
    let project = game_project();
    let empty_bin = TempDir::new().unwrap();

    wasmkit(project.path())
        .env("PATH", empty_bin.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing tool: cargo"));
}

#[cfg(unix)]
mod fake_toolchain {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// A `cargo` stand-in that logs `<cwd> <args>` and exits with $FAKE_CARGO_EXIT
    struct FakeCargo {
        bin_dir: TempDir,
        log: PathBuf,
    }

    impl FakeCargo {
        fn install() -> Self {
            let bin_dir = TempDir::new().unwrap();
            let log = bin_dir.path().join("invocations.log");
            let script = bin_dir.path().join("cargo");
            fs::write(
                &script,
                "#!/bin/sh\necho \"$PWD $*\" >> \"$FAKE_CARGO_LOG\"\nexit \"${FAKE_CARGO_EXIT:-0}\"\n",
            )
            .unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

            // keep setup from touching a real rustup installation
            let rustup = bin_dir.path().join("rustup");
            fs::write(&rustup, "#!/bin/sh\nexit 0\n").unwrap();
            fs::set_permissions(&rustup, fs::Permissions::from_mode(0o755)).unwrap();

            Self { bin_dir, log }
        }

        fn path_env(&self) -> std::ffi::OsString {
            let mut paths = vec![self.bin_dir.path().to_path_buf()];
            if let Some(existing) = std::env::var_os("PATH") {
                paths.extend(std::env::split_paths(&existing));
            }
            std::env::join_paths(paths).unwrap()
        }

        fn command(&self, project: &Path) -> Command {
            let mut cmd = wasmkit(project);
            cmd.env("PATH", self.path_env())
                .env("FAKE_CARGO_LOG", &self.log);
            cmd
        }

        fn invocations(&self) -> Vec<String> {
            fs::read_to_string(&self.log)
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[test]
    #[serial]
    fn default_build_invokes_release_toolchain_once() {
        let project = game_project();
        let cargo = FakeCargo::install();

        cargo
            .command(project.path())
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("Build mode = Release"))
            .stdout(predicate::str::contains("Build complete!"));

        let invocations = cargo.invocations();
        assert_eq!(invocations.len(), 1);
        let line = &invocations[0];
        assert!(line.contains("web build --color always --verbose --release --target wasm32-unknown-unknown"));
        let cwd = line.split(' ').next().unwrap();
        assert!(cwd.ends_with("/src"), "unexpected working directory: {}", cwd);
    }

    #[test]
    #[serial]
    fn debug_build_in_any_casing_drops_release_flag() {
        let project = game_project();
        let cargo = FakeCargo::install();

        cargo
            .command(project.path())
            .args(["build", "DeBuG"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Build mode = Debug"));

        let invocations = cargo.invocations();
        assert_eq!(invocations.len(), 1);
        assert!(!invocations[0].contains("--release"));
        assert!(invocations[0].contains("--target wasm32-unknown-unknown"));
    }

    #[test]
    #[serial]
    fn flag_like_or_extra_build_arguments_still_build() {
        let project = game_project();
        let cargo = FakeCargo::install();

        cargo
            .command(project.path())
            .args(["build", "--release"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Build mode = Release"));

        cargo
            .command(project.path())
            .args(["build", "debug", "now"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Build mode = Debug"));

        let invocations = cargo.invocations();
        assert_eq!(invocations.len(), 2);
        assert!(invocations[0].contains("--release"));
        assert!(!invocations[1].contains("--release"));
    }

    #[test]
    #[serial]
    fn build_cleans_previous_output_first() {
        let project = game_project();
        let stale = project.path().join("target").join("stale.js");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();
        let cargo = FakeCargo::install();

        cargo.command(project.path()).arg("build").assert().success();

        assert!(!stale.exists());
    }

    #[test]
    #[serial]
    fn failed_build_propagates_exit_code() {
        let project = game_project();
        let cargo = FakeCargo::install();

        cargo
            .command(project.path())
            .env("FAKE_CARGO_EXIT", "3")
            .arg("build")
            .assert()
            .code(3)
            .stdout(predicate::str::contains("returned: 3"))
            .stdout(predicate::str::contains("Build complete!").not());
    }

    #[test]
    #[serial]
    fn setup_survives_failing_plugin_install() {
        let project = game_project();
        let cargo = FakeCargo::install();

        cargo
            .command(project.path())
            .env("FAKE_CARGO_EXIT", "101")
            .arg("setup")
            .assert()
            .success()
            .stderr(predicate::str::contains("may already be installed"));

        assert_eq!(cargo.invocations().len(), 1);
        assert!(cargo.invocations()[0].ends_with("install cargo-web"));
    }
}
