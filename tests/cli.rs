use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Fixture {
    temp: TempDir,
    live: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let live = temp.path().join("saves");
        fs::create_dir_all(live.join("slot1")).unwrap();
        fs::write(live.join("slot1").join("game.sav"), "v1").unwrap();
        Self { temp, live }
    }

    fn root(&self) -> PathBuf {
        self.temp.path().join("root")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("savepoint").unwrap();
        cmd.env_remove("SAVEPOINT_ROOT")
            .env_remove("RUST_LOG")
            .arg("--root")
            .arg(self.root());
        cmd
    }

    fn register(&self, name: &str) {
        self.cmd()
            .args(["target", "add", name])
            .arg(&self.live)
            .assert()
            .success();
    }

    fn seed(&self, target: &str, names: &[&str]) {
        for name in names {
            fs::write(self.root().join(target).join(name), "not a real package").unwrap();
        }
    }
}

fn snapshot_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".zip"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_register_and_list_targets() {
    let fx = Fixture::new();
    fx.register("game");

    fx.cmd()
        .args(["target", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("game"));

    fx.cmd()
        .args(["target", "show", "game"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshots: 0"));
}

#[test]
fn test_rejects_path_traversal_name() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["target", "add", ".."])
        .arg(&fx.live)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_backup_then_restore() {
    let fx = Fixture::new();
    fx.register("game");

    fx.cmd()
        .args(["backup", "game"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshot created"));
    let snapshots = snapshot_files(&fx.root().join("game"));
    assert_eq!(snapshots.len(), 1);

    fs::write(fx.live.join("slot1").join("game.sav"), "v2").unwrap();

    // without --force nothing changes
    fx.cmd()
        .args(["restore", "game", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert_eq!(
        fs::read_to_string(fx.live.join("slot1").join("game.sav")).unwrap(),
        "v2"
    );

    fx.cmd()
        .args(["restore", "game", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete"));
    assert_eq!(
        fs::read_to_string(fx.live.join("slot1").join("game.sav")).unwrap(),
        "v1"
    );
}

#[test]
fn test_verbose_logs_progress_lines() {
    let fx = Fixture::new();
    fx.register("game");

    fx.cmd()
        .args(["backup", "game"])
        .assert()
        .success()
        .stderr(predicate::str::contains("game.sav").not());

    fs::write(fx.live.join("slot1").join("game.sav"), "v2").unwrap();
    // a second backup in the same second retries on the next timestamp
    fx.cmd()
        .args(["-v", "backup", "game"])
        .assert()
        .success()
        .stderr(predicate::str::contains("game.sav"));
}

#[test]
fn test_register_rejects_file_source() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["target", "add", "game"])
        .arg(fx.live.join("slot1").join("game.sav"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_list_is_newest_first() {
    let fx = Fixture::new();
    fx.register("game");
    fx.seed(
        "game",
        &[
            "20240101120000.zip",
            "20240101120005.zip",
            "20240102000000.zip",
        ],
    );

    fx.cmd()
        .args(["list", "game"])
        .assert()
        .success()
        .stdout(
            "20240102000000.zip [newest]\n20240101120005.zip\n20240101120000.zip\n",
        );
}

#[test]
fn test_delete_respects_retention() {
    let fx = Fixture::new();
    fx.register("game");
    fx.seed(
        "game",
        &[
            "20240101120000.zip",
            "20240101120005.zip",
            "20240102000000.zip",
        ],
    );

    fx.cmd()
        .args(["delete", "game", "20240102000000.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("the first save cannot be deleted"));

    fx.cmd()
        .args(["delete", "game", "20240101120005.zip"])
        .assert()
        .success();

    fx.cmd()
        .args(["prune", "game", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 snapshot(s)"));
    assert_eq!(
        snapshot_files(&fx.root().join("game")),
        vec!["20240102000000.zip"]
    );

    fx.cmd()
        .args(["prune", "game", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no save to be deleted"));
}

#[test]
fn test_unknown_target_fails() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["backup", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Target not found: ghost"));
}

#[test]
fn test_config_init_writes_settings() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Timestamp attempts: 3"));
    assert!(fx.root().join("settings.json").exists());
}
