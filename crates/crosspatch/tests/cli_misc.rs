use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::str::contains;
use tempfile::TempDir;

fn crosspatch() -> Command {
    Command::new(cargo::cargo_bin!("crosspatch"))
}

#[test]
fn init_writes_default_config() {
    let td = TempDir::new().expect("temp");

    crosspatch()
        .current_dir(td.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("crosspatch.toml"));

    let text = std::fs::read_to_string(td.path().join("crosspatch.toml")).unwrap();
    assert!(text.contains("[defaults]"));
    assert!(text.contains("[weights]"));
    assert!(text.contains("[thresholds]"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let td = TempDir::new().expect("temp");
    std::fs::write(td.path().join("crosspatch.toml"), "# mine\n").unwrap();

    crosspatch()
        .current_dir(td.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(contains("--force"));

    crosspatch()
        .current_dir(td.path())
        .arg("init")
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn validate_accepts_the_generated_config() {
    let td = TempDir::new().expect("temp");

    crosspatch().current_dir(td.path()).arg("init").assert().success();

    crosspatch()
        .current_dir(td.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(contains("is valid"));
}

#[test]
fn validate_rejects_unordered_thresholds() {
    let td = TempDir::new().expect("temp");
    std::fs::write(
        td.path().join("bad.toml"),
        "[thresholds]\nidentical = 0.5\nsimilar = 0.8\npartial = 0.9\n",
    )
    .unwrap();

    crosspatch()
        .current_dir(td.path())
        .arg("validate")
        .arg("--config")
        .arg("bad.toml")
        .assert()
        .code(1)
        .stdout(contains("thresholds"));
}

#[test]
fn validate_rejects_zero_weights() {
    let td = TempDir::new().expect("temp");
    std::fs::write(
        td.path().join("bad.toml"),
        "[weights]\npaths = 0.0\nadded = 0.0\nremoved = 0.0\n",
    )
    .unwrap();

    crosspatch()
        .current_dir(td.path())
        .arg("validate")
        .arg("--config")
        .arg("bad.toml")
        .assert()
        .code(1)
        .stdout(contains("weights"));
}

#[test]
fn validate_without_config_fails_with_hint() {
    let td = TempDir::new().expect("temp");

    crosspatch()
        .current_dir(td.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(contains("crosspatch.toml"));
}

#[test]
fn compare_honors_config_distro_labels() {
    let td = TempDir::new().expect("temp");
    let dir = td.path();

    std::fs::write(
        dir.join("crosspatch.toml"),
        "[defaults]\ndistro_a = \"opensuse\"\ndistro_b = \"alpine\"\n",
    )
    .unwrap();
    std::fs::create_dir_all(dir.join("a")).unwrap();
    std::fs::create_dir_all(dir.join("b")).unwrap();

    crosspatch()
        .current_dir(dir)
        .arg("compare")
        .arg("--package")
        .arg("pkg")
        .arg("--patches-a")
        .arg("a")
        .arg("--patches-b")
        .arg("b")
        .assert()
        .success()
        .stdout(contains("(opensuse/alpine)"));
}
