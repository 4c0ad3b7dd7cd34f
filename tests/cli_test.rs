//! CLI integration tests
//! Run with: cargo test --test cli_test

use std::path::Path;
use std::process::{Command, Output};

fn cs2pm(workdir: &Path, registry: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cs2pm"))
        .args(args)
        .current_dir(workdir)
        .env("CS2PM_REGISTRY_PATH", registry)
        .env_remove("CS2PM_MANIFEST")
        .env_remove("CS2PM_JOBS")
        .env_remove("CS2PM_DOWNLOAD_TIMEOUT")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Should run cs2pm binary")
}

fn write_registry_entry(registry: &Path, name: &str, files: &[&str]) {
    let dir = registry.join("registry");
    std::fs::create_dir_all(&dir).unwrap();

    let mut yaml = format!(
        "name: {name}\ndescription: {name} plugin\ndownloadUrl: http://127.0.0.1:9/{name}.zip\nextractPrefix: game\nuninstall:\n  files:\n"
    );
    for file in files {
        yaml.push_str(&format!("    - {}\n", file));
    }
    yaml.push_str("  directories: []\n");
    std::fs::write(dir.join(format!("{}.yaml", name)), yaml).unwrap();
}

fn read_manifest(workdir: &Path) -> String {
    std::fs::read_to_string(workdir.join("cs2pm.yaml")).unwrap()
}

#[test]
fn test_manifest_lifecycle() {
    let work = tempfile::tempdir().unwrap();
    let registry = tempfile::tempdir().unwrap();
    write_registry_entry(registry.path(), "metamod", &["game/addons/metamod.vdf"]);

    let out = cs2pm(work.path(), registry.path(), &["init"]);
    assert!(out.status.success(), "init failed: {:?}", out);

    let out = cs2pm(work.path(), registry.path(), &["init"]);
    assert!(!out.status.success(), "second init should refuse to clobber");

    let out = cs2pm(work.path(), registry.path(), &["install", "metamod"]);
    assert!(out.status.success(), "install <name> failed: {:?}", out);
    let after_add = read_manifest(work.path());
    assert!(after_add.contains("name: metamod"));
    assert!(after_add.contains("downloadUrl:"));

    // Duplicate add is rejected and leaves the manifest as it was
    let out = cs2pm(work.path(), registry.path(), &["add", "metamod"]);
    assert!(!out.status.success());
    assert_eq!(read_manifest(work.path()), after_add);

    let out = cs2pm(work.path(), registry.path(), &["list"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("metamod - metamod plugin"));

    // Removing an unknown name is a successful no-op
    let out = cs2pm(work.path(), registry.path(), &["remove", "nothing"]);
    assert!(out.status.success());
    assert_eq!(read_manifest(work.path()), after_add);

    let out = cs2pm(work.path(), registry.path(), &["remove", "metamod"]);
    assert!(out.status.success());
    assert!(!read_manifest(work.path()).contains("metamod"));
}

#[test]
fn test_unknown_registry_plugin_fails() {
    let work = tempfile::tempdir().unwrap();
    let registry = tempfile::tempdir().unwrap();

    assert!(cs2pm(work.path(), registry.path(), &["init"]).status.success());
    let out = cs2pm(work.path(), registry.path(), &["add", "missing"]);
    assert!(!out.status.success());
}

#[test]
fn test_missing_manifest_fails() {
    let work = tempfile::tempdir().unwrap();
    let registry = tempfile::tempdir().unwrap();

    let out = cs2pm(work.path(), registry.path(), &["install"]);
    assert!(!out.status.success());
}

#[test]
fn test_uninstall_removes_declared_paths() {
    let work = tempfile::tempdir().unwrap();
    let registry = tempfile::tempdir().unwrap();
    let server = tempfile::tempdir().unwrap();

    write_registry_entry(registry.path(), "a", &["addons/a.so", "cfg/a.cfg"]);
    write_registry_entry(registry.path(), "b", &["addons/b.so", "never-installed.txt"]);

    for rel in ["addons/a.so", "cfg/a.cfg", "addons/b.so", "addons/other.so", "cfg/server.cfg"] {
        let path = server.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, rel).unwrap();
    }

    assert!(cs2pm(work.path(), registry.path(), &["init"]).status.success());
    assert!(cs2pm(work.path(), registry.path(), &["add", "a"]).status.success());
    assert!(cs2pm(work.path(), registry.path(), &["add", "b"]).status.success());

    let dir = server.path().to_str().unwrap();
    let out = cs2pm(work.path(), registry.path(), &["uninstall", "--dir", dir]);
    assert!(out.status.success(), "uninstall failed: {:?}", out);

    for gone in ["addons/a.so", "cfg/a.cfg", "addons/b.so"] {
        assert!(!server.path().join(gone).exists(), "{} should be removed", gone);
    }
    for kept in ["addons/other.so", "cfg/server.cfg"] {
        assert!(server.path().join(kept).exists(), "{} should be kept", kept);
    }

    let out = cs2pm(work.path(), registry.path(), &["uninstall", "ghost", "--dir", dir]);
    assert!(!out.status.success(), "uninstalling a plugin not in the manifest should fail");
}

#[test]
fn test_rust_log_controls_output() {
    let registry = tempfile::tempdir().unwrap();
    let run_init = |level: &str| {
        let work = tempfile::tempdir().unwrap();
        let out = Command::new(env!("CARGO_BIN_EXE_cs2pm"))
            .args(["init"])
            .current_dir(work.path())
            .env("CS2PM_REGISTRY_PATH", registry.path())
            .env_remove("CS2PM_MANIFEST")
            .env("RUST_LOG", level)
            .output()
            .expect("Should run cs2pm binary");
        assert!(out.status.success(), "init failed: {:?}", out);
        format!("{}{}", String::from_utf8_lossy(&out.stdout), String::from_utf8_lossy(&out.stderr))
    };

    assert!(run_init("info").contains("Created"));
    assert!(!run_init("error").contains("Created"));
}
