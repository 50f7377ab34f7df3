//! Integration tests for depchain

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn depchain() -> Command {
        let mut cmd = cargo_bin_cmd!("depchain");
        cmd.env_remove("DEPCHAIN_CONFIG").env_remove("RUST_LOG");
        cmd
    }

    /// Chain file with three projects, a pinned commit and an explicit root
    fn write_chain(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("depchain.toml");
        let content = format!(
            r#"
[general]
generator = "Ninja"
install_root = "{root}"

[[project]]
url = "https://github.com/bluekyu/panda3d-thirdparty.git"
branch = "develop"

[[project]]
url = "https://github.com/bluekyu/panda3d.git"
commit = "0123abcd"

[[project]]
url = "https://github.com/jbeder/yaml-cpp.git"
depends_on = []
"#,
            root = dir.join("install").display().to_string().replace('\\', "/")
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        depchain()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("incremental builds"));
    }

    #[test]
    fn version_displays() {
        depchain()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("depchain"));
    }

    #[test]
    fn missing_chain_file_fails() {
        let dir = TempDir::new().unwrap();
        depchain()
            .current_dir(dir.path())
            .arg("status")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration file not found"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn plan_prints_processing_order() {
        let dir = TempDir::new().unwrap();
        let chain = write_chain(dir.path());

        depchain()
            .args(["plan", "--format", "plain", "--config"])
            .arg(&chain)
            .assert()
            .success()
            .stdout(predicate::eq("panda3d-thirdparty\npanda3d\nyaml-cpp\n"));
    }

    #[test]
    fn plan_json_has_edges() {
        let dir = TempDir::new().unwrap();
        let chain = write_chain(dir.path());

        let output = depchain()
            .args(["plan", "--format", "json"])
            .env("DEPCHAIN_CONFIG", &chain)
            .output()
            .unwrap();
        assert!(output.status.success());

        let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(plan[1]["project"], "panda3d");
        assert_eq!(plan[1]["selector"], "@0123abcd");
        assert_eq!(plan[1]["depends_on"][0], "panda3d-thirdparty");
        assert_eq!(plan[2]["depends_on"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn status_reads_hash_records() {
        let dir = TempDir::new().unwrap();
        let chain = write_chain(dir.path());
        std::fs::create_dir_all(dir.path().join("install")).unwrap();
        std::fs::write(dir.path().join("install/panda3d.hash"), "0123abcdef\n").unwrap();

        depchain()
            .args(["status", "--format", "plain", "--config"])
            .arg(&chain)
            .assert()
            .success()
            .stdout(predicate::str::contains("panda3d 0123abcdef"))
            .stdout(predicate::str::contains("yaml-cpp -"));
    }

    #[test]
    fn invalidate_removes_hash_record() {
        let dir = TempDir::new().unwrap();
        let chain = write_chain(dir.path());
        let record = dir.path().join("install/yaml-cpp.hash");
        std::fs::create_dir_all(record.parent().unwrap()).unwrap();
        std::fs::write(&record, "feedface\n").unwrap();

        depchain()
            .args(["invalidate", "yaml-cpp", "--config"])
            .arg(&chain)
            .assert()
            .success();

        assert!(!record.exists());
    }

    #[test]
    fn invalidate_unknown_project_fails() {
        let dir = TempDir::new().unwrap();
        let chain = write_chain(dir.path());

        depchain()
            .args(["invalidate", "zlib", "--config"])
            .arg(&chain)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown project: zlib"));
    }

    #[test]
    fn build_rejects_unknown_target() {
        let dir = TempDir::new().unwrap();
        let chain = write_chain(dir.path());

        depchain()
            .args(["build", "zlib", "--config"])
            .arg(&chain)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown project: zlib"));
    }

    #[test]
    fn invalid_chain_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let chain = dir.path().join("depchain.toml");
        std::fs::write(
            &chain,
            "[[project]]\nurl = \"https://x/a.git\"\nbranch = \"main\"\ncommit = \"abc\"\n",
        )
        .unwrap();

        depchain()
            .args(["plan", "--config"])
            .arg(&chain)
            .assert()
            .failure()
            .stderr(predicate::str::contains("mutually exclusive"));
    }
}
