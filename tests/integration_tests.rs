//! Integration tests for nuxi-docker
//!
//! These run the built binary. Nothing here needs docker: routed commands
//! either use `--dry-run` or a fake compose script that records its argv.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a nuxi-docker Command with a predictable environment
fn nuxi_docker() -> Command {
    let mut cmd = cargo_bin_cmd!("nuxi-docker");
    for var in [
        "NUXI_DOCKER_COMPOSE",
        "NUXI_DOCKER_TEMPLATES",
        "NUXI_DOCKER_LOG",
        "POSTGRES_USER",
        "POSTGRES_PASSWORD",
        "POSTGRES_DATABASE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Helper to create a temporary project directory
fn create_temp_project() -> TempDir {
    TempDir::new().unwrap()
}

/// Helper to create a project that already has the docker setup
fn installed_project() -> TempDir {
    let dir = create_temp_project();
    nuxi_docker()
        .current_dir(dir.path())
        .arg("install")
        .assert()
        .success();
    dir
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_flag_help() {
        nuxi_docker()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--dry-run"));
    }

    #[test]
    fn test_version() {
        nuxi_docker()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_help_verb_lists_routes() {
        let dir = create_temp_project();
        nuxi_docker()
            .current_dir(dir.path())
            .arg("help")
            .assert()
            .success()
            .stdout(predicate::str::contains("nuxi-build"))
            .stdout(predicate::str::contains("psql"))
            .stdout(predicate::str::contains("anything else is proxied to docker compose"));
    }

    #[test]
    fn test_no_arguments_prints_usage() {
        nuxi_docker()
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Usage: nuxi-docker"));
    }

    #[test]
    fn test_missing_compose_file() {
        let dir = create_temp_project();
        nuxi_docker()
            .current_dir(dir.path())
            .env("NUXI_DOCKER_COMPOSE", "docker-compose")
            .args(["up", "-d"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains(
                "Unable to find Docker Compose file: 'docker-compose.yml'",
            ));
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = installed_project();
        fs::write(dir.path().join("nuxi-docker.toml"), "unknown_key = 1\n").unwrap();
        nuxi_docker()
            .current_dir(dir.path())
            .env("NUXI_DOCKER_COMPOSE", "docker-compose")
            .args(["--dry-run", "ps"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("nuxi-docker.toml"));
    }
}

// =============================================================================
// Install Tests
// =============================================================================

mod install {
    use super::*;

    #[test]
    fn test_install_writes_setup() {
        let dir = create_temp_project();
        nuxi_docker()
            .current_dir(dir.path())
            .arg("install")
            .assert()
            .success()
            .stdout(predicate::str::contains("docker-compose.yml"));

        assert!(dir.path().join("docker-compose.yml").is_file());
        assert!(dir.path().join("Dockerfile").is_file());
        let env = fs::read_to_string(dir.path().join(".env")).unwrap();
        assert!(env.contains("POSTGRES_USER="));
    }

    #[test]
    fn test_install_twice_refuses_and_changes_nothing() {
        let dir = installed_project();
        fs::write(dir.path().join(".env"), "EDITED=1\n").unwrap();

        nuxi_docker()
            .current_dir(dir.path())
            .arg("install")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("already exists"));

        assert_eq!(fs::read_to_string(dir.path().join(".env")).unwrap(), "EDITED=1\n");
    }

    #[test]
    fn test_install_keeps_existing_env() {
        let dir = create_temp_project();
        fs::write(dir.path().join(".env"), "MINE=1\n").unwrap();

        nuxi_docker()
            .current_dir(dir.path())
            .arg("install")
            .assert()
            .success()
            .stdout(predicate::str::contains("left unchanged"));

        assert_eq!(fs::read_to_string(dir.path().join(".env")).unwrap(), "MINE=1\n");
    }

    #[test]
    fn test_install_from_template_directory() {
        let templates = create_temp_project();
        for name in ["docker-compose.yml", "Dockerfile", "env.example"] {
            fs::write(templates.path().join(name), format!("# custom {}\n", name)).unwrap();
        }
        let dir = create_temp_project();

        nuxi_docker()
            .current_dir(dir.path())
            .env("NUXI_DOCKER_TEMPLATES", templates.path())
            .arg("install")
            .assert()
            .success();

        assert_eq!(
            fs::read_to_string(dir.path().join(".env")).unwrap(),
            "# custom env.example\n"
        );
    }

    #[test]
    fn test_install_respects_project_dir_flag() {
        let dir = create_temp_project();
        let elsewhere = create_temp_project();

        nuxi_docker()
            .current_dir(elsewhere.path())
            .arg("--project-dir")
            .arg(dir.path())
            .arg("install")
            .assert()
            .success();

        assert!(dir.path().join("docker-compose.yml").is_file());
        assert!(!elsewhere.path().join("docker-compose.yml").exists());
    }
}

// =============================================================================
// Dry-run Routing Tests
// =============================================================================

mod dry_run {
    use super::*;

    fn dry(dir: &TempDir, args: &[&str]) -> assert_cmd::assert::Assert {
        nuxi_docker()
            .current_dir(dir.path())
            .env("NUXI_DOCKER_COMPOSE", "docker-compose")
            .arg("--dry-run")
            .args(args)
            .assert()
    }

    #[test]
    fn test_passthrough() {
        let dir = installed_project();
        dry(&dir, &["up", "-d"])
            .success()
            .stdout("docker-compose -f docker-compose.yml up -d\n");
    }

    #[test]
    fn test_nuxi_verb_forwards_flags() {
        let dir = installed_project();
        dry(&dir, &["dev", "--port", "3000"])
            .success()
            .stdout("docker-compose -f docker-compose.yml exec nuxt-app npx nuxi dev --port 3000\n");
    }

    #[test]
    fn test_nuxi_build_alias() {
        let dir = installed_project();
        dry(&dir, &["nuxi-build", "--prerender"])
            .success()
            .stdout("docker-compose -f docker-compose.yml exec nuxt-app npx nuxi build --prerender\n");
    }

    #[test]
    fn test_binary_proxy() {
        let dir = installed_project();
        dry(&dir, &["npm", "install", "-D", "vitest"])
            .success()
            .stdout("docker-compose -f docker-compose.yml exec nuxt-app npm install -D vitest\n");
    }

    #[test]
    fn test_shell() {
        let dir = installed_project();
        dry(&dir, &["shell"])
            .success()
            .stdout("docker-compose -f docker-compose.yml exec nuxt-app /bin/sh\n");
    }

    #[test]
    fn test_postgres_shell() {
        let dir = installed_project();
        dry(&dir, &["postgres", "bash"])
            .success()
            .stdout("docker-compose -f docker-compose.yml exec postgres /bin/sh\n");
    }

    #[test]
    fn test_psql_reads_credentials_from_dotenv() {
        let dir = installed_project();
        dry(&dir, &["psql"]).success().stdout(
            "docker-compose -f docker-compose.yml exec postgres bash -c 'PGPASSWORD=nuxt psql -U nuxt nuxt'\n",
        );
    }

    #[test]
    fn test_psql_without_credentials() {
        let dir = installed_project();
        fs::write(dir.path().join(".env"), "POSTGRES_PASSWORD=secret\n").unwrap();
        dry(&dir, &["psql"])
            .code(2)
            .stderr(predicate::str::contains("POSTGRES_USER"));
    }

    #[test]
    fn test_custom_service_names_from_config() {
        let dir = installed_project();
        fs::write(
            dir.path().join("nuxi-docker.toml"),
            "[services]\napp = \"web\"\n",
        )
        .unwrap();
        dry(&dir, &["node", "-v"])
            .success()
            .stdout("docker-compose -f docker-compose.yml exec web node -v\n");
    }

    #[test]
    fn test_init_prints_bootstrap_command() {
        let dir = create_temp_project();
        dry(&dir, &["init", "myproj"])
            .success()
            .stdout(predicate::str::contains("PROJECT_DIRECTORY=myproj"))
            .stdout(predicate::str::contains("run nuxt-app-init"));
        assert!(!dir.path().join("myproj").exists());
        assert!(!dir.path().join(".nuxi-docker.init.yml").exists());
    }

    #[test]
    fn test_init_rejects_escaping_directory() {
        let dir = create_temp_project();
        dry(&dir, &["init", "../outside"])
            .code(2)
            .stderr(predicate::str::contains("Invalid project directory"));
    }
}

// =============================================================================
// Execution Tests (fake compose binary)
// =============================================================================

#[cfg(unix)]
mod execution {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    const FAKE_COMPOSE: &str = r#"#!/bin/sh
echo "$@" >> "$FAKE_COMPOSE_LOG"
case "$*" in
  *" ps -q") printf '%s' "$FAKE_PS_OUTPUT"; exit 0 ;;
esac
exit "${FAKE_EXIT:-0}"
"#;

    struct Fake {
        _bin: TempDir,
        script: PathBuf,
        log: PathBuf,
    }

    impl Fake {
        fn new() -> Self {
            let bin = TempDir::new().unwrap();
            let script = bin.path().join("fake-compose");
            fs::write(&script, FAKE_COMPOSE).unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
            let log = bin.path().join("calls.log");
            Self {
                _bin: bin,
                script,
                log,
            }
        }

        fn command(&self, dir: &TempDir) -> Command {
            let mut cmd = nuxi_docker();
            cmd.current_dir(dir.path())
                .env("NUXI_DOCKER_COMPOSE", &self.script)
                .env("FAKE_COMPOSE_LOG", &self.log)
                .env("FAKE_PS_OUTPUT", "0123456789ab\n");
            cmd
        }

        fn calls(&self) -> Vec<String> {
            fs::read_to_string(&self.log)
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[test]
    fn test_exec_checks_liveness_then_runs() {
        let dir = installed_project();
        let fake = Fake::new();

        fake.command(&dir).args(["dev", "-o"]).assert().success();

        assert_eq!(
            fake.calls(),
            vec![
                "-f docker-compose.yml ps -q",
                "-f docker-compose.yml exec nuxt-app npx nuxi dev -o",
            ]
        );
    }

    #[test]
    fn test_stopped_environment() {
        let dir = installed_project();
        let fake = Fake::new();

        fake.command(&dir)
            .env("FAKE_PS_OUTPUT", "")
            .arg("dev")
            .assert()
            .code(3)
            .stderr(predicate::str::contains("The container is not running."));

        assert_eq!(fake.calls(), vec!["-f docker-compose.yml ps -q"]);
    }

    #[test]
    fn test_passthrough_skips_liveness() {
        let dir = installed_project();
        let fake = Fake::new();

        fake.command(&dir)
            .env("FAKE_PS_OUTPUT", "")
            .args(["up", "-d"])
            .assert()
            .success();

        assert_eq!(fake.calls(), vec!["-f docker-compose.yml up -d"]);
    }

    #[test]
    fn test_child_exit_code_propagates() {
        let dir = installed_project();
        let fake = Fake::new();

        fake.command(&dir)
            .env("FAKE_EXIT", "7")
            .args(["logs", "nuxt-app"])
            .assert()
            .code(7)
            .stderr(predicate::str::contains("failed to execute this command"))
            .stderr(predicate::str::contains("logs nuxt-app"));
    }

    #[test]
    fn test_init_failure_copies_nothing() {
        let dir = create_temp_project();
        let fake = Fake::new();

        fake.command(&dir)
            .env("FAKE_EXIT", "5")
            .args(["init", "myproj"])
            .assert()
            .code(5);

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].ends_with("run nuxt-app-init"), "{}", calls[0]);
        assert!(!dir.path().join("myproj").exists());
        assert!(!dir.path().join(".nuxi-docker.init.yml").exists());
    }

    #[test]
    fn test_init_without_created_directory() {
        let dir = create_temp_project();
        let fake = Fake::new();

        fake.command(&dir)
            .args(["init", "myproj"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("was not created"));
    }

    #[test]
    fn test_init_copies_templates_after_scaffold() {
        let dir = create_temp_project();
        fs::create_dir(dir.path().join("myproj")).unwrap();
        let fake = Fake::new();

        fake.command(&dir)
            .args(["init", "myproj"])
            .assert()
            .success()
            .stdout(predicate::str::contains("init complete!"));

        let project = dir.path().join("myproj");
        assert!(project.join("docker-compose.yml").is_file());
        assert!(project.join("Dockerfile").is_file());
        assert!(project.join(".env").is_file());
        assert!(!dir.path().join(".nuxi-docker.init.yml").exists());
    }
}
