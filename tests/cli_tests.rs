use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{rht, setup_config_dir, setup_test_db};

/// Nothing listens on the discard port, so every request is refused.
const UNREACHABLE: &str = "http://127.0.0.1:9";

#[test]
fn test_help_lists_commands() {
    rht()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("login"))
        .stdout(contains("sessions"))
        .stdout(contains("admin"));
}

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");
    let conf = setup_config_dir("cli_init");

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
    // test mode leaves the config dir alone
    assert!(!conf.join("rhourtracker.conf").exists());
}

#[test]
fn test_init_writes_config_file() {
    let db_path = setup_test_db("cli_init_conf");
    let conf = setup_config_dir("cli_init_conf");

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["--db", &db_path, "init"])
        .assert()
        .success()
        .stdout(contains("Config file"));

    let written = fs::read_to_string(conf.join("rhourtracker.conf")).unwrap();
    assert!(written.contains("server_url"));
    assert!(written.contains("poll_idle_secs"));
}

#[test]
fn test_log_print_shows_init_and_migrations() {
    let db_path = setup_test_db("cli_log");
    let conf = setup_config_dir("cli_log");

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("init"));
}

#[test]
fn test_status_without_identity() {
    let db_path = setup_test_db("cli_status");
    let conf = setup_config_dir("cli_status");

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["--db", &db_path, "--server", UNREACHABLE, "status"])
        .assert()
        .success()
        .stdout(contains("Not signed in on this machine"));
}

#[test]
fn test_in_without_identity_fails() {
    let db_path = setup_test_db("cli_in");
    let conf = setup_config_dir("cli_in");

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["--db", &db_path, "--server", UNREACHABLE, "in"])
        .assert()
        .failure()
        .stderr(contains("login <password>"));
}

#[test]
fn test_login_against_unreachable_server() {
    let db_path = setup_test_db("cli_login");
    let conf = setup_config_dir("cli_login");

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["--db", &db_path, "--server", UNREACHABLE, "login", "ada-pw"])
        .assert()
        .failure()
        .stderr(contains("Transport error"));

    // nothing was remembered
    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["--db", &db_path, "--server", UNREACHABLE, "status"])
        .assert()
        .success()
        .stdout(contains("Not signed in"));
}

#[test]
fn test_out_rejects_zero_correction() {
    let db_path = setup_test_db("cli_out_zero");
    let conf = setup_config_dir("cli_out_zero");

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args([
            "--db",
            &db_path,
            "--server",
            UNREACHABLE,
            "out",
            "-n",
            "built robot",
            "--hours",
            "0",
            "--minutes",
            "0",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid input"));
}

#[test]
fn test_out_requires_note_argument() {
    rht()
        .args(["out"])
        .assert()
        .failure()
        .stderr(contains("--note"));
}

#[test]
fn test_admin_time_rejects_bad_minutes() {
    let db_path = setup_test_db("cli_admin_time");
    let conf = setup_config_dir("cli_admin_time");

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args([
            "--db",
            &db_path,
            "--server",
            UNREACHABLE,
            "admin",
            "time",
            "--user",
            "ada-pw",
            "--end",
            "1741626000",
            "--minutes",
            "ten",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid input").and(contains("minutes")));
}

#[test]
fn test_config_print_and_check_without_file() {
    let conf = setup_config_dir("cli_config_print");

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("server_url"))
        .stdout(contains("getuserdata.php"));

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("No configuration file"));
}

#[test]
fn test_config_migrate_adds_missing_fields() {
    let conf = setup_config_dir("cli_config_migrate");
    let file = conf.join("rhourtracker.conf");
    fs::write(&file, "server_url: http://tracker.example\n").unwrap();

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("poll_active_secs"));

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["config", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Added missing fields"));

    let content = fs::read_to_string(&file).unwrap();
    assert!(content.contains("http://tracker.example"));
    assert!(content.contains("poll_idle_secs"));
    assert!(content.contains("change_session_time"));

    rht()
        .env("RHOURTRACKER_CONFIG_DIR", &conf)
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("complete"));
}
