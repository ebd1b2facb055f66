use std::{fs, sync::mpsc, thread};

use axum::{
    http::{header, StatusCode},
    routing::post,
    Router,
};
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag and an isolated
/// config directory
fn infrapilot_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("infrapilot").expect("Failed to find infrapilot binary");
    cmd.env("XDG_CONFIG_HOME", temp_dir.path())
        .env_remove("INFRAPILOT_BACKEND_URL")
        .env_remove("INFRAPILOT_TOKEN")
        .env_remove("INFRAPILOT_USER_ID")
        .arg("--no-color");
    cmd
}

/// Serves `body` with `status` on the plan endpoint from a background
/// runtime, returning the server's base URL.
fn spawn_plan_server(status: u16, body: &'static str) -> String {
    let (addr_tx, addr_rx) = mpsc::channel();

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build test runtime");
        runtime.block_on(async move {
            let app = Router::new().route(
                "/api/v1/agent/process",
                post(move || async move {
                    (
                        StatusCode::from_u16(status).unwrap(),
                        [(header::CONTENT_TYPE, "application/json")],
                        body,
                    )
                }),
            );
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind test server");
            addr_tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    let addr = addr_rx.recv().expect("Test server did not start");
    format!("http://{addr}")
}

const PLAN_BODY: &str = r#"{
    "mode": "dry-run",
    "confidence": 0.8,
    "action": "create_ec2_instance",
    "reasoning": "Look up an image, then launch.",
    "executionPlan": [
        {"id": "step-1", "name": "Get latest Ubuntu AMI", "description": "Find the image"},
        {"id": "step-2", "name": "Create new EC2 instance", "description": "Launch it"}
    ]
}"#;

#[test]
fn test_cli_help() {
    let temp_dir = create_cli_test_environment();

    infrapilot_cmd(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("tools"));
}

#[test]
fn test_cli_tools_defaults() {
    let temp_dir = create_cli_test_environment();

    infrapilot_cmd(&temp_dir)
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Tools"))
        .stdout(predicate::str::contains("- Create EC2 Key Pair: `create-key-pair`"))
        .stdout(predicate::str::contains("- Discover subnets in default VPC: `list-subnets`"));
}

#[test]
fn test_cli_tools_from_config_file() {
    let temp_dir = create_cli_test_environment();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "[tools]\n\"Create S3 bucket\" = \"create-s3-bucket\"\n").unwrap();

    infrapilot_cmd(&temp_dir)
        .args(["--config", config_path.to_str().unwrap(), "tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Create S3 bucket: `create-s3-bucket`"))
        .stdout(predicate::str::contains("create-key-pair").not());
}

#[test]
fn test_cli_invalid_config_file() {
    let temp_dir = create_cli_test_environment();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "backend_url = [").unwrap();

    infrapilot_cmd(&temp_dir)
        .args(["--config", config_path.to_str().unwrap(), "tools"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_cli_plan_success() {
    let temp_dir = create_cli_test_environment();
    let base_url = spawn_plan_server(200, PLAN_BODY);

    infrapilot_cmd(&temp_dir)
        .args(["--backend-url", &base_url, "plan", "create a t3.micro ec2 instance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# create_ec2_instance"))
        .stdout(predicate::str::contains("### 1. Get latest Ubuntu AMI"))
        .stdout(predicate::str::contains("### 2. Create new EC2 instance"))
        .stdout(predicate::str::contains("- Tool: `create-ec2-instance`"));
}

#[test]
fn test_cli_plan_backend_url_from_env() {
    let temp_dir = create_cli_test_environment();
    let base_url = spawn_plan_server(200, PLAN_BODY);

    infrapilot_cmd(&temp_dir)
        .env("INFRAPILOT_BACKEND_URL", &base_url)
        .args(["plan", "create a t3.micro ec2 instance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Mode: dry-run"));
}

#[test]
fn test_cli_plan_server_error() {
    let temp_dir = create_cli_test_environment();
    let base_url = spawn_plan_server(500, r#"{"detail": "boom"}"#);

    infrapilot_cmd(&temp_dir)
        .args(["--backend-url", &base_url, "plan", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to process agent request: boom"));
}

#[test]
fn test_cli_run_empty_plan() {
    let temp_dir = create_cli_test_environment();
    let base_url = spawn_plan_server(200, r#"{"action": "noop", "executionPlan": []}"#);

    infrapilot_cmd(&temp_dir)
        .args(["--backend-url", &base_url, "run", "do nothing", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to execute."));
}

#[test]
fn test_cli_run_declined() {
    let temp_dir = create_cli_test_environment();
    let base_url = spawn_plan_server(200, PLAN_BODY);

    infrapilot_cmd(&temp_dir)
        .args(["--backend-url", &base_url, "run", "create ec2 instance"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Execute 2 steps (dry-run)?"))
        .stdout(predicate::str::contains("Execution aborted."));
}

#[test]
fn test_cli_run_stream_unreachable() {
    let temp_dir = create_cli_test_environment();
    let base_url = spawn_plan_server(200, PLAN_BODY);
    let config_path = temp_dir.path().join("stream.toml");
    fs::write(
        &config_path,
        "stream_url = \"ws://127.0.0.1:1/ws/v1/agent/execute\"\nconnect_timeout_secs = 2\n",
    )
    .unwrap();

    infrapilot_cmd(&temp_dir)
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "--backend-url",
            &base_url,
            "--user-id",
            "u-1",
            "run",
            "create ec2 instance",
            "--yes",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("## Summary"))
        .stdout(predicate::str::contains("- Steps: 0/2 completed"))
        .stderr(predicate::str::contains("Execution stream failed"));
}

#[test]
fn test_cli_run_without_identity() {
    let temp_dir = create_cli_test_environment();
    let base_url = spawn_plan_server(200, PLAN_BODY);

    infrapilot_cmd(&temp_dir)
        .args(["--backend-url", &base_url, "run", "create ec2 instance", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to get authentication token"));
}
