//! Check plugin tests: arguments, probe, and evaluation together

mod common;

use async_trait::async_trait;
use clap::Parser;
use cli::{run_check, Args, CHECK_NAME};
use common::{run_with_timeout, spawn_eager_ppd, spawn_fake_ppd};
use ppd_core::health::{HealthError, PjdRequest};
use ppd_core::{CancelToken, NagiosState, PpdProbe, Probe, ProbeOutcome};
use std::io::Write;
use std::time::Duration;

/// Probe double that returns a fixed result
struct FixedProbe(fn() -> Result<ProbeOutcome, HealthError>);

#[async_trait]
impl Probe for FixedProbe {
    async fn probe(&self, _cancel: &CancelToken) -> Result<ProbeOutcome, HealthError> {
        (self.0)()
    }
}

fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["check_ppd_instance"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).expect("args")
}

#[tokio::test]
async fn test_healthy_ppd_is_ok() {
    let request_len = PjdRequest::info(1).encode().len();
    let port = spawn_fake_ppd(request_len, b"PJD-OK v2.1\n").await;

    let args = args(&["-H", "127.0.0.1", "-P", &port.to_string(), "-t", "5", "--min-version", "2.0"]);
    let config = args.probe_config().expect("config");
    let probe = PpdProbe::new(config.clone());

    let result = run_with_timeout(
        Duration::from_secs(10),
        run_check(&probe, &config, args.min_version.as_ref(), &CancelToken::new()),
    )
    .await;

    assert_eq!(result.state, NagiosState::Ok);
    assert_eq!(
        result.line(CHECK_NAME),
        format!("PPD_INSTANCE OK - PPD on '127.0.0.1' port {} seems to be okay.", port)
    );
}

#[tokio::test]
async fn test_ppd_replying_without_reading_is_ok() {
    let port = spawn_eager_ppd(b"PJD-OK v2.1\n").await;

    let args = args(&["-H", "127.0.0.1", "-P", &port.to_string(), "-t", "5", "--min-version", "2.0"]);
    let config = args.probe_config().expect("config");
    let probe = PpdProbe::new(config.clone());

    let result = run_with_timeout(
        Duration::from_secs(10),
        run_check(&probe, &config, args.min_version.as_ref(), &CancelToken::new()),
    )
    .await;

    assert_eq!(result.state, NagiosState::Ok, "{}", result.message);
}

#[tokio::test]
async fn test_outdated_ppd_is_warning() {
    let request_len = PjdRequest::info(3).encode().len();
    let port = spawn_fake_ppd(request_len, b"PJD-OK v2.1\n").await;

    let args = args(&["-H", "127.0.0.1", "-P", &port.to_string(), "-J", "3", "--min-version", "3.0"]);
    let config = args.probe_config().expect("config");
    let probe = PpdProbe::new(config.clone());

    let result = run_with_timeout(
        Duration::from_secs(10),
        run_check(&probe, &config, args.min_version.as_ref(), &CancelToken::new()),
    )
    .await;

    assert_eq!(result.state, NagiosState::Warning);
    assert_eq!(result.exit_code(), 1);
}

#[tokio::test]
async fn test_missing_ppd_is_critical() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        listener.local_addr().expect("local addr").port()
    };

    let args = args(&["-H", "127.0.0.1", "-P", &port.to_string()]);
    let config = args.probe_config().expect("config");
    let probe = PpdProbe::new(config.clone());

    let result = run_check(&probe, &config, None, &CancelToken::new()).await;

    assert_eq!(result.state, NagiosState::Critical);
    assert_eq!(result.exit_code(), 2);
    assert!(result.message.contains("seems not to listen"), "{}", result.message);
}

#[tokio::test]
async fn test_resolution_failure_is_unknown() {
    let probe = FixedProbe(|| {
        Err(HealthError::Resolution {
            host: "ppd.invalid".to_string(),
            port: 8073,
            source: std::io::Error::other("Name or service not known"),
        })
    });
    let config = args(&["-H", "ppd.invalid"]).probe_config().expect("config");

    let result = run_check(&probe, &config, None, &CancelToken::new()).await;

    assert_eq!(result.state, NagiosState::Unknown);
    assert_eq!(result.exit_code(), 3);
    assert!(result.message.contains("ppd.invalid"), "{}", result.message);
}

#[tokio::test]
async fn test_cancelled_is_unknown() {
    let probe = FixedProbe(|| Ok(ProbeOutcome::Cancelled));
    let config = args(&["-H", "ppd01"]).probe_config().expect("config");

    let result = run_check(&probe, &config, None, &CancelToken::new()).await;

    assert_eq!(result.line(CHECK_NAME), "PPD_INSTANCE UNKNOWN - Check cancelled by signal.");
}

#[test]
fn test_config_file_with_flag_overrides() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(
        file,
        "host = \"ppd-from-file\"\nport = 9100\ntimeout = 12.0\nbufferSize = 4096"
    )
    .expect("write config");
    let path = file.path().to_str().expect("utf-8 path").to_string();

    let config = args(&["--config", &path, "-P", "9200"]).probe_config().expect("config");

    assert_eq!(config.host, "ppd-from-file");
    assert_eq!(config.port, 9200);
    assert_eq!(config.timeout, 12.0);
    assert_eq!(config.buffer_size, 4096);
}
