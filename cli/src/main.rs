//! `check_ppd_instance` binary
//!
//! Checks a running PPD and prints one status line with a matching exit code.

#![allow(unused_crate_dependencies)]

use clap::Parser;
use cli::{run_check, unknown, Args, CHECK_NAME};
use ppd_core::utils::{init_tracing, verbosity_level};
use ppd_core::{CancelToken, CheckResult, NagiosState, PpdProbe};
use std::process::ExitCode;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let result = CheckResult::new(NagiosState::Unknown, e.kind().to_string());
            eprint!("{}", e);
            println!("{}", result.line(CHECK_NAME));
            return ExitCode::from(result.exit_code() as u8);
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    if let Err(e) = init_tracing(verbosity_level(args.verbose)) {
        eprintln!("{}", e);
    }

    let result = check(&args).await;
    println!("{}", result.line(CHECK_NAME));
    // Exit codes are 0..=3
    ExitCode::from(result.exit_code() as u8)
}

async fn check(args: &Args) -> CheckResult {
    let config = match args.probe_config() {
        Ok(config) => config,
        Err(e) => return unknown(&e),
    };

    let cancel = CancelToken::new();
    spawn_signal_listener(cancel.clone());

    let probe = PpdProbe::new(config.clone());
    run_check(&probe, &config, args.min_version.as_ref(), &cancel).await
}

/// Cancel the probe on Ctrl+C, and on SIGTERM where available
fn spawn_signal_listener(cancel: CancelToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut term = match signal(SignalKind::terminate()) {
                Ok(term) => term,
                Err(e) => {
                    warn!("Failed to listen for SIGTERM: {}", e);
                    wait_ctrl_c().await;
                    cancel.cancel();
                    return;
                }
            };
            tokio::select! {
                _ = wait_ctrl_c() => {}
                _ = term.recv() => info!("Received SIGTERM, cancelling check..."),
            }
        }
        #[cfg(not(unix))]
        wait_ctrl_c().await;

        cancel.cancel();
    });
}

async fn wait_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, cancelling check..."),
        Err(e) => {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
