// Entry point: reads startup configuration, assembles the Router, spawns
// the HelloEmitter/LSAEmitter/PacketReceiver workers, and waits for a
// termination signal (spec.md §5, §6).

use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info};

use lsrouted::config::{Settings, StaticTopology};
use lsrouted::{init, tasks};

const TOPOLOGY_FILE: &str = "conex_rede.csv";

#[tokio::main]
async fn main() -> ExitCode {
    init::init_logging();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("startup failed: {}", e);
            return ExitCode::from(1);
        }
    };

    let topology = match StaticTopology::load(TOPOLOGY_FILE) {
        Ok(t) => t,
        Err(e) => {
            error!("startup failed: cannot load {}: {}", TOPOLOGY_FILE, e);
            return ExitCode::from(1);
        }
    };

    let router = Arc::new(init::init_router(&settings, topology));
    info!(
        "router {} starting on port {} ({} local interfaces)",
        settings.router_id,
        settings.control_port,
        router.interfaces.len()
    );

    let socket = match init::init_socket(settings.control_port).await {
        Ok(s) => s,
        Err(e) => {
            error!("startup failed: cannot bind control socket: {}", e);
            return ExitCode::from(1);
        }
    };

    let workers = tasks::spawn(socket, Arc::clone(&router), &settings);

    if let Err(e) = wait_for_shutdown_signal().await {
        error!("unrecoverable error waiting for shutdown signal: {}", e);
        workers.shutdown();
        return ExitCode::from(2);
    }

    info!("shutting down");
    workers.shutdown();
    ExitCode::SUCCESS
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
