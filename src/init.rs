// Startup helpers: logging, the control socket, and assembling the
// `Router` from `Settings` + the static topology + the local interface
// list (spec.md §6 "Startup environment").

use std::sync::Arc;

use tokio::net::UdpSocket;

use crate::config::{Settings, StaticTopology};
use crate::error::Result;
use crate::iface;
use crate::route_install::{NetRouteInstaller, RouteInstaller};
use crate::router::Router;

pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
}

pub async fn init_socket(port: u16) -> Result<Arc<UdpSocket>> {
    let socket = Arc::new(UdpSocket::bind(format!("0.0.0.0:{}", port)).await?);
    socket.set_broadcast(true)?;
    Ok(socket)
}

/// Builds the shared `Router` from startup configuration. `installer`
/// defaults to `NetRouteInstaller`; tests and multi-instance-on-one-host
/// setups construct a `Router` directly with `NullRouteInstaller` instead.
pub fn init_router(settings: &Settings, topology: StaticTopology) -> Router {
    let interfaces = iface::enumerate_broadcast_interfaces();
    let installer: Box<dyn RouteInstaller> = Box::new(NetRouteInstaller);
    Router::new(settings.router_id.clone(), interfaces, topology, installer)
}
