// The boundary between the protocol engine and whatever actually
// programs the host's forwarding table. Kept as a trait so the protocol
// core stays independent of how routes actually get installed.

use std::net::IpAddr;

use async_trait::async_trait;
use log::{debug, warn};

use crate::error::{AppError, Result};

#[async_trait]
pub trait RouteInstaller: Send + Sync {
    /// Installs a host route `destination via next_hop`. Idempotent:
    /// repeated calls with the same arguments succeed without change.
    async fn install(&self, destination: IpAddr, next_hop: IpAddr) -> Result<()>;
}

/// Installs routes into the real host forwarding table via `net-route`:
/// skips loopback or unspecified gateways, and falls back to delete+add
/// if a plain replace-by-add fails (e.g. a stale route with a different
/// gateway).
pub struct NetRouteInstaller;

#[async_trait]
impl RouteInstaller for NetRouteInstaller {
    async fn install(&self, destination: IpAddr, next_hop: IpAddr) -> Result<()> {
        if next_hop.is_loopback() || next_hop.is_unspecified() {
            debug!("skipping route to {} via invalid gateway {}", destination, next_hop);
            return Ok(());
        }

        let handle = net_route::Handle::new()
            .map_err(|e| AppError::RouteError(format!("cannot open routing handle: {}", e)))?;
        let route = net_route::Route::new(destination, host_prefix(destination)).with_gateway(next_hop);

        match handle.add(&route).await {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!("route add for {} failed ({}), retrying as delete+add", destination, e);
                let _ = handle.delete(&route).await;
                handle.add(&route).await.map_err(|e2| {
                    warn!("failed to install route {} via {}: {}", destination, next_hop, e2);
                    AppError::RouteError(format!("route install failed: {}", e2))
                })
            }
        }
    }
}

fn host_prefix(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

/// No-op installer used by tests and by any instance run without
/// permission (or need) to touch the host's forwarding table.
pub struct NullRouteInstaller;

#[async_trait]
impl RouteInstaller for NullRouteInstaller {
    async fn install(&self, destination: IpAddr, next_hop: IpAddr) -> Result<()> {
        debug!("(null installer) route {} via {}", destination, next_hop);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_installer_always_succeeds() {
        let installer = NullRouteInstaller;
        let dest: IpAddr = "10.0.0.5".parse().unwrap();
        let hop: IpAddr = "10.0.0.1".parse().unwrap();
        assert!(installer.install(dest, hop).await.is_ok());
        // Idempotent: calling twice with the same args is still fine.
        assert!(installer.install(dest, hop).await.is_ok());
    }
}
