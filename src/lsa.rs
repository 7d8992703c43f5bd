// Periodic self-origination plus on-demand flooding. `forward` never
// touches the self-sequence counter; only `Router::originate_self_lsa`
// does.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use log::error;
use tokio::net::UdpSocket;

use crate::net_utils::send_packet;
use crate::router::Router;
use crate::types::{LsaPacket, Packet};

/// Ticks every `interval`: originates a self-LSA and unicasts it to every
/// currently-known neighbor.
pub async fn run(socket: Arc<UdpSocket>, router: Arc<Router>, port: u16, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let packet = router.originate_self_lsa().await;
        let wire = Packet::Lsa(packet);
        for (neighbor_id, ip) in router.neighbor_ips().await {
            let addr = SocketAddr::new(ip.into(), port);
            if let Err(e) = send_packet(&socket, addr, &wire, "LSA").await {
                error!("failed to send LSA to neighbor {} ({}): {}", neighbor_id, addr, e);
            }
        }
    }
}

/// Floods an accepted LSA to every neighbor except the one it came from,
/// split-horizon by source IP. If `except_ip` does not match any
/// currently-known neighbor, the packet is not forwarded at all:
/// guessing which neighbor to exclude would risk reflecting it straight
/// back to its sender.
pub async fn forward(socket: &UdpSocket, router: &Router, packet: &LsaPacket, except_ip: Ipv4Addr, port: u16) {
    let neighbors = router.neighbor_ips().await;
    if !neighbors.iter().any(|(_, ip)| *ip == except_ip) {
        log::debug!(
            "not forwarding LSA from {}: sender ip {} matches no known neighbor",
            packet.origin,
            except_ip
        );
        return;
    }

    let wire = Packet::Lsa(packet.clone());
    for (neighbor_id, ip) in neighbors {
        if ip == except_ip {
            continue;
        }
        let addr = SocketAddr::new(ip.into(), port);
        if let Err(e) = send_packet(socket, addr, &wire, "LSA-forward").await {
            error!("failed to forward LSA to neighbor {} ({}): {}", neighbor_id, addr, e);
        }
    }
}
