// Periodic broadcast beacons: one tick loop iterating over every
// broadcast-capable interface each tick, sharing a single interval rather
// than spawning a task per interface.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::error;
use tokio::net::UdpSocket;

use crate::net_utils::send_packet;
use crate::router::Router;
use crate::types::{now_f64, HelloPacket, Packet};

pub async fn run(socket: Arc<UdpSocket>, router: Arc<Router>, port: u16, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let known_neighbors = router.known_neighbor_ids().await;

        for iface in &router.interfaces {
            let packet = Packet::Hello(HelloPacket {
                origin: router.id.clone(),
                timestamp: now_f64(),
                advertised_ip: iface.address,
                known_neighbors: known_neighbors.clone(),
            });
            let addr = SocketAddr::new(iface.broadcast.into(), port);
            if let Err(e) = send_packet(&socket, addr, &packet, "HELLO").await {
                error!("failed to send HELLO on {}: {}", iface.name, e);
            }
        }
    }
}
