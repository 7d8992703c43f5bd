// PacketReceiver (§4.E): binds the control socket, demultiplexes inbound
// datagrams to HELLO/LSA/QUERY handling. A single bad datagram is logged
// and dropped, never fatal (spec.md §7 "every worker's outer loop MUST be
// exception-safe").

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, warn};
use tokio::net::UdpSocket;

use crate::lsa;
use crate::net_utils::send_text_response;
use crate::router::Router;
use crate::types::Packet;

const MAX_DATAGRAM: usize = 4096;

pub async fn run(socket: Arc<UdpSocket>, router: Arc<Router>, port: u16) {
    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        let (len, src) = match socket.recv_from(&mut buf).await {
            Ok(pair) => pair,
            Err(e) => {
                error!("recvfrom failed: {}", e);
                continue;
            }
        };

        let packet: Packet = match serde_json::from_slice(&buf[..len]) {
            Ok(p) => p,
            Err(e) => {
                debug!("dropping malformed datagram from {}: {}", src, e);
                continue;
            }
        };

        match packet {
            Packet::Hello(hello_packet) => {
                router.handle_hello(hello_packet).await;
            }
            Packet::Lsa(lsa_packet) => {
                if router.handle_lsa(&lsa_packet).await {
                    lsa::forward(&socket, &router, &lsa_packet, lsa_packet.advertised_ip, port).await;
                }
            }
            Packet::Query(query) => {
                handle_query(&socket, &router, src, &query.what).await;
            }
        }
    }
}

async fn handle_query(socket: &UdpSocket, router: &Router, src: SocketAddr, what: &str) {
    let response = match what {
        "neighbors" => router.describe_neighbors().await,
        "lsdb" => router.describe_lsdb().await,
        "routes" => router.describe_routes().await,
        other => format!("unknown query: {}", other),
    };
    if let Err(e) = send_text_response(socket, src, &response).await {
        warn!("failed to send QUERY response to {}: {}", src, e);
    }
}
