// Fonctions utilitaires réseau et helpers

use std::net::SocketAddr;

use log::debug;

use crate::error::{AppError, Result};
use crate::types::Packet;

/// Sends a wire packet as a JSON UDP datagram. Takes the one wire enum
/// (`Packet`) rather than any serializable type: everything that goes out
/// on this socket is HELLO, LSA, or QUERY.
pub async fn send_packet(
    socket: &tokio::net::UdpSocket,
    addr: SocketAddr,
    packet: &Packet,
    log_prefix: &str,
) -> Result<()> {
    let serialized = serde_json::to_vec(packet)?;
    if serialized.len() > 4096 {
        // No fragmentation: each packet must fit in one datagram. A
        // topology large enough to hit this is a deployment error, not a
        // runtime one.
        return Err(AppError::NetworkError(format!(
            "{} packet for {} is {} bytes, exceeds the 4096-byte datagram limit",
            log_prefix,
            addr,
            serialized.len()
        )));
    }

    socket
        .send_to(&serialized, addr)
        .await
        .map_err(|e| AppError::NetworkError(format!("send to {} failed: {}", addr, e)))?;

    debug!("{} sent to {}", log_prefix, addr);
    Ok(())
}

pub async fn send_text_response(
    socket: &tokio::net::UdpSocket,
    addr: SocketAddr,
    response: &str,
) -> Result<()> {
    socket
        .send_to(response.as_bytes(), addr)
        .await
        .map_err(|e| AppError::NetworkError(format!("failed to send response to {}: {}", addr, e)))?;
    Ok(())
}
