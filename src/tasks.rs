// Spawns the concurrent workers (spec.md §5): HelloEmitter, LSAEmitter,
// PacketReceiver, one each, sharing the control socket and the `Router`.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::router::Router;
use crate::{hello, lsa, receiver};

pub struct Workers {
    pub hello: JoinHandle<()>,
    pub lsa: JoinHandle<()>,
    pub receiver: JoinHandle<()>,
}

pub fn spawn(socket: Arc<UdpSocket>, router: Arc<Router>, settings: &Settings) -> Workers {
    let port = settings.control_port;

    let hello = {
        let socket = Arc::clone(&socket);
        let router = Arc::clone(&router);
        let interval = Duration::from_secs(settings.hello_interval_secs);
        tokio::spawn(async move { hello::run(socket, router, port, interval).await })
    };

    let lsa = {
        let socket = Arc::clone(&socket);
        let router = Arc::clone(&router);
        let interval = Duration::from_secs(settings.lsa_interval_secs);
        tokio::spawn(async move { lsa::run(socket, router, port, interval).await })
    };

    let receiver = {
        let socket = Arc::clone(&socket);
        let router = Arc::clone(&router);
        tokio::spawn(async move { receiver::run(socket, router, port).await })
    };

    Workers { hello, lsa, receiver }
}

/// Stops emitters before the receiver, per spec.md §5's shutdown
/// ordering ("stop emitters before closing the receive socket, to avoid
/// logging spurious socket-closed errors").
impl Workers {
    pub fn shutdown(self) {
        self.hello.abort();
        self.lsa.abort();
        self.receiver.abort();
    }
}
