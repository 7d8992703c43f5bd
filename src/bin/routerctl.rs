// routerctl: a read-only introspection CLI for a running daemon. Sends a
// single QUERY datagram and prints the text response.

use std::io::{self, Write};
use std::net::UdpSocket;
use std::time::Duration;

use lsrouted::types::{Packet, QueryPacket};

fn help() {
    println!("Available queries:");
    println!("  neighbors  - list the neighbor table");
    println!("  lsdb       - dump the link-state database");
    println!("  routes     - dump the routing table");
    println!("  exit       - quit routerctl");
}

fn main() -> io::Result<()> {
    print!("Router address [127.0.0.1]: ");
    io::stdout().flush()?;
    let mut host = String::new();
    io::stdin().read_line(&mut host)?;
    let host = host.trim();
    let host = if host.is_empty() { "127.0.0.1" } else { host };

    print!("Control port [5000]: ");
    io::stdout().flush()?;
    let mut port = String::new();
    io::stdin().read_line(&mut port)?;
    let port: u16 = port.trim().parse().unwrap_or(5000);

    let addr = format!("{}:{}", host, port);
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.set_read_timeout(Some(Duration::from_secs(3)))?;

    println!("\nrouterctl connected to {}", addr);
    help();

    loop {
        print!("\n> ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let command = input.trim();

        match command {
            "exit" => break,
            "help" => {
                help();
                continue;
            }
            "" => continue,
            _ => {}
        }

        let query = Packet::Query(QueryPacket { what: command.to_string() });
        let payload = match serde_json::to_vec(&query) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("failed to encode query: {}", e);
                continue;
            }
        };

        if let Err(e) = socket.send_to(&payload, &addr) {
            eprintln!("failed to send query: {}", e);
            continue;
        }

        let mut buf = [0u8; 4096];
        match socket.recv_from(&mut buf) {
            Ok((len, _)) => println!("{}", String::from_utf8_lossy(&buf[..len])),
            Err(e) => eprintln!("no response: {}", e),
        }
    }

    Ok(())
}
