// Wire-format checks that only make sense against the public API, rather
// than internal-module tests (those live in each module's `#[cfg(test)]`
// block, as in `lsdb.rs` / `spf.rs` / `config.rs`).

use lsrouted::types::{HelloPacket, LsaPacket, Packet, RouterId};
use std::collections::HashMap;
use std::net::Ipv4Addr;

#[test]
fn hello_packet_round_trips_through_json() {
    let packet = Packet::Hello(HelloPacket {
        origin: RouterId::from("router2"),
        timestamp: 1700000000.0,
        advertised_ip: Ipv4Addr::new(10, 1, 0, 1),
        known_neighbors: vec![RouterId::from("router0"), RouterId::from("router3")],
    });

    let json = serde_json::to_string(&packet).unwrap();
    assert!(json.contains("\"type\":\"HELLO\""));

    let decoded: Packet = serde_json::from_str(&json).unwrap();
    match decoded {
        Packet::Hello(h) => {
            assert_eq!(h.origin, RouterId::from("router2"));
            assert_eq!(h.known_neighbors.len(), 2);
        }
        _ => panic!("expected HELLO"),
    }
}

#[test]
fn lsa_packet_matches_the_documented_wire_shape() {
    let mut links = HashMap::new();
    links.insert(RouterId::from("router0"), 4);
    links.insert(RouterId::from("router3"), 2);

    let packet = LsaPacket {
        origin: RouterId::from("router2"),
        timestamp: 1700000000.0,
        sequence: 7,
        advertised_ip: Ipv4Addr::new(10, 1, 0, 1),
        addresses: vec![Ipv4Addr::new(10, 1, 0, 1), Ipv4Addr::new(192, 168, 3, 1)],
        links,
    };
    let wire = Packet::Lsa(packet);
    let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&wire).unwrap()).unwrap();

    assert_eq!(json["type"], "LSA");
    assert_eq!(json["sequence"], 7);
    assert_eq!(json["links"]["router0"], 4);
}

#[test]
fn unknown_packet_type_fails_to_parse() {
    let raw = r#"{"type":"PING","origin":"router0"}"#;
    let result: Result<Packet, _> = serde_json::from_str(raw);
    assert!(result.is_err());
}

#[test]
fn missing_required_field_fails_to_parse() {
    // HELLO without `advertised_ip`.
    let raw = r#"{"type":"HELLO","origin":"router0","timestamp":0.0,"known_neighbors":[]}"#;
    let result: Result<Packet, _> = serde_json::from_str(raw);
    assert!(result.is_err());
}
