// Définitions des structures et enums partagées

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::net::Ipv4Addr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Opaque router identifier (e.g. `"router3"`). Topology-file and wire
/// format both carry it as a plain string, but we keep it a newtype so it
/// can't get mixed up with an interface address or a raw JSON field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouterId(pub String);

impl fmt::Display for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RouterId {
    fn from(s: &str) -> Self {
        RouterId(s.to_string())
    }
}

impl From<String> for RouterId {
    fn from(s: String) -> Self {
        RouterId(s)
    }
}

/// LSDB sequence number. `Placeholder` sorts below every real sequence,
/// so a freshly-discovered origin always loses to its first real LSA
/// without a magic integer buried in the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sequence {
    Placeholder,
    Number(u32),
}

impl Sequence {
    pub fn is_placeholder(self) -> bool {
        matches!(self, Sequence::Placeholder)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sequence::Placeholder => write!(f, "-1"),
            Sequence::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A locally-enumerated broadcast-capable interface.
#[derive(Debug, Clone)]
pub struct Interface {
    pub name: String,
    pub address: Ipv4Addr,
    pub broadcast: Ipv4Addr,
}

/// An entry in the local neighbor table. Cost comes from the static
/// topology file; the IP comes from HELLO. Kept separate and only joined
/// when building an outgoing LSA.
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub ip: Ipv4Addr,
    pub link_cost: u32,
    pub last_heard: u64,
}

/// One LSDB record, keyed externally by origin `RouterId`.
#[derive(Debug, Clone)]
pub struct LsdbEntry {
    pub sequence: Sequence,
    pub addresses: HashSet<Ipv4Addr>,
    pub links: HashMap<RouterId, u32>,
    pub last_update: u64,
}

impl LsdbEntry {
    /// A freshly-discovered origin we've only heard of through someone
    /// else's `links` map: sequence -1, nothing else known yet.
    pub fn placeholder() -> Self {
        LsdbEntry {
            sequence: Sequence::Placeholder,
            addresses: HashSet::new(),
            links: HashMap::new(),
            last_update: now(),
        }
    }
}

/// `destination RouterId -> next-hop RouterId`, recomputed from scratch
/// after every LSDB mutation.
pub type RoutingTable = std::collections::BTreeMap<RouterId, RouterId>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Packet {
    #[serde(rename = "HELLO")]
    Hello(HelloPacket),
    #[serde(rename = "LSA")]
    Lsa(LsaPacket),
    #[serde(rename = "QUERY")]
    Query(QueryPacket),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPacket {
    pub origin: RouterId,
    pub timestamp: f64,
    pub advertised_ip: Ipv4Addr,
    pub known_neighbors: Vec<RouterId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsaPacket {
    pub origin: RouterId,
    pub timestamp: f64,
    pub sequence: u32,
    pub advertised_ip: Ipv4Addr,
    pub addresses: Vec<Ipv4Addr>,
    pub links: HashMap<RouterId, u32>,
}

/// Ambient introspection query, answered by the receiver but never
/// flooded or applied to the LSDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryPacket {
    pub what: String,
}

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub fn now_f64() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
