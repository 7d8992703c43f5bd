// The shared mutable core behind one mutex: the LSDB, the derived
// RoutingTable, and the neighbor table live together so that
// `update + SPF + install` happens as one critical section. Socket
// sends never happen while the lock is held.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicU32, Ordering};

use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::config::StaticTopology;
use crate::lsdb::Lsdb;
use crate::route_install::RouteInstaller;
use crate::spf;
use crate::types::{now, now_f64, HelloPacket, Interface, LsaPacket, LsdbEntry, Neighbor, RouterId, RoutingTable};

struct RouterCore {
    lsdb: Lsdb,
    routing_table: RoutingTable,
    neighbors: HashMap<RouterId, Neighbor>,
}

pub struct Router {
    pub id: RouterId,
    pub interfaces: Vec<Interface>,
    topology: StaticTopology,
    installer: Box<dyn RouteInstaller>,
    core: Mutex<RouterCore>,
    /// Dedicated to self-origination: `forward` never reads or writes this.
    self_seq: AtomicU32,
}

impl Router {
    pub fn new(
        id: RouterId,
        interfaces: Vec<Interface>,
        topology: StaticTopology,
        installer: Box<dyn RouteInstaller>,
    ) -> Self {
        Router {
            id,
            interfaces,
            topology,
            installer,
            core: Mutex::new(RouterCore {
                lsdb: Lsdb::new(),
                routing_table: RoutingTable::new(),
                neighbors: HashMap::new(),
            }),
            self_seq: AtomicU32::new(0),
        }
    }

    /// HELLO handling (spec.md §4.E): refresh the neighbor table iff the
    /// static topology declares `(origin, self)` as an edge. Origins not
    /// adjacent in the topology file are logged and otherwise ignored —
    /// the topology file is authoritative for link existence and cost.
    pub async fn handle_hello(&self, packet: HelloPacket) {
        if packet.origin == self.id {
            return;
        }
        let Some(cost) = self.topology.cost_between(&self.id, &packet.origin) else {
            debug!("ignoring HELLO from non-adjacent origin {}", packet.origin);
            return;
        };

        let mut core = self.core.lock().await;
        let is_new = !core.neighbors.contains_key(&packet.origin);
        core.neighbors.insert(
            packet.origin.clone(),
            Neighbor {
                ip: packet.advertised_ip,
                link_cost: cost,
                last_heard: now(),
            },
        );
        if is_new {
            info!("new neighbor {} at {} (cost {})", packet.origin, packet.advertised_ip, cost);
        }
    }

    /// LSA handling (spec.md §4.E): accept iff strictly newer, recompute
    /// SPF, and install routes, all under the same lock acquisition.
    /// Returns whether the packet was accepted (the caller floods iff so).
    pub async fn handle_lsa(&self, packet: &LsaPacket) -> bool {
        if packet.origin == self.id {
            return false;
        }

        let (accepted, routing_table, lsdb_snapshot, neighbors_snapshot) = {
            let mut core = self.core.lock().await;
            if !core.lsdb.apply(packet) {
                return false;
            }
            core.routing_table = spf::compute_routes(&core.lsdb, &self.id);
            (
                true,
                core.routing_table.clone(),
                core.lsdb.entries().clone(),
                core.neighbors.clone(),
            )
        };

        if accepted {
            self.install_routes(&routing_table, &lsdb_snapshot, &neighbors_snapshot).await;
        }
        accepted
    }

    /// Builds this router's own LSA (spec.md §4.D steps 1-3): bumps the
    /// dedicated self-sequence counter, joins the neighbor-cost view with
    /// local interface addresses, and applies it to the local LSDB — this
    /// always succeeds since the counter only ever increases.
    pub async fn originate_self_lsa(&self) -> LsaPacket {
        let seq = self.self_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let addresses: Vec<Ipv4Addr> = self.interfaces.iter().map(|i| i.address).collect();

        let (packet, routing_table, lsdb_snapshot, neighbors_snapshot) = {
            let mut core = self.core.lock().await;
            let links: HashMap<RouterId, u32> = core
                .neighbors
                .iter()
                .map(|(id, n)| (id.clone(), n.link_cost))
                .collect();

            let packet = LsaPacket {
                origin: self.id.clone(),
                timestamp: now_f64(),
                sequence: seq,
                advertised_ip: addresses.first().copied().unwrap_or(Ipv4Addr::UNSPECIFIED),
                addresses,
                links,
            };

            core.lsdb.apply(&packet);
            core.routing_table = spf::compute_routes(&core.lsdb, &self.id);
            (
                packet,
                core.routing_table.clone(),
                core.lsdb.entries().clone(),
                core.neighbors.clone(),
            )
        };

        self.install_routes(&routing_table, &lsdb_snapshot, &neighbors_snapshot).await;
        packet
    }

    /// For each `(destination, next_hop)` resolves destination's LSDB
    /// addresses and the next hop's neighbor IP, and invokes
    /// `RouteInstaller::install` for every resulting pair (spec.md §6).
    /// Runs outside the core lock.
    async fn install_routes(
        &self,
        routing_table: &RoutingTable,
        lsdb: &HashMap<RouterId, LsdbEntry>,
        neighbors: &HashMap<RouterId, Neighbor>,
    ) {
        for (dest, next_hop) in routing_table {
            let Some(neighbor) = neighbors.get(next_hop) else {
                warn!("next hop {} for {} has no neighbor entry, skipping install", next_hop, dest);
                continue;
            };
            let Some(entry) = lsdb.get(dest) else { continue };
            for addr in &entry.addresses {
                if let Err(e) = self
                    .installer
                    .install(IpAddr::V4(*addr), IpAddr::V4(neighbor.ip))
                    .await
                {
                    warn!("failed to install route {} via {}: {}", addr, neighbor.ip, e);
                }
            }
        }
    }

    pub async fn known_neighbor_ids(&self) -> Vec<RouterId> {
        self.core.lock().await.neighbors.keys().cloned().collect()
    }

    /// Snapshot of `(neighbor id, neighbor ip)`, used by the LSAEmitter to
    /// address unicast sends and by split-horizon forwarding.
    pub async fn neighbor_ips(&self) -> Vec<(RouterId, Ipv4Addr)> {
        self.core
            .lock()
            .await
            .neighbors
            .iter()
            .map(|(id, n)| (id.clone(), n.ip))
            .collect()
    }

    pub async fn describe_neighbors(&self) -> String {
        let core = self.core.lock().await;
        if core.neighbors.is_empty() {
            return "no neighbors".to_string();
        }
        let mut lines: Vec<String> = core
            .neighbors
            .iter()
            .map(|(id, n)| format!("{} via {} cost {} last_heard {}", id, n.ip, n.link_cost, n.last_heard))
            .collect();
        lines.sort();
        lines.join("\n")
    }

    pub async fn describe_lsdb(&self) -> String {
        let core = self.core.lock().await;
        if core.lsdb.entries().is_empty() {
            return "empty LSDB".to_string();
        }
        let mut lines: Vec<String> = core
            .lsdb
            .entries()
            .iter()
            .map(|(origin, entry)| format!("{} seq={} links={:?}", origin, entry.sequence, entry.links))
            .collect();
        lines.sort();
        lines.join("\n")
    }

    pub async fn describe_routes(&self) -> String {
        let core = self.core.lock().await;
        if core.routing_table.is_empty() {
            return "no routes".to_string();
        }
        core.routing_table
            .iter()
            .map(|(dest, next_hop)| format!("{} -> {}", dest, next_hop))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
