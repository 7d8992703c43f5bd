// SPF (§4.B "SPF (Dijkstra)"): shortest paths over the LSDB graph and
// next-hop derivation from the resulting predecessor map.

use std::collections::{BTreeSet, HashMap};

use crate::lsdb::Lsdb;
use crate::types::{RouterId, RoutingTable};

/// Dijkstra over the (possibly asymmetric) LSDB graph: nodes are LSDB
/// keys plus `self_id`; an edge `(u, v, c)` exists whenever `v` appears in
/// `LSDB[u].links` with cost `c`. Ties on cost break on the lower
/// `RouterId`, which falls out for free from ordering `(cost, RouterId)`
/// tuples in a `BTreeSet` frontier.
fn dijkstra(lsdb: &Lsdb, self_id: &RouterId) -> (HashMap<RouterId, u32>, HashMap<RouterId, RouterId>) {
    let mut dist: HashMap<RouterId, u32> = HashMap::new();
    let mut prev: HashMap<RouterId, RouterId> = HashMap::new();
    let mut visited: BTreeSet<RouterId> = BTreeSet::new();
    let mut frontier: BTreeSet<(u32, RouterId)> = BTreeSet::new();

    dist.insert(self_id.clone(), 0);
    frontier.insert((0, self_id.clone()));

    while let Some((d, u)) = frontier.iter().next().cloned() {
        frontier.remove(&(d, u.clone()));
        if !visited.insert(u.clone()) {
            continue;
        }

        let Some(entry) = lsdb.get(&u) else {
            continue;
        };
        for (v, &cost) in &entry.links {
            if visited.contains(v) {
                continue;
            }
            let candidate = d.saturating_add(cost);
            let improves = dist.get(v).map_or(true, |&cur| candidate < cur);
            if improves {
                dist.insert(v.clone(), candidate);
                prev.insert(v.clone(), u.clone());
                frontier.insert((candidate, v.clone()));
            }
        }
    }

    (dist, prev)
}

/// Walks the predecessor chain from each reachable destination back to
/// `self_id`; the node immediately adjacent to `self_id` on that chain is
/// the next hop. A chain that dead-ends (predecessor is absent) before
/// reaching `self_id` makes the destination unreachable. Can't actually
/// happen for anything present in `dist`, but it's handled rather than
/// unwrapped, since `dist` and `prev` are built separately.
fn next_hops(
    self_id: &RouterId,
    dist: &HashMap<RouterId, u32>,
    prev: &HashMap<RouterId, RouterId>,
) -> RoutingTable {
    let mut table = RoutingTable::new();

    for dest in dist.keys() {
        if dest == self_id {
            continue;
        }
        let mut cur = dest.clone();
        loop {
            match prev.get(&cur) {
                Some(p) if p == self_id => {
                    table.insert(dest.clone(), cur);
                    break;
                }
                Some(p) => cur = p.clone(),
                None => break,
            }
        }
    }

    table
}

/// Recomputes the routing table from scratch given the current LSDB and
/// the local router's id (§3 "RoutingTable: recomputed from scratch after
/// any LSDB mutation").
pub fn compute_routes(lsdb: &Lsdb, self_id: &RouterId) -> RoutingTable {
    let (dist, prev) = dijkstra(lsdb, self_id);
    next_hops(self_id, &dist, &prev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LsaPacket;
    use std::net::Ipv4Addr;

    fn inject(lsdb: &mut Lsdb, origin: &str, links: &[(&str, u32)]) {
        let packet = LsaPacket {
            origin: RouterId::from(origin),
            timestamp: 0.0,
            sequence: 1,
            advertised_ip: Ipv4Addr::new(10, 0, 0, 1),
            addresses: vec![Ipv4Addr::new(10, 0, 0, 1)],
            links: links.iter().map(|&(id, c)| (RouterId::from(id), c)).collect(),
        };
        lsdb.apply(&packet);
    }

    #[test]
    fn three_router_line() {
        // Scenario 1: A-B-C with costs 1 and 1.
        let mut lsdb = Lsdb::new();
        inject(&mut lsdb, "A", &[("B", 1)]);
        inject(&mut lsdb, "B", &[("A", 1), ("C", 1)]);
        inject(&mut lsdb, "C", &[("B", 1)]);

        let routes_a = compute_routes(&lsdb, &RouterId::from("A"));
        assert_eq!(routes_a.get(&RouterId::from("B")), Some(&RouterId::from("B")));
        assert_eq!(routes_a.get(&RouterId::from("C")), Some(&RouterId::from("B")));

        let routes_c = compute_routes(&lsdb, &RouterId::from("C"));
        assert_eq!(routes_c.get(&RouterId::from("A")), Some(&RouterId::from("B")));
        assert_eq!(routes_c.get(&RouterId::from("B")), Some(&RouterId::from("B")));
    }

    #[test]
    fn triangle_with_asymmetric_costs() {
        // Scenario 2: A-B=1, B-C=1, A-C=5. Path via B (cost 2) wins.
        let mut lsdb = Lsdb::new();
        inject(&mut lsdb, "A", &[("B", 1), ("C", 5)]);
        inject(&mut lsdb, "B", &[("A", 1), ("C", 1)]);
        inject(&mut lsdb, "C", &[("B", 1), ("A", 5)]);

        let routes_a = compute_routes(&lsdb, &RouterId::from("A"));
        assert_eq!(routes_a.get(&RouterId::from("B")), Some(&RouterId::from("B")));
        assert_eq!(routes_a.get(&RouterId::from("C")), Some(&RouterId::from("B")));
    }

    #[test]
    fn unconverged_lsdb_still_routes_to_directly_known_origins() {
        // Scenario 5: A's own LSA already advertises its link to B; B's
        // LSA in turn mentions C, which A has never heard of directly.
        // SPF must route to B but not yet to C (a bare placeholder).
        let mut lsdb = Lsdb::new();
        inject(&mut lsdb, "A", &[("B", 1)]);
        inject(&mut lsdb, "B", &[("C", 3)]);

        let routes = compute_routes(&lsdb, &RouterId::from("A"));
        assert_eq!(routes.get(&RouterId::from("B")), Some(&RouterId::from("B")));
        assert!(!routes.contains_key(&RouterId::from("C")));
        assert!(lsdb.get(&RouterId::from("C")).unwrap().sequence.is_placeholder());
    }

    #[test]
    fn routing_table_iterates_in_sorted_destination_order() {
        // Scenario 6: deterministic iteration order.
        let mut lsdb = Lsdb::new();
        inject(&mut lsdb, "A", &[("C", 1), ("B", 1), ("D", 1)]);
        inject(&mut lsdb, "B", &[("A", 1)]);
        inject(&mut lsdb, "C", &[("A", 1)]);
        inject(&mut lsdb, "D", &[("A", 1)]);

        let routes = compute_routes(&lsdb, &RouterId::from("A"));
        let dests: Vec<String> = routes.keys().map(|r| r.to_string()).collect();
        let mut sorted = dests.clone();
        sorted.sort();
        assert_eq!(dests, sorted);
    }

    #[test]
    fn unreachable_nodes_are_omitted() {
        let mut lsdb = Lsdb::new();
        inject(&mut lsdb, "A", &[("B", 1)]);
        // "island" router with no path back to A
        inject(&mut lsdb, "Island", &[]);

        let routes = compute_routes(&lsdb, &RouterId::from("A"));
        assert!(!routes.contains_key(&RouterId::from("Island")));
    }
}
