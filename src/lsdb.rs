// LSDB (§3, §4.B): per-origin link-state records with sequence-number
// monotonicity. This type owns only the mutation rule; the mutual
// exclusion discipline and the SPF trigger live one layer up in
// `router.rs`, so that `update + SPF + install` can share one critical
// section (§5) without this type knowing anything about locks.

use std::collections::{HashMap, HashSet};

use crate::types::{now, LsaPacket, LsdbEntry, RouterId, Sequence};

#[derive(Debug, Default)]
pub struct Lsdb {
    entries: HashMap<RouterId, LsdbEntry>,
}

impl Lsdb {
    pub fn new() -> Self {
        Lsdb::default()
    }

    pub fn get(&self, origin: &RouterId) -> Option<&LsdbEntry> {
        self.entries.get(origin)
    }

    pub fn entries(&self) -> &HashMap<RouterId, LsdbEntry> {
        &self.entries
    }

    pub fn sequence_of(&self, origin: &RouterId) -> Sequence {
        self.entries
            .get(origin)
            .map(|e| e.sequence)
            .unwrap_or(Sequence::Placeholder)
    }

    /// Applies an LSA per §4.B: accepts iff its sequence is strictly newer
    /// than what's stored, inserting placeholders for newly-discovered
    /// neighbors. Returns whether the LSDB changed.
    pub fn apply(&mut self, packet: &LsaPacket) -> bool {
        let incoming = Sequence::Number(packet.sequence);
        if incoming <= self.sequence_of(&packet.origin) {
            return false;
        }

        let entry = LsdbEntry {
            sequence: incoming,
            addresses: packet.addresses.iter().copied().collect::<HashSet<_>>(),
            links: packet.links.clone(),
            last_update: now(),
        };
        self.entries.insert(packet.origin.clone(), entry);

        for neighbor in packet.links.keys() {
            self.entries
                .entry(neighbor.clone())
                .or_insert_with(LsdbEntry::placeholder);
        }

        true
    }

    /// Invariant 2 of §3, exposed for tests: every node referenced in any
    /// entry's `links` has an entry of its own (possibly a placeholder).
    #[cfg(test)]
    fn all_link_targets_present(&self) -> bool {
        self.entries
            .values()
            .flat_map(|e| e.links.keys())
            .all(|r| self.entries.contains_key(r))
    }
}
