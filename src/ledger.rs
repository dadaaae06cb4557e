//! Vote Ledger - per-user, per-listing standing votes
//!
//! Source of truth for "has this user already voted, and how". At most one
//! record exists per (user, listing) pair; a changed vote overwrites the
//! record rather than adding a second one.

use std::collections::{BTreeMap, HashMap};

use crate::types::VoteDirection;

/// In-memory vote ledger, keyed by (user id, listing id)
#[derive(Debug, Default)]
pub struct VoteLedger {
    votes: HashMap<(String, u64), VoteDirection>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current direction for a (user, listing) pair, if any. Pure read.
    pub fn get(&self, user: &str, listing: u64) -> Option<VoteDirection> {
        self.votes.get(&(user.to_string(), listing)).copied()
    }

    /// Record a vote, overwriting any prior entry for the pair.
    ///
    /// Returns the replaced direction — the sync controller needs it to
    /// reverse the old tally contribution before applying the new one.
    pub fn record(
        &mut self,
        user: &str,
        listing: u64,
        direction: VoteDirection,
    ) -> Option<VoteDirection> {
        self.votes.insert((user.to_string(), listing), direction)
    }

    /// Snapshot of one user's votes, for fallback-cache persistence.
    ///
    /// Keyed by user so two sessions on the same device never
    /// cross-contaminate vote state.
    pub fn snapshot_for(&self, user: &str) -> BTreeMap<u64, VoteDirection> {
        self.votes
            .iter()
            .filter(|((u, _), _)| u == user)
            .map(|((_, listing), dir)| (*listing, *dir))
            .collect()
    }

    /// Replace one user's entries from a persisted snapshot (login reload)
    pub fn load_user(&mut self, user: &str, snapshot: BTreeMap<u64, VoteDirection>) {
        self.clear_user(user);
        for (listing, dir) in snapshot {
            self.votes.insert((user.to_string(), listing), dir);
        }
    }

    /// Drop one user's entries (logout)
    pub fn clear_user(&mut self, user: &str) {
        self.votes.retain(|(u, _), _| u != user);
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.votes.clear();
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_returns_previous_direction() {
        let mut ledger = VoteLedger::new();
        assert_eq!(ledger.record("u1", 1, VoteDirection::Up), None);
        assert_eq!(
            ledger.record("u1", 1, VoteDirection::Down),
            Some(VoteDirection::Up)
        );
        // Single record per pair, not two
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("u1", 1), Some(VoteDirection::Down));
    }

    #[test]
    fn users_are_isolated() {
        let mut ledger = VoteLedger::new();
        ledger.record("u1", 1, VoteDirection::Up);
        ledger.record("u2", 1, VoteDirection::Down);

        assert_eq!(ledger.get("u1", 1), Some(VoteDirection::Up));
        assert_eq!(ledger.get("u2", 1), Some(VoteDirection::Down));

        let snap = ledger.snapshot_for("u1");
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get(&1), Some(&VoteDirection::Up));

        ledger.clear_user("u1");
        assert_eq!(ledger.get("u1", 1), None);
        assert_eq!(ledger.get("u2", 1), Some(VoteDirection::Down));
    }

    #[test]
    fn load_user_replaces_prior_view() {
        let mut ledger = VoteLedger::new();
        ledger.record("u1", 1, VoteDirection::Up);
        ledger.record("u1", 2, VoteDirection::Up);

        let mut snap = BTreeMap::new();
        snap.insert(3, VoteDirection::Down);
        ledger.load_user("u1", snap);

        assert_eq!(ledger.get("u1", 1), None);
        assert_eq!(ledger.get("u1", 2), None);
        assert_eq!(ledger.get("u1", 3), Some(VoteDirection::Down));
    }
}
