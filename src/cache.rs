//! Durable Fallback Cache - local persistence for offline commits
//!
//! Snapshots land here only when the remote authority is unreachable; a
//! successful remote round-trip never shadow-writes this store. Vote
//! snapshots are keyed by user identifier so two signed-in sessions on the
//! same device cannot cross-contaminate vote state.

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::types::{Listing, VoteDirection};

/// Key under which the single listings snapshot lives
const LISTINGS_KEY: &str = "snapshot";

/// Storage seam for fallback snapshots. Last-write-wins, no expiry.
pub trait FallbackCache {
    /// Load the listings snapshot, `None` when absent
    fn load_listings(&self) -> Result<Option<Vec<Listing>>>;

    /// Overwrite the listings snapshot
    fn save_listings(&self, listings: &[Listing]) -> Result<()>;

    /// Load one user's vote snapshot, empty when absent
    fn load_votes(&self, user: &str) -> Result<BTreeMap<u64, VoteDirection>>;

    /// Overwrite one user's vote snapshot
    fn save_votes(&self, user: &str, votes: &BTreeMap<u64, VoteDirection>) -> Result<()>;
}

/// Fallback cache backed by sled
pub struct SledCache {
    db: sled::Db,
    listings: sled::Tree,
    votes: sled::Tree,
}

impl SledCache {
    /// Open (or create) the cache at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let db = sled::open(path.as_ref())?;
        let listings = db.open_tree("listings")?;
        let votes = db.open_tree("votes")?;

        info!(path = %path.as_ref().display(), "fallback cache opened");
        Ok(Self {
            db,
            listings,
            votes,
        })
    }

    /// Decode a stored snapshot; an unreadable shape counts as absent rather
    /// than an error, so a schema change cannot wedge the client
    fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Option<T> {
        match serde_json::from_slice(bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "discarding unreadable snapshot");
                None
            }
        }
    }

    fn vote_key(user: &str) -> String {
        format!("votes:{}", user)
    }
}

impl FallbackCache for SledCache {
    fn load_listings(&self) -> Result<Option<Vec<Listing>>> {
        match self.listings.get(LISTINGS_KEY.as_bytes())? {
            Some(bytes) => Ok(Self::decode(LISTINGS_KEY, &bytes)),
            None => Ok(None),
        }
    }

    fn save_listings(&self, listings: &[Listing]) -> Result<()> {
        let bytes = serde_json::to_vec(listings)?;
        self.listings.insert(LISTINGS_KEY.as_bytes(), bytes)?;
        self.db.flush()?;
        debug!(count = listings.len(), "listings snapshot saved");
        Ok(())
    }

    fn load_votes(&self, user: &str) -> Result<BTreeMap<u64, VoteDirection>> {
        let key = Self::vote_key(user);
        match self.votes.get(key.as_bytes())? {
            Some(bytes) => Ok(Self::decode(&key, &bytes).unwrap_or_default()),
            None => Ok(BTreeMap::new()),
        }
    }

    fn save_votes(&self, user: &str, votes: &BTreeMap<u64, VoteDirection>) -> Result<()> {
        let key = Self::vote_key(user);
        let bytes = serde_json::to_vec(votes)?;
        self.votes.insert(key.as_bytes(), bytes)?;
        self.db.flush()?;
        debug!(user = %user, count = votes.len(), "vote snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ListingInput;
    use tempfile::TempDir;

    fn listing(id: u64) -> Listing {
        ListingInput {
            title: "Space Shooter".to_string(),
            description: "A game about shooting enemies and surviving waves".to_string(),
            contact: "u1@x.com".to_string(),
            technologies: "Unity".to_string(),
            development_time_months: 8,
            link: None,
        }
        .into_listing(id, Some("u1".to_string()))
    }

    #[test]
    fn listings_snapshot_round_trips() {
        let dir = TempDir::new().unwrap();
        let cache = SledCache::open(dir.path().join("test.sled")).unwrap();

        assert_eq!(cache.load_listings().unwrap(), None);

        cache.save_listings(&[listing(1), listing(2)]).unwrap();
        let loaded = cache.load_listings().unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, 1);
    }

    #[test]
    fn vote_snapshots_are_keyed_by_user() {
        let dir = TempDir::new().unwrap();
        let cache = SledCache::open(dir.path().join("test.sled")).unwrap();

        let mut u1 = BTreeMap::new();
        u1.insert(1, VoteDirection::Up);
        cache.save_votes("u1", &u1).unwrap();

        let mut u2 = BTreeMap::new();
        u2.insert(1, VoteDirection::Down);
        cache.save_votes("u2", &u2).unwrap();

        assert_eq!(cache.load_votes("u1").unwrap().get(&1), Some(&VoteDirection::Up));
        assert_eq!(cache.load_votes("u2").unwrap().get(&1), Some(&VoteDirection::Down));
        assert!(cache.load_votes("u3").unwrap().is_empty());
    }

    #[test]
    fn snapshots_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.sled");

        {
            let cache = SledCache::open(&path).unwrap();
            cache.save_listings(&[listing(1)]).unwrap();
            let mut votes = BTreeMap::new();
            votes.insert(1, VoteDirection::Up);
            cache.save_votes("u1", &votes).unwrap();
        }

        let cache = SledCache::open(&path).unwrap();
        assert_eq!(cache.load_listings().unwrap().unwrap().len(), 1);
        assert_eq!(cache.load_votes("u1").unwrap().get(&1), Some(&VoteDirection::Up));
    }

    #[test]
    fn unreadable_snapshot_counts_as_absent() {
        let dir = TempDir::new().unwrap();
        let cache = SledCache::open(dir.path().join("test.sled")).unwrap();

        cache
            .listings
            .insert(LISTINGS_KEY.as_bytes(), b"not json".to_vec())
            .unwrap();
        assert_eq!(cache.load_listings().unwrap(), None);

        cache
            .votes
            .insert(SledCache::vote_key("u1").as_bytes(), b"{broken".to_vec())
            .unwrap();
        assert!(cache.load_votes("u1").unwrap().is_empty());
    }
}
