//! Listing Store - ordered collection of advertisements with vote tallies
//!
//! Owned by the sync controller; the UI layer reads through accessors and
//! never mutates tallies directly, so the delta invariants hold.

use tracing::debug;

use crate::error::{BoardError, Result};
use crate::types::Listing;

/// Insertion-ordered listing collection
#[derive(Debug, Default)]
pub struct ListingStore {
    listings: Vec<Listing>,
}

impl ListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All listings in insertion order
    pub fn list(&self) -> &[Listing] {
        &self.listings
    }

    /// Listings in vote-rank order: descending by net score, stable sort so
    /// ties keep their original order
    pub fn list_ranked(&self) -> Vec<Listing> {
        let mut ranked = self.listings.clone();
        ranked.sort_by_key(|l| std::cmp::Reverse(l.score()));
        ranked
    }

    /// Look up a listing by id
    pub fn get(&self, id: u64) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Insert a listing, validating field constraints and id uniqueness
    pub fn insert(&mut self, listing: Listing) -> Result<u64> {
        listing.validate()?;
        if self.get(listing.id).is_some() {
            return Err(BoardError::Validation(format!(
                "Listing id {} already exists.",
                listing.id
            )));
        }
        let id = listing.id;
        self.listings.push(listing);
        debug!(id = id, total = self.listings.len(), "listing inserted");
        Ok(id)
    }

    /// Adjust vote counters by signed deltas, saturating at zero
    pub fn apply_vote_delta(&mut self, id: u64, up: i64, down: i64) -> Result<()> {
        let listing = self
            .listings
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(BoardError::NotFound(id))?;

        listing.votes_up = apply_delta(listing.votes_up, up);
        listing.votes_down = apply_delta(listing.votes_down, down);
        debug!(
            id = id,
            votes_up = listing.votes_up,
            votes_down = listing.votes_down,
            "vote delta applied"
        );
        Ok(())
    }

    /// Wholesale overwrite after an authoritative refresh
    pub fn replace_all(&mut self, listings: Vec<Listing>) {
        debug!(count = listings.len(), "listing store replaced");
        self.listings = listings;
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

fn apply_delta(counter: u64, delta: i64) -> u64 {
    if delta >= 0 {
        counter.saturating_add(delta as u64)
    } else {
        counter.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ListingInput;

    fn listing(id: u64, title: &str) -> Listing {
        ListingInput {
            title: title.to_string(),
            description: "A long enough description".to_string(),
            contact: "a@b.c".to_string(),
            technologies: "Rust".to_string(),
            development_time_months: 3,
            link: None,
        }
        .into_listing(id, None)
    }

    #[test]
    fn insert_preserves_order_and_rejects_duplicates() {
        let mut store = ListingStore::new();
        store.insert(listing(1, "First")).unwrap();
        store.insert(listing(2, "Second")).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].id, 1);
        assert!(matches!(
            store.insert(listing(1, "Again")),
            Err(BoardError::Validation(_))
        ));
    }

    #[test]
    fn insert_validates_fields() {
        let mut store = ListingStore::new();
        let bad = listing(1, "abc");
        assert!(matches!(
            store.insert(bad),
            Err(BoardError::Validation(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn delta_clamps_at_zero_and_signals_not_found() {
        let mut store = ListingStore::new();
        store.insert(listing(1, "First")).unwrap();

        store.apply_vote_delta(1, 1, 0).unwrap();
        store.apply_vote_delta(1, -5, 0).unwrap();
        let l = store.get(1).unwrap();
        assert_eq!((l.votes_up, l.votes_down), (0, 0));

        assert!(matches!(
            store.apply_vote_delta(99, 1, 0),
            Err(BoardError::NotFound(99))
        ));
    }

    #[test]
    fn ranked_order_is_stable_on_ties() {
        let mut store = ListingStore::new();
        for id in 1..=3 {
            store.insert(listing(id, "Project")).unwrap();
        }
        store.apply_vote_delta(2, 3, 0).unwrap();
        store.apply_vote_delta(3, 1, 1).unwrap(); // net 0, ties with id 1

        let ranked = store.list_ranked();
        let ids: Vec<u64> = ranked.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn replace_all_overwrites() {
        let mut store = ListingStore::new();
        store.insert(listing(1, "First")).unwrap();
        store.replace_all(vec![listing(7, "Authoritative")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].id, 7);
    }
}
