//! Sync Controller - remote-first writes with durable local fallback
//!
//! Every write runs the same state machine: check the session, try the
//! remote authority, and on transport failure commit against the fallback
//! cache instead. Logical rejections from the server are terminal and never
//! fall back. A successful remote write triggers a full authoritative
//! refresh rather than a field-level merge; the remote is the cross-user
//! source of truth for tallies, local state exists purely for availability.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cache::FallbackCache;
use crate::error::{BoardError, Result};
use crate::ledger::VoteLedger;
use crate::remote::{RemoteAuthority, RemoteError};
use crate::store::ListingStore;
use crate::types::{Commit, Listing, ListingInput, Session, VoteDirection};

/// Orchestrates listings, votes and snapshots for one client session.
///
/// Owns the listing store and vote ledger; the UI layer reads through the
/// accessors and issues commands, it never mutates tallies directly.
pub struct SyncController<R, C> {
    remote: R,
    cache: C,
    store: ListingStore,
    ledger: VoteLedger,
}

impl<R: RemoteAuthority, C: FallbackCache> SyncController<R, C> {
    pub fn new(remote: R, cache: C) -> Self {
        Self {
            remote,
            cache,
            store: ListingStore::new(),
            ledger: VoteLedger::new(),
        }
    }

    /// Reset state for a login/logout transition.
    ///
    /// Clears the active vote ledger view and reloads it from the fallback
    /// cache keyed by the new identity (empty when anonymous). On a cold
    /// start the listing store is also seeded from the cache.
    pub fn begin_session(&mut self, session: &Session) -> Result<()> {
        self.ledger.clear();
        if let Ok(user) = session.require_registered() {
            let snapshot = self.cache.load_votes(user)?;
            debug!(user = %user, votes = snapshot.len(), "vote ledger reloaded");
            self.ledger.load_user(user, snapshot);
        }
        if self.store.is_empty() {
            if let Some(listings) = self.cache.load_listings()? {
                self.store.replace_all(listings);
            }
        }
        Ok(())
    }

    /// Post a new listing.
    ///
    /// Remote-first: a logical rejection propagates verbatim, a transport
    /// failure commits the listing locally under a timestamp id and persists
    /// the snapshot. Returns the assigned id and where it was committed.
    pub async fn post_listing(
        &mut self,
        session: &Session,
        input: ListingInput,
    ) -> Result<(u64, Commit)> {
        let user = session.require_registered()?.to_string();
        input.validate()?;

        match self.remote.create_listing(&input).await {
            Ok(id) => {
                let listing = input.into_listing(id, Some(user));
                self.store.insert(listing)?;
                info!(id = id, "listing committed remotely");
                self.refresh_best_effort().await;
                Ok((id, Commit::Remote))
            }
            Err(RemoteError::Rejected(reason)) => Err(BoardError::Rejected(reason)),
            Err(RemoteError::Transport(reason)) => {
                warn!(error = %reason, "remote unreachable, committing listing locally");
                let id = self.local_listing_id();
                self.store.insert(input.into_listing(id, Some(user)))?;
                self.cache.save_listings(self.store.list())?;
                Ok((id, Commit::Local))
            }
        }
    }

    /// Cast or change a vote on a listing.
    ///
    /// Idempotent per (user, listing): repeating the standing direction is
    /// rejected as a duplicate before any I/O. Changing direction reverses
    /// the old tally contribution before applying the new one, so the net
    /// change per counter is always exactly one.
    pub async fn cast_vote(
        &mut self,
        session: &Session,
        listing: u64,
        direction: VoteDirection,
    ) -> Result<Commit> {
        let user = session.require_registered()?.to_string();

        let prior = self.ledger.get(&user, listing);
        if prior == Some(direction) {
            return Err(BoardError::DuplicateVote(listing));
        }

        match self.remote.cast_vote(listing, direction).await {
            Ok(()) => {
                // Optimistic local mirror of what the server just recorded;
                // the refresh below reconciles any drift
                match self.apply_vote(&user, listing, direction, prior) {
                    Ok(()) | Err(BoardError::NotFound(_)) => {}
                    Err(e) => return Err(e),
                }
                info!(listing = listing, "vote committed remotely");
                self.refresh_best_effort().await;
                Ok(Commit::Remote)
            }
            Err(RemoteError::Rejected(reason)) => Err(BoardError::Rejected(reason)),
            Err(RemoteError::Transport(reason)) => {
                warn!(error = %reason, "remote unreachable, committing vote locally");
                self.apply_vote(&user, listing, direction, prior)?;
                self.cache.save_listings(self.store.list())?;
                self.cache
                    .save_votes(&user, &self.ledger.snapshot_for(&user))?;
                Ok(Commit::Local)
            }
        }
    }

    /// Refresh the listing store from the remote authority.
    ///
    /// On success the store is replaced wholesale. On transport failure a
    /// populated store is left untouched; an empty store is seeded from the
    /// fallback cache, or stays empty. Never a hard failure.
    pub async fn refresh(&mut self) -> Result<Commit> {
        match self.remote.fetch_listings().await {
            Ok(listings) => {
                self.store.replace_all(listings);
                Ok(Commit::Remote)
            }
            Err(e) => {
                debug!(error = %e, "refresh failed, keeping local view");
                if self.store.is_empty() {
                    if let Some(listings) = self.cache.load_listings()? {
                        self.store.replace_all(listings);
                    }
                }
                Ok(Commit::Local)
            }
        }
    }

    /// Listings in insertion order
    pub fn listings(&self) -> &[Listing] {
        self.store.list()
    }

    /// Listings in vote-rank order
    pub fn listings_ranked(&self) -> Vec<Listing> {
        self.store.list_ranked()
    }

    /// The session user's standing vote on a listing, if any
    pub fn vote_of(&self, session: &Session, listing: u64) -> Option<VoteDirection> {
        let user = session.user_id.as_deref()?;
        self.ledger.get(user, listing)
    }

    /// Apply a reversal-aware tally delta and record the new direction
    fn apply_vote(
        &mut self,
        user: &str,
        listing: u64,
        direction: VoteDirection,
        prior: Option<VoteDirection>,
    ) -> Result<()> {
        let (up, down) = match (direction, prior) {
            (VoteDirection::Up, Some(VoteDirection::Down)) => (1, -1),
            (VoteDirection::Up, _) => (1, 0),
            (VoteDirection::Down, Some(VoteDirection::Up)) => (-1, 1),
            (VoteDirection::Down, _) => (0, 1),
        };
        self.store.apply_vote_delta(listing, up, down)?;
        self.ledger.record(user, listing, direction);
        Ok(())
    }

    /// Locally-assigned ids are millisecond timestamps, disjoint from the
    /// authority's small sequential ids
    fn local_listing_id(&self) -> u64 {
        let mut id = Utc::now().timestamp_millis() as u64;
        while self.store.get(id).is_some() {
            id += 1;
        }
        id
    }

    async fn refresh_best_effort(&mut self) {
        if let Ok(listings) = self.remote.fetch_listings().await {
            self.store.replace_all(listings);
        }
    }
}
