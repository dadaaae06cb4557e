//! Sync engine for a project listings board
//!
//! Users post project advertisements and cast one up/down vote each. Writes
//! go to the remote authority first; when it is unreachable they commit
//! against a durable local fallback (sled) and reconcile on the next
//! successful round-trip via a full authoritative refresh.
//!
//! # Example
//!
//! ```rust,no_run
//! use adboard_sync::{
//!     BoardConfig, HttpAuthority, ListingInput, Session, SledCache, SyncController,
//!     VoteDirection,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BoardConfig::default();
//! let session = Session::signed_in("user-42");
//!
//! let remote = HttpAuthority::with_identity(&config, "user-42");
//! let cache = SledCache::open(&config.cache_path)?;
//! let mut board = SyncController::new(remote, cache);
//!
//! board.begin_session(&session)?;
//! board.refresh().await?;
//!
//! let (id, commit) = board
//!     .post_listing(
//!         &session,
//!         ListingInput {
//!             title: "Space Shooter".into(),
//!             description: "A game about shooting enemies and surviving waves".into(),
//!             contact: "u1@x.com".into(),
//!             technologies: "Unity".into(),
//!             development_time_months: 8,
//!             link: None,
//!         },
//!     )
//!     .await?;
//! println!("listing {} committed via {:?}", id, commit);
//!
//! board.cast_vote(&session, id, VoteDirection::Up).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod ledger;
pub mod remote;
pub mod store;
pub mod types;

// Re-export main types
pub use cache::{FallbackCache, SledCache};
pub use config::BoardConfig;
pub use controller::SyncController;
pub use error::{BoardError, Result};
pub use ledger::VoteLedger;
pub use remote::{HttpAuthority, RemoteAuthority, RemoteError};
pub use store::ListingStore;
pub use types::{Commit, Listing, ListingInput, Session, VoteDirection};
