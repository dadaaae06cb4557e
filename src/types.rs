//! Core types for the listings board

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

/// Direction of a standing vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

/// A posted project advertisement with vote tallies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Listing id — remote-assigned ids are small sequential integers,
    /// locally-assigned ids are Unix-millisecond timestamps (disjoint space)
    pub id: u64,
    /// Project title (at least 4 characters)
    pub title: String,
    /// Project description (at least 16 characters)
    pub description: String,
    /// Contact information
    pub contact: String,
    /// Technologies used
    pub technologies: String,
    /// Development time in months
    pub development_time_months: u32,
    /// Optional project link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Stable identifier of the posting user; absent for legacy rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Upvote tally
    pub votes_up: u64,
    /// Downvote tally
    pub votes_down: u64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Net vote score used for rank ordering
    pub fn score(&self) -> i64 {
        self.votes_up as i64 - self.votes_down as i64
    }

    /// Check the field constraints
    pub fn validate(&self) -> Result<()> {
        validate_fields(
            &self.title,
            &self.description,
            &self.contact,
            &self.technologies,
        )
    }
}

/// User-supplied fields for a new listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingInput {
    pub title: String,
    pub description: String,
    pub contact: String,
    pub technologies: String,
    pub development_time_months: u32,
    /// Optional project link; empty strings normalize to absent
    #[serde(default)]
    pub link: Option<String>,
}

impl ListingInput {
    /// Validate field constraints before any I/O
    pub fn validate(&self) -> Result<()> {
        validate_fields(
            &self.title,
            &self.description,
            &self.contact,
            &self.technologies,
        )
    }

    /// Build a fresh listing from these fields with zero tallies
    pub fn into_listing(self, id: u64, owner: Option<String>) -> Listing {
        Listing {
            id,
            title: self.title,
            description: self.description,
            contact: self.contact,
            technologies: self.technologies,
            development_time_months: self.development_time_months,
            link: self.link.filter(|l| !l.is_empty()),
            owner,
            votes_up: 0,
            votes_down: 0,
            created_at: Utc::now(),
        }
    }
}

fn validate_fields(
    title: &str,
    description: &str,
    contact: &str,
    technologies: &str,
) -> Result<()> {
    if title.len() < 4 {
        return Err(BoardError::Validation(
            "Title must be at least 4 characters long.".to_string(),
        ));
    }
    if description.len() < 16 {
        return Err(BoardError::Validation(
            "Description must be at least 16 characters long.".to_string(),
        ));
    }
    if contact.is_empty() {
        return Err(BoardError::Validation(
            "Contact must not be empty.".to_string(),
        ));
    }
    if technologies.is_empty() {
        return Err(BoardError::Validation(
            "Technologies must not be empty.".to_string(),
        ));
    }
    Ok(())
}

/// Process-lifetime session state, passed into every controller call
///
/// The identity provider is an external collaborator; only its result is
/// consumed here: the two flags and a stable opaque user identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Whether the identity handshake completed
    pub authenticated: bool,
    /// Whether the user finished registration
    pub registered: bool,
    /// Stable user identifier, present only when authenticated
    pub user_id: Option<String>,
}

impl Session {
    /// Anonymous (logged-out) session
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Fully signed-in session for the given user
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            registered: true,
            user_id: Some(user_id.into()),
        }
    }

    /// Resolve the user id, requiring authentication and registration
    pub fn require_registered(&self) -> Result<&str> {
        if !self.authenticated || !self.registered {
            return Err(BoardError::Unauthorized);
        }
        self.user_id.as_deref().ok_or(BoardError::Unauthorized)
    }
}

/// Terminal outcome of a successful write: which store holds the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The remote authority recorded the write
    Remote,
    /// The remote was unreachable; the write is held in the fallback cache
    Local,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ListingInput {
        ListingInput {
            title: "Space Shooter".to_string(),
            description: "A game about shooting enemies and surviving waves".to_string(),
            contact: "u1@x.com".to_string(),
            technologies: "Unity".to_string(),
            development_time_months: 8,
            link: Some(String::new()),
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn short_title_rejected() {
        let mut i = input();
        i.title = "abc".to_string();
        match i.validate() {
            Err(BoardError::Validation(msg)) => {
                assert_eq!(msg, "Title must be at least 4 characters long.")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn short_description_rejected() {
        let mut i = input();
        i.description = "too short".to_string();
        assert!(matches!(i.validate(), Err(BoardError::Validation(_))));
    }

    #[test]
    fn empty_link_normalizes_to_none() {
        let listing = input().into_listing(1, Some("u1".to_string()));
        assert_eq!(listing.link, None);
        assert_eq!((listing.votes_up, listing.votes_down), (0, 0));
    }

    #[test]
    fn session_gates_on_both_flags() {
        assert!(Session::anonymous().require_registered().is_err());
        let half = Session {
            authenticated: true,
            registered: false,
            user_id: Some("u1".to_string()),
        };
        assert!(matches!(
            half.require_registered(),
            Err(BoardError::Unauthorized)
        ));
        assert_eq!(Session::signed_in("u1").require_registered().unwrap(), "u1");
    }
}
