//! Publication state machine.
//!
//! | From \ To    | draft | published | unpublished |
//! |--------------|-------|-----------|-------------|
//! | draft        | no-op | stamp     | rejected    |
//! | published    | clear | no-op     | keep stamp  |
//! | unpublished  | clear | keep stamp| no-op       |
//!
//! "stamp" sets `published_at`/`published_by` only if they are unset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::Actor;
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Draft,
    Published,
    Unpublished,
}

impl PublishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Draft => "draft",
            PublishStatus::Published => "published",
            PublishStatus::Unpublished => "unpublished",
        }
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PublishStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PublishStatus::Draft),
            "published" => Ok(PublishStatus::Published),
            "unpublished" => Ok(PublishStatus::Unpublished),
            other => Err(format!("unknown status {:?}", other)),
        }
    }
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move article from {from} to {to}")]
pub struct TransitionError {
    pub from: PublishStatus,
    pub to: PublishStatus,
}

/// Status plus the first-publication stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationState {
    pub status: PublishStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub published_by: Option<String>,
}

impl PublicationState {
    pub fn draft() -> Self {
        Self {
            status: PublishStatus::Draft,
            published_at: None,
            published_by: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }

    /// State after moving to `target`.
    ///
    /// Same-state moves return the current state unchanged.
    pub fn transition(
        &self,
        target: PublishStatus,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<PublicationState, TransitionError> {
        use PublishStatus::*;

        match (self.status, target) {
            (from, to) if from == to => Ok(self.clone()),
            (Draft, Unpublished) => Err(TransitionError {
                from: Draft,
                to: Unpublished,
            }),
            (_, Draft) => Ok(PublicationState::draft()),
            (_, Published) => Ok(PublicationState {
                status: Published,
                published_at: self.published_at.or(Some(now)),
                published_by: self
                    .published_by
                    .clone()
                    .or_else(|| Some(actor.display_name.clone())),
            }),
            (Published, Unpublished) => Ok(PublicationState {
                status: Unpublished,
                ..self.clone()
            }),
            (from, to) => Err(TransitionError { from, to }),
        }
    }
}

impl Default for PublicationState {
    fn default() -> Self {
        Self::draft()
    }
}
