use std::fmt::Debug;

use chrono::Utc;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::repository::record::RecordId;

/// Hands out candidate ids for new records.
///
/// Sources don't need to guarantee uniqueness themselves, the [`ListStore`](super::ListStore)
/// lifts any candidate that would collide.
pub trait IdSource: Debug + Send + Sync {
    fn next_id(&mut self) -> RecordId;
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockIds;

impl IdSource for ClockIds {
    fn next_id(&mut self) -> RecordId {
        // A clock set before the epoch yields 0
        u64::try_from(Utc::now().timestamp_millis())
            .unwrap_or_default()
            .into()
    }
}

/// A plain counter.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> RecordId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id.into()
    }
}

/// Which [`IdSource`] new records draw from.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IdSourceKind {
    #[default]
    Clock,
    Sequential,
}

impl IdSourceKind {
    pub fn build(self) -> Box<dyn IdSource> {
        match self {
            IdSourceKind::Clock => Box::new(ClockIds),
            IdSourceKind::Sequential => Box::new(SequentialIds::default()),
        }
    }
}
