//! Identity & role directory
//!
//! Resolves participant identities and roles. Leaf dependency used by the
//! aggregates and the reconciliation service; participants are immutable
//! once registered.

use crate::types::{Participant, ParticipantId, Role};
use crate::{Error, Result};
use dashmap::DashMap;
use std::collections::HashMap;

/// Directory of known participants
pub trait Directory: Send + Sync {
    /// Look up a single participant
    fn get(&self, id: &ParticipantId) -> Option<Participant>;

    /// Batched lookup (one call per enrichment pass)
    fn get_many(&self, ids: &[ParticipantId]) -> HashMap<ParticipantId, Participant>;

    /// All registered participants
    fn list(&self) -> Vec<Participant>;

    /// Participants with a given role
    fn list_by_role(&self, role: Role) -> Vec<Participant>;
}

/// In-memory directory backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    participants: DashMap<ParticipantId, Participant>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant
    ///
    /// Identities are immutable: re-registering an existing id is a
    /// `Conflict`.
    pub fn register(&self, participant: Participant) -> Result<()> {
        use dashmap::mapref::entry::Entry;
        match self.participants.entry(participant.id.clone()) {
            Entry::Occupied(_) => Err(Error::Conflict(format!(
                "participant {} already registered",
                participant.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(participant);
                Ok(())
            }
        }
    }
}

impl Directory for InMemoryDirectory {
    fn get(&self, id: &ParticipantId) -> Option<Participant> {
        self.participants.get(id).map(|entry| entry.clone())
    }

    fn get_many(&self, ids: &[ParticipantId]) -> HashMap<ParticipantId, Participant> {
        ids.iter()
            .filter_map(|id| self.get(id).map(|p| (id.clone(), p)))
            .collect()
    }

    fn list(&self) -> Vec<Participant> {
        let mut all: Vec<Participant> =
            self.participants.iter().map(|entry| entry.clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    fn list_by_role(&self, role: Role) -> Vec<Participant> {
        let mut matching: Vec<Participant> = self
            .participants
            .iter()
            .filter(|entry| entry.role == role)
            .map(|entry| entry.clone())
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        matching
    }
}
