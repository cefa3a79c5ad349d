//! Emoji reactions on discoveries.

use crate::events::{EventName, EventStore};
use crate::types::{AccountId, DiscoveryId, IdError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use tracing::debug;

/// Reaction counts for one discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    pub discovery_id: DiscoveryId,
    pub counts: BTreeMap<String, u32>,
    pub total: u32,
}

impl ReactionSummary {
    fn from_reactions(discovery_id: &DiscoveryId, reactions: &BTreeMap<AccountId, String>) -> Self {
        let mut counts = BTreeMap::new();
        for emoji in reactions.values() {
            *counts.entry(emoji.clone()).or_insert(0) += 1;
        }
        Self {
            discovery_id: discovery_id.clone(),
            counts,
            total: reactions.len() as u32,
        }
    }

    pub fn count(&self, emoji: &str) -> u32 {
        self.counts.get(emoji).copied().unwrap_or(0)
    }
}

/// The reactions on a discovery changed.
pub enum ReactionSummaryChanged {}

impl EventName for ReactionSummaryChanged {
    type Payload = ReactionSummary;
    const NAME: &'static str = "reaction-summary-changed";
}

crate::event_store! {
    /// Event store for discovery updates.
    pub struct DiscoveryEvents {
        reactions: ReactionSummaryChanged,
    }
}

/// At most one reaction per account on each discovery.
pub struct ReactionBoard {
    events: Arc<DiscoveryEvents>,
    reactions: RwLock<HashMap<DiscoveryId, BTreeMap<AccountId, String>>>,
}

impl ReactionBoard {
    pub fn new() -> Self {
        Self::with_events(Arc::new(DiscoveryEvents::new()))
    }

    pub fn with_events(events: Arc<DiscoveryEvents>) -> Self {
        Self {
            events,
            reactions: RwLock::new(HashMap::new()),
        }
    }

    pub fn events(&self) -> &Arc<DiscoveryEvents> {
        &self.events
    }

    /// Set `account_id`'s reaction, replacing any earlier one.
    pub fn react(
        &self,
        discovery_id: &DiscoveryId,
        account_id: &AccountId,
        emoji: &str,
    ) -> Result<ReactionSummary, IdError> {
        let emoji = emoji.trim();
        if emoji.is_empty() {
            return Err(IdError::Empty("reaction"));
        }

        let (summary, changed) = {
            let mut all = self.write();
            let reactions = all.entry(discovery_id.clone()).or_default();
            let previous = reactions.insert(account_id.clone(), emoji.to_string());
            let changed = previous.as_deref() != Some(emoji);
            (ReactionSummary::from_reactions(discovery_id, reactions), changed)
        };

        if changed {
            debug!(discovery = %discovery_id, account = %account_id, emoji, "reaction set");
            self.events.emit::<ReactionSummaryChanged>(&summary);
        }
        Ok(summary)
    }

    /// Remove `account_id`'s reaction; returns `None` when there was none.
    pub fn remove_reaction(
        &self,
        discovery_id: &DiscoveryId,
        account_id: &AccountId,
    ) -> Option<ReactionSummary> {
        let summary = {
            let mut all = self.write();
            let reactions = all.get_mut(discovery_id)?;
            reactions.remove(account_id)?;
            let summary = ReactionSummary::from_reactions(discovery_id, reactions);
            if reactions.is_empty() {
                all.remove(discovery_id);
            }
            summary
        };

        debug!(discovery = %discovery_id, account = %account_id, "reaction removed");
        self.events.emit::<ReactionSummaryChanged>(&summary);
        Some(summary)
    }

    pub fn summary(&self, discovery_id: &DiscoveryId) -> ReactionSummary {
        let all = self.reactions.read().unwrap_or_else(|e| e.into_inner());
        match all.get(discovery_id) {
            Some(reactions) => ReactionSummary::from_reactions(discovery_id, reactions),
            None => ReactionSummary::from_reactions(discovery_id, &BTreeMap::new()),
        }
    }

    /// The reaction `account_id` left on `discovery_id`, if any.
    pub fn reaction_of(&self, discovery_id: &DiscoveryId, account_id: &AccountId) -> Option<String> {
        let all = self.reactions.read().unwrap_or_else(|e| e.into_inner());
        all.get(discovery_id)?.get(account_id).cloned()
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<DiscoveryId, BTreeMap<AccountId, String>>> {
        self.reactions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ReactionBoard {
    fn default() -> Self {
        Self::new()
    }
}
