//! Hierarchical Memory System
//!
//! Owns the three tiers and assembles them into prompt context:
//! - Full context: every entry of long, mid and (optionally) short term
//! - Compact context: the most recent entries of long and mid term only

use crate::config::MemoryConfig;
use crate::error::MemoryError;
use crate::utils::now_utc;

use super::tier::MemoryTier;
use super::types::{Metadata, TierRole};
use super::COMPACT_TIER_LIMIT;

/// Three-tier conversational memory.
///
/// - L1 long term: identity, goals and principles
/// - L2 mid term: current task and progress
/// - L3 short term: tool output and scratch data, cleared often
///
/// Tier roles are fixed for the lifetime of the instance.
#[derive(Debug, Clone)]
pub struct HierarchicalMemory {
    long_term: MemoryTier,
    mid_term: MemoryTier,
    short_term: MemoryTier,
    compact_limit: usize,
    expire_on_read: bool,
}

impl Default for HierarchicalMemory {
    fn default() -> Self {
        let config = MemoryConfig::default();
        Self {
            long_term: MemoryTier::with_capacity(
                TierRole::LongTerm.label(),
                config.long_term_capacity,
                config.long_term_ttl_secs,
            ),
            mid_term: MemoryTier::with_capacity(
                TierRole::MidTerm.label(),
                config.mid_term_capacity,
                config.mid_term_ttl_secs,
            ),
            short_term: MemoryTier::with_capacity(
                TierRole::ShortTerm.label(),
                config.short_term_capacity,
                config.short_term_ttl_secs,
            ),
            compact_limit: COMPACT_TIER_LIMIT,
            expire_on_read: false,
        }
    }
}

impl HierarchicalMemory {
    /// Create a memory with the default capacities (50 / 20 / 10)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory from configuration
    pub fn from_config(config: &MemoryConfig) -> Result<Self, MemoryError> {
        if config.compact_limit == 0 {
            return Err(MemoryError::InvalidCapacity {
                tier: "compact context".into(),
                max_items: 0,
            });
        }

        Ok(Self {
            long_term: MemoryTier::new(
                TierRole::LongTerm.label(),
                config.long_term_capacity,
                config.long_term_ttl_secs,
            )?,
            mid_term: MemoryTier::new(
                TierRole::MidTerm.label(),
                config.mid_term_capacity,
                config.mid_term_ttl_secs,
            )?,
            short_term: MemoryTier::new(
                TierRole::ShortTerm.label(),
                config.short_term_capacity,
                config.short_term_ttl_secs,
            )?,
            compact_limit: config.compact_limit,
            expire_on_read: config.expire_on_read,
        })
    }

    /// Get a tier by role
    pub fn tier(&self, role: TierRole) -> &MemoryTier {
        match role {
            TierRole::LongTerm => &self.long_term,
            TierRole::MidTerm => &self.mid_term,
            TierRole::ShortTerm => &self.short_term,
        }
    }

    pub(crate) fn tier_mut(&mut self, role: TierRole) -> &mut MemoryTier {
        match role {
            TierRole::LongTerm => &mut self.long_term,
            TierRole::MidTerm => &mut self.mid_term,
            TierRole::ShortTerm => &mut self.short_term,
        }
    }

    /// Add an entry to the tier with the given role
    pub fn add(&mut self, role: TierRole, content: impl Into<String>, metadata: Option<Metadata>) {
        self.tier_mut(role).add(content, metadata);
    }

    /// Add to long-term memory (identity, goals)
    pub fn add_long_term(&mut self, content: impl Into<String>, metadata: Option<Metadata>) {
        self.long_term.add(content, metadata);
    }

    /// Add to mid-term memory (task progress)
    pub fn add_mid_term(&mut self, content: impl Into<String>, metadata: Option<Metadata>) {
        self.mid_term.add(content, metadata);
    }

    /// Add to short-term memory (tool output, scratch data)
    pub fn add_short_term(&mut self, content: impl Into<String>, metadata: Option<Metadata>) {
        self.short_term.add(content, metadata);
    }

    /// Render one tier, honouring `expire_on_read`
    pub fn render(&self, role: TierRole, limit: Option<usize>) -> String {
        let tier = self.tier(role);
        if self.expire_on_read {
            tier.render_fresh(limit, now_utc())
        } else {
            tier.render(limit)
        }
    }

    /// Everything currently remembered.
    ///
    /// Grows with long-term memory; meant for diagnostics and checkpoints rather
    /// than per-turn prompts.
    pub fn get_full_context(&self, include_short: bool) -> String {
        let mut roles = vec![TierRole::LongTerm, TierRole::MidTerm];
        if include_short {
            roles.push(TierRole::ShortTerm);
        }
        self.join_blocks(&roles, None)
    }

    /// Bounded per-turn context: the most recent entries of long and mid term.
    ///
    /// Short-term memory is never included.
    pub fn get_compact_context(&self) -> String {
        self.join_blocks(
            &[TierRole::LongTerm, TierRole::MidTerm],
            Some(self.compact_limit),
        )
    }

    fn join_blocks(&self, roles: &[TierRole], limit: Option<usize>) -> String {
        roles
            .iter()
            .map(|role| self.render(*role, limit))
            .filter(|block| !block.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Clear short-term memory only
    pub fn clear_short_term(&mut self) {
        self.short_term.clear();
    }

    /// Clear a single tier
    pub fn clear(&mut self, role: TierRole) {
        self.tier_mut(role).clear();
    }

    /// Evict entries older than their tier's TTL across all tiers.
    ///
    /// Returns the total number of entries removed.
    pub fn prune_expired(&mut self) -> usize {
        let now = now_utc();
        TierRole::ALL
            .iter()
            .map(|role| self.tier_mut(*role).prune_expired(now))
            .sum()
    }

    /// Number of entries per tier, in context order
    pub fn counts(&self) -> [(TierRole, usize); 3] {
        TierRole::ALL.map(|role| (role, self.tier(role).len()))
    }

    pub fn compact_limit(&self) -> usize {
        self.compact_limit
    }

    pub fn expire_on_read(&self) -> bool {
        self.expire_on_read
    }
}
