//! Hierarchical conversational memory.
//!
//! Three capacity-bounded tiers keep prompt context small as a conversation grows:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  HierarchicalMemory                      │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────┐  │
//! │  │ L1 long term │  │ L2 mid term  │  │ L3 short term  │  │
//! │  │ 50 entries   │  │ 20 entries   │  │ 10 entries     │  │
//! │  │ TTL 30 days  │  │ TTL 1 hour   │  │ TTL 5 minutes  │  │
//! │  └──────┬───────┘  └──────┬───────┘  └───────┬────────┘  │
//! │         │ last 5          │ last 5           │ excluded  │
//! │         └────────┬────────┘                  │           │
//! │           compact context          full context only     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every tier evicts oldest-first once full. TTLs are informational unless
//! `expire_on_read` is enabled in [`MemoryConfig`](crate::config::MemoryConfig).
//!
//! ## Usage
//!
//! ```
//! use openagent_core::memory::HierarchicalMemory;
//!
//! let mut memory = HierarchicalMemory::new();
//! memory.add_long_term("You are a helpful assistant", None);
//! memory.add_mid_term("Current task: chat with the user", None);
//! memory.add_short_term("read_file returned 42 lines", None);
//!
//! let prompt_block = memory.get_compact_context();
//! assert!(!prompt_block.contains("read_file"));
//! ```

mod hierarchical;
mod shared;
mod snapshot;
mod tier;
mod types;

pub use hierarchical::HierarchicalMemory;
pub use shared::SharedMemory;
pub use snapshot::SNAPSHOT_VERSION;
pub use tier::MemoryTier;
pub use types::{MemoryEntry, Metadata, MetadataValue, TierRole, metadata};

/// Entries per tier included in the compact context.
pub const COMPACT_TIER_LIMIT: usize = 5;
