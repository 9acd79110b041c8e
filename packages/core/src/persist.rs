//! Durable client-side persistence for the cart and wishlist stores.
//!
//! The stored format is an opaque JSON blob per key. Persistence is
//! fire-and-forget on every mutation: a failed save is logged and never
//! surfaced to the caller.

use std::collections::HashMap;
use std::sync::Mutex;

pub const CART_KEY: &str = "filigree.cart";
pub const WISHLIST_KEY: &str = "filigree.wishlist";

pub trait StatePersistence: Send + Sync {
    fn save(&self, key: &str, blob: &str) -> anyhow::Result<()>;
    fn load(&self, key: &str) -> anyhow::Result<Option<String>>;
}

/// In-memory persistence, used by tests and as a per-session fallback
/// when no durable store is wired up.
#[derive(Default)]
pub struct MemoryPersistence {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatePersistence for MemoryPersistence {
    fn save(&self, key: &str, blob: &str) -> anyhow::Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| anyhow::anyhow!("persistence lock poisoned"))?;
        blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| anyhow::anyhow!("persistence lock poisoned"))?;
        Ok(blobs.get(key).cloned())
    }
}
