//! An in-memory content-addressed block store.

use bytes::Bytes;
use futures::FutureExt;
use graphweft_api::{
    BlockLoader, BoxFut, DynBlockLoader, Link, WeftResult,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A [BlockLoader] backed by a hash map, suitable for tests and small
/// hosts that keep their working set in memory.
#[derive(Debug, Default)]
pub struct MemBlockStore {
    blocks: Mutex<HashMap<Link, Bytes>>,
}

impl MemBlockStore {
    /// Construct a new empty store as a trait object.
    pub fn create() -> DynBlockLoader {
        Arc::new(Self::default())
    }

    /// Insert a block under its content identifier.
    pub fn put(&self, link: Link, data: Bytes) {
        self.blocks.lock().unwrap().insert(link, data);
    }

    /// The number of blocks currently stored.
    pub fn len(&self) -> usize {
        self.blocks.lock().unwrap().len()
    }

    /// True if the store holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.lock().unwrap().is_empty()
    }
}

impl BlockLoader for MemBlockStore {
    fn load(&self, link: Link) -> BoxFut<'_, WeftResult<Option<Bytes>>> {
        let data = self.blocks.lock().unwrap().get(&link).cloned();
        async move { Ok(data) }.boxed()
    }
}
