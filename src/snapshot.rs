//! Wrapper module for [`SnapshotCache`]

use crate::img::Raster;

use log::info;
use std::collections::VecDeque;

/// The number of snapshots a tree keeps unless configured otherwise
pub const DEFAULT_CAPACITY: usize = 8;

/// A bounded store of named rasters, evicting the least recently used name when full
///
/// Both storing and fetching a snapshot count as using it.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    capacity: usize,
    /// Least recently used at the front
    entries: VecDeque<(String, Raster)>,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        SnapshotCache::new(DEFAULT_CAPACITY)
    }
}

impl SnapshotCache {
    /// Creates an empty cache. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        SnapshotCache {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Stores `raster` under `name`, replacing any previous snapshot with that name
    ///
    /// Returns the name of the snapshot that was evicted to make room, if any.
    pub fn insert(&mut self, name: String, raster: Raster) -> Option<String> {
        if let Some(idx) = self.position(&name) {
            self.entries.remove(idx);
        }

        self.entries.push_back((name, raster));

        if self.entries.len() > self.capacity {
            let (evicted, _) = self.entries.pop_front()?;
            info!("evicted snapshot {:?}", evicted);
            return Some(evicted);
        }

        None
    }

    /// Fetches the snapshot stored under `name`, marking it as the most recently used
    pub fn get(&mut self, name: &str) -> Option<&Raster> {
        let idx = self.position(name)?;
        let entry = self.entries.remove(idx)?;
        self.entries.push_back(entry);
        self.entries.back().map(|(_, raster)| raster)
    }

    /// Fetches the snapshot stored under `name` without affecting eviction order
    pub fn peek(&self, name: &str) -> Option<&Raster> {
        self.position(name).map(|idx| &self.entries[idx].1)
    }

    pub fn remove(&mut self, name: &str) -> Option<Raster> {
        let idx = self.position(name)?;
        self.entries.remove(idx).map(|(_, raster)| raster)
    }

    /// Names of the stored snapshots, least recently used first
    pub fn names(&self) -> impl '_ + Iterator<Item = &'_ str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}
