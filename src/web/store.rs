//! In-memory holding area for archives waiting to be downloaded

use crate::output::archive::ArchiveFormat;
use std::collections::VecDeque;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredArchive {
    pub file_name: String,
    pub format: ArchiveFormat,
    pub bytes: Vec<u8>,
}

/// Keeps the most recent archives; the oldest is evicted once `capacity` is reached
#[derive(Debug)]
pub struct ResultStore {
    entries: VecDeque<(Uuid, StoredArchive)>,
    capacity: usize,
}

impl ResultStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn insert(&mut self, archive: StoredArchive) -> Uuid {
        while self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.pop_front() {
                log::debug!("Evicting stored archive {}", evicted);
            }
        }
        let id = Uuid::new_v4();
        self.entries.push_back((id, archive));
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&StoredArchive> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, archive)| archive)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
