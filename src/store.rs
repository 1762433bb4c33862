use std::fs;
use std::path::PathBuf;

use crate::evidence::{EvidenceSet, EvidenceSlot};

/// Durable per-slot records under a data directory, surviving restarts.
/// Every slot is its own JSON file so a failed write can never corrupt a
/// sibling record.
///
/// The in-memory [`EvidenceSet`](crate::evidence::EvidenceSet) stays
/// authoritative for the running session: reads fall back to empty slots and
/// writes are logged and swallowed rather than surfaced.
#[derive(Clone, Debug)]
pub struct EvidenceStore {
    dir: PathBuf,
}

impl EvidenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("slot_{index}.json"))
    }

    /// Loads all `slot_count` slots. A missing, unreadable or malformed
    /// record resolves to an empty slot; this never fails.
    pub fn load(&self, slot_count: usize) -> EvidenceSet {
        let slots = (0..slot_count)
            .map(|index| {
                self.load_slot(index)
                    .unwrap_or_else(|| EvidenceSlot::empty(index))
            })
            .collect();
        EvidenceSet::from_slots(slots)
    }

    fn load_slot(&self, index: usize) -> Option<EvidenceSlot> {
        let path = self.slot_path(index);
        if !path.exists() {
            return None;
        }
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("failed to read {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str::<EvidenceSlot>(&data) {
            Ok(slot) if slot.index == index => Some(slot),
            Ok(slot) => {
                log::warn!(
                    "slot record {} carries index {}, ignoring it",
                    path.display(),
                    slot.index
                );
                None
            }
            Err(e) => {
                log::warn!("malformed slot record {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Upserts one slot record. Failures are logged and swallowed.
    pub fn save_slot(&self, slot: &EvidenceSlot) {
        if let Err(e) = self.write_slot(slot) {
            log::error!("failed to persist slot {}: {}", slot.index, e);
        }
    }

    fn write_slot(&self, slot: &EvidenceSlot) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_string_pretty(slot)?;
        fs::write(self.slot_path(slot.index), data)
    }

    /// Writes every slot in the set, one record per index.
    pub fn save(&self, set: &EvidenceSet) {
        for slot in set.slots() {
            self.save_slot(slot);
        }
    }

    /// Removes every persisted slot record.
    pub fn clear(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let is_slot_record = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("slot_") && name.ends_with(".json"));
            if is_slot_record {
                if let Err(e) = fs::remove_file(&path) {
                    log::warn!("failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }
}
