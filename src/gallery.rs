use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::evidence::{EvidenceSet, EvidenceSlot, SLOT_COUNT};
use crate::image::ImagePayload;
use crate::store::EvidenceStore;

/// The in-memory authoritative evidence set. All slot mutations go through
/// here; each one kicks off a fire-and-forget write of the touched record.
///
/// Every slot carries an epoch counter that bumps whenever its image is
/// replaced or cleared. Analysis results are applied against the epoch they
/// were issued for, so a response that raced a slot edit is discarded
/// instead of merged into the wrong image's tags.
pub struct Gallery {
    slots: EvidenceSet,
    epochs: Vec<u64>,
    store: Arc<EvidenceStore>,
}

impl Gallery {
    /// Loads the persisted slots, resolving anything unreadable to empty.
    pub fn open(store: Arc<EvidenceStore>) -> Self {
        let slots = store.load(SLOT_COUNT);
        Self {
            epochs: vec![0; slots.len()],
            slots,
            store,
        }
    }

    pub fn evidence(&self) -> &EvidenceSet {
        &self.slots
    }

    pub fn epoch(&self, index: usize) -> u64 {
        self.epochs.get(index).copied().unwrap_or(0)
    }

    /// Replaces the slot's image after proving the payload decodes. The
    /// previous image and its tags are discarded; the tag state goes back to
    /// "not yet analyzed".
    pub fn set_image(&mut self, index: usize, payload: ImagePayload) -> Result<()> {
        payload.decode()?;
        let slot = self.slot_mut(index)?;
        slot.image = Some(payload);
        slot.tags = None;
        self.bump(index);
        self.persist(index);
        Ok(())
    }

    /// Empties the slot entirely, image and tags both.
    pub fn clear_image(&mut self, index: usize) -> Result<()> {
        let slot = self.slot_mut(index)?;
        slot.image = None;
        slot.tags = None;
        self.bump(index);
        self.persist(index);
        Ok(())
    }

    /// Appends to the slot's ordered tag sequence, never replacing what is
    /// already there. A no-op when the slot holds no image.
    pub fn append_tags(&mut self, index: usize, new_tags: Vec<String>) -> Result<()> {
        let slot = self.slot_mut(index)?;
        if slot.image.is_none() {
            return Ok(());
        }
        slot.tags.get_or_insert_with(Vec::new).extend(new_tags);
        self.persist(index);
        Ok(())
    }

    /// Epoch-guarded append used by the analysis batch: the tags only land
    /// when the slot has not been replaced or cleared since the request was
    /// issued. Returns whether the result was applied.
    pub(crate) fn apply_analysis(&mut self, index: usize, epoch: u64, tags: Vec<String>) -> bool {
        if self.epoch(index) != epoch {
            log::info!("discarding stale analysis result for slot {index}");
            return false;
        }
        let _ = self.append_tags(index, tags);
        true
    }

    /// Removes exactly one tag by position. Out-of-range positions have no
    /// effect.
    pub fn remove_tag(&mut self, index: usize, position: usize) -> Result<()> {
        let slot = self.slot_mut(index)?;
        let mut removed = false;
        if let Some(tags) = slot.tags.as_mut() {
            if position < tags.len() {
                tags.remove(position);
                removed = true;
            }
        }
        if removed {
            self.persist(index);
        }
        Ok(())
    }

    /// Empties every slot and wipes the persisted records.
    pub fn reset(&mut self) {
        self.slots = EvidenceSet::empty(self.slots.len());
        for epoch in &mut self.epochs {
            *epoch += 1;
        }
        self.store.clear();
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut EvidenceSlot> {
        let len = self.slots.len();
        self.slots.slot_mut(index).ok_or_else(|| {
            AppError::Validation(format!("slot index {index} out of range (0..{len})"))
        })
    }

    fn bump(&mut self, index: usize) {
        if let Some(epoch) = self.epochs.get_mut(index) {
            *epoch += 1;
        }
    }

    // Writes are fire and forget: the spawned task logs failures and the
    // in-memory set stays authoritative either way.
    fn persist(&self, index: usize) {
        let Some(slot) = self.slots.slot(index) else {
            return;
        };
        let slot = slot.clone();
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.save_slot(&slot));
    }
}
