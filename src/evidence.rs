use serde::{Deserialize, Serialize};

use crate::image::ImagePayload;

/// Number of evidence slots in the gallery.
pub const SLOT_COUNT: usize = 6;

/// How many tags a slot needs before analysis considers it done.
pub const TAG_TARGET: usize = 5;

/// One fixed evidence position. `tags == None` means the image has not been
/// analyzed yet, which is distinct from `Some(vec![])`: analyzed, nothing
/// usable returned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSlot {
    pub index: usize,
    pub image: Option<ImagePayload>,
    pub tags: Option<Vec<String>>,
}

impl EvidenceSlot {
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            image: None,
            tags: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.image.is_some()
    }

    /// True once the slot has been through analysis at least once.
    pub fn is_analyzed(&self) -> bool {
        self.is_occupied() && self.tags.is_some()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.as_ref().map_or(0, Vec::len)
    }
}

/// The ordered sequence of all slots. The length never changes and slots are
/// never reordered; only their contents mutate in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSet {
    slots: Vec<EvidenceSlot>,
}

impl EvidenceSet {
    pub fn empty(slot_count: usize) -> Self {
        Self {
            slots: (0..slot_count).map(EvidenceSlot::empty).collect(),
        }
    }

    pub(crate) fn from_slots(slots: Vec<EvidenceSlot>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[EvidenceSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&EvidenceSlot> {
        self.slots.get(index)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut EvidenceSlot> {
        self.slots.get_mut(index)
    }

    pub fn occupied(&self) -> impl Iterator<Item = &EvidenceSlot> {
        self.slots.iter().filter(|slot| slot.is_occupied())
    }

    /// True when at least one slot holds an image and every occupied slot
    /// has been analyzed at least once.
    pub fn ready_for_story(&self) -> bool {
        self.occupied().next().is_some() && self.occupied().all(EvidenceSlot::is_analyzed)
    }
}
