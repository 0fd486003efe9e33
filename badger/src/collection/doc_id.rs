use std::fmt::{Display, Formatter};

/// Identity of a document within one collection.
///
/// A `DocId` names an arena slot plus the generation the slot had when the
/// document was stored. Removing a document bumps the slot's generation, so an
/// id kept after removal never aliases a document that later reuses the slot.
///
/// Ids order by slot index first, then generation, which is also insertion
/// order for a collection that never removed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocId {
    index: u32,
    generation: u32,
}

impl DocId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        DocId { index, generation }
    }

    /// Arena slot the document lives in.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot at insertion time.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl Display for DocId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}
