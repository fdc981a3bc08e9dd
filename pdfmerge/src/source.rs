//! Ordered list of merge sources.
//!
//! A [`SourceList`] holds decoded documents in the order they will be merged.
//! Every entry gets a [`SourceId`] when it is appended; ids are never reused
//! within a list, so they stay valid handles for later removals and moves
//! even after other entries have been rearranged.
//!
//! Positions are always dense: after any sequence of operations they are
//! exactly `0..len`, with no gaps or duplicates.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::codec::LopdfCodec;
//! use pdfmerge::document::DocumentHandle;
//! use pdfmerge::source::SourceList;
//!
//! # fn example(a: &[u8], b: &[u8]) -> pdfmerge::Result<()> {
//! let codec = LopdfCodec::new();
//! let mut sources = SourceList::new();
//! let first = sources.append(DocumentHandle::decode(&codec, a, "a.pdf")?);
//! sources.append(DocumentHandle::decode(&codec, b, "b.pdf")?);
//!
//! // Put a.pdf after b.pdf.
//! sources.move_to(first, 1)?;
//! # Ok(())
//! # }
//! ```

use crate::document::DocumentHandle;
use crate::error::{PdfMergeError, Result};
use serde::Serialize;
use std::fmt;

/// Opaque identifier of an entry in a [`SourceList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SourceId(u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// One entry of a [`SourceList`].
#[derive(Debug, Clone)]
pub struct SourceEntry<D> {
    id: SourceId,
    handle: DocumentHandle<D>,
    position: usize,
}

impl<D> SourceEntry<D> {
    /// Identifier of this entry.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// The decoded document.
    pub fn handle(&self) -> &DocumentHandle<D> {
        &self.handle
    }

    /// Current merge position, 0-based.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Documents to merge, in merge order.
#[derive(Debug, Clone)]
pub struct SourceList<D> {
    // Kept sorted by position, so `entries[i].position == i`.
    entries: Vec<SourceEntry<D>>,
    next_id: u64,
}

impl<D> SourceList<D> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a document at the end of the list.
    ///
    /// Returns the id of the new entry; its position is the previous length.
    pub fn append(&mut self, handle: DocumentHandle<D>) -> SourceId {
        let id = SourceId(self.next_id);
        self.next_id += 1;

        self.entries.push(SourceEntry {
            id,
            handle,
            position: self.entries.len(),
        });

        id
    }

    /// Remove an entry.
    ///
    /// Entries after it move up by one. Removing an id that is not present is
    /// a no-op and returns `None`.
    pub fn remove(&mut self, id: SourceId) -> Option<DocumentHandle<D>> {
        let index = self.index_of(id)?;
        let entry = self.entries.remove(index);
        self.renumber(index..self.entries.len());
        Some(entry.handle)
    }

    /// Move an entry to `new_position`.
    ///
    /// Entries between the old and new position shift by exactly one to make
    /// room; everything else keeps its position.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::OutOfRange`] if `new_position >= len`
    /// - [`PdfMergeError::UnknownSource`] if `id` is not in the list
    pub fn move_to(&mut self, id: SourceId, new_position: usize) -> Result<()> {
        if new_position >= self.entries.len() {
            return Err(PdfMergeError::OutOfRange {
                position: new_position,
                len: self.entries.len(),
            });
        }

        let old_position = self
            .index_of(id)
            .ok_or(PdfMergeError::UnknownSource { id })?;

        if old_position < new_position {
            self.entries[old_position..=new_position].rotate_left(1);
            self.renumber(old_position..new_position + 1);
        } else if old_position > new_position {
            self.entries[new_position..=old_position].rotate_right(1);
            self.renumber(new_position..old_position + 1);
        }

        Ok(())
    }

    /// Handles in merge order.
    pub fn snapshot_ordered(&self) -> Vec<&DocumentHandle<D>> {
        self.entries.iter().map(|entry| &entry.handle).collect()
    }

    /// Entries in merge order.
    pub fn entries(&self) -> &[SourceEntry<D>] {
        &self.entries
    }

    /// Ids in merge order.
    pub fn ordered_ids(&self) -> Vec<SourceId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    /// Look up a handle by id.
    pub fn get(&self, id: SourceId) -> Option<&DocumentHandle<D>> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.handle)
    }

    /// Current position of an id.
    pub fn position_of(&self, id: SourceId) -> Option<usize> {
        self.index_of(id)
    }

    /// Sum of page counts over all entries.
    pub fn total_pages(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.handle.page_count())
            .sum()
    }

    fn index_of(&self, id: SourceId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn renumber(&mut self, range: std::ops::Range<usize>) {
        for index in range {
            self.entries[index].position = index;
        }
    }
}

impl<D> Default for SourceList<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> FromIterator<DocumentHandle<D>> for SourceList<D> {
    fn from_iter<I: IntoIterator<Item = DocumentHandle<D>>>(iter: I) -> Self {
        let mut list = Self::new();
        for handle in iter {
            list.append(handle);
        }
        list
    }
}
