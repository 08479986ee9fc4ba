//! Sprite identity allocation.
//!
//! Uids are small positive integers handed out smallest-first so freshly
//! loaded levels get compact, predictable ids. Released uids return to a
//! pool and are preferred over fresh ones.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::api::types::SpriteId;

/// How many fresh uids are added to the pool at once when it runs dry.
const REFILL_BLOCK: u32 = 10;

/// Errors from the uid allocator.
///
/// `Exhausted` is fatal: the caller must abort the operation that needed
/// the uid. The release errors indicate a bookkeeping bug in the caller
/// and are safe to log and ignore.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UidError {
    #[error("sprite uid space exhausted")]
    Exhausted,
    #[error("uid {0} was never allocated")]
    NotAllocated(u32),
    #[error("uid {0} is already free")]
    AlreadyFree(u32),
}

/// Allocator for sprite uids.
///
/// Tracks a pool of free ids plus a high-water mark: every id below the
/// mark has been handed out at some point, everything at or above it is
/// untouched. Allocation always returns the smallest free id.
#[derive(Debug)]
pub struct UidAllocator {
    free: BTreeSet<u32>,
    /// Lowest uid that has never been handed out or pooled.
    mark: u32,
}

impl UidAllocator {
    pub fn new() -> Self {
        Self {
            free: BTreeSet::new(),
            // Uid 0 belongs to the player permanently.
            mark: 1,
        }
    }

    /// Allocate the smallest unused uid, refilling the pool from the
    /// high-water mark when it is empty.
    pub fn allocate(&mut self) -> Result<SpriteId, UidError> {
        if self.free.is_empty() {
            self.refill()?;
        }
        let uid = self.free.pop_first().ok_or(UidError::Exhausted)?;
        Ok(SpriteId(uid))
    }

    /// Return a uid to the pool.
    pub fn release(&mut self, id: SpriteId) -> Result<(), UidError> {
        if id == SpriteId::PLAYER || id.0 >= self.mark {
            return Err(UidError::NotAllocated(id.0));
        }
        if !self.free.insert(id.0) {
            return Err(UidError::AlreadyFree(id.0));
        }
        Ok(())
    }

    /// Whether a uid is currently assigned to a live sprite.
    /// The player uid is always in use.
    pub fn is_in_use(&self, id: SpriteId) -> bool {
        id == SpriteId::PLAYER || (id.0 < self.mark && !self.free.contains(&id.0))
    }

    /// Make every uid below `mark` known to the allocator, pooling the
    /// ones not yet handed out. Used when loading levels that carry
    /// pre-assigned uids. No-op if the allocator is already past `mark`.
    pub fn reserve_up_to(&mut self, mark: u32) {
        if mark > self.mark {
            self.free.extend(self.mark..mark);
            self.mark = mark;
        }
    }

    /// Claim a specific uid (pre-assigned by level data).
    /// Returns false if the uid is already in use.
    pub fn claim(&mut self, id: SpriteId) -> bool {
        if id == SpriteId::PLAYER {
            return false;
        }
        self.reserve_up_to(id.0.saturating_add(1));
        self.free.remove(&id.0)
    }

    /// Forget everything: empty pool, mark back to the first usable uid.
    pub fn reset(&mut self) {
        self.free.clear();
        self.mark = 1;
    }

    /// Highest uid ever considered, exclusive.
    pub fn high_water_mark(&self) -> u32 {
        self.mark
    }

    fn refill(&mut self) -> Result<(), UidError> {
        let end = self.mark.saturating_add(REFILL_BLOCK);
        if end == self.mark {
            return Err(UidError::Exhausted);
        }
        self.free.extend(self.mark..end);
        self.mark = end;
        Ok(())
    }
}

impl Default for UidAllocator {
    fn default() -> Self {
        Self::new()
    }
}
