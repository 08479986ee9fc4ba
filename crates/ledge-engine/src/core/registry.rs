//! Sprite ownership and lookup.
//!
//! The registry is the only owner of level sprites. Everything else holds
//! a `SpriteId` and looks it up per use; a failed lookup means the sprite
//! is gone. Iteration order doubles as update order and tracks draw order
//! when sprites are moved to front or back.

use std::collections::HashMap;
use std::mem;

use log::warn;

use crate::api::types::SpriteId;
use crate::core::uid::{UidAllocator, UidError};
use crate::core::zorder::{ZOrderIndex, Z_DELTA};
use crate::sprites::kind::{ArrayBucket, SpriteKind};
use crate::sprites::sprite::Sprite;

/// Which coordinates a position search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionMatch {
    /// Placement position only.
    Start,
    /// Placement and current position must both match.
    StartAndCurrent,
    /// Either position may match.
    StartOrCurrent,
}

/// Half-pixel tolerance for position searches.
const POS_MATCH_EPS: f32 = 0.5;

pub struct Registry {
    sprites: Vec<Sprite>,
    by_uid: HashMap<SpriteId, usize>,
    allocator: UidAllocator,
    zorder: ZOrderIndex,
    /// Set by `delete_all_delayed`; the wipe happens at the frame
    /// boundary.
    wipe_pending: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sprites: Vec::with_capacity(capacity),
            by_uid: HashMap::with_capacity(capacity),
            allocator: UidAllocator::new(),
            zorder: ZOrderIndex::new(),
            wipe_pending: false,
        }
    }

    /// Add a sprite, assigning its uid and resolving its z position.
    ///
    /// A sprite arriving with a pre-assigned uid (level data) keeps it if
    /// it is free; a clash falls back to a fresh uid with a warning.
    /// Uid exhaustion is fatal and aborts the add.
    pub fn add(&mut self, mut sprite: Sprite) -> Result<SpriteId, UidError> {
        let uid = match sprite.uid {
            Some(requested) if self.allocator.claim(requested) => requested,
            Some(requested) => {
                let fresh = self.allocator.allocate()?;
                warn!(
                    "uid {} already in use, sprite '{}' gets uid {}",
                    requested.0, sprite.name, fresh.0
                );
                fresh
            }
            None => self.allocator.allocate()?,
        };
        sprite.uid = Some(uid);

        let requested_z = if sprite.pos_z > 0.0 {
            sprite.pos_z
        } else {
            sprite.massivity.default_z()
        };
        sprite.pos_z = self.zorder.next_z(sprite.massivity, requested_z);
        sprite.editor_pos_z = self
            .zorder
            .next_editor_z(sprite.massivity, sprite.editor_pos_z);

        self.by_uid.insert(uid, self.sprites.len());
        self.sprites.push(sprite);
        Ok(uid)
    }

    /// Remove a sprite immediately, releasing its uid and clearing any
    /// ground references that pointed at it.
    pub fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        let idx = self.by_uid.remove(&id)?;
        let sprite = self.sprites.remove(idx);
        self.reindex_from(idx);
        if let Err(err) = self.allocator.release(id) {
            warn!("releasing uid {}: {}", id.0, err);
        }
        for s in &mut self.sprites {
            if s.ground_object == Some(id) {
                s.ground_object = None;
            }
        }
        Some(sprite)
    }

    /// Flag a sprite for removal at the frame boundary.
    pub fn mark_destroyed(&mut self, id: SpriteId) {
        if let Some(s) = self.get_mut(id) {
            s.destroy();
        }
    }

    /// Remove every sprite now and reset identity and z bookkeeping.
    pub fn delete_all(&mut self) {
        self.sprites.clear();
        self.by_uid.clear();
        self.allocator.reset();
        self.zorder.reset();
        self.wipe_pending = false;
    }

    /// Flag every sprite for removal; the wipe and the bookkeeping reset
    /// happen at the frame boundary so in-flight iteration stays valid.
    pub fn delete_all_delayed(&mut self) {
        for s in &mut self.sprites {
            s.destroy();
        }
        self.wipe_pending = true;
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.by_uid.get(&id).map(|&idx| &self.sprites[idx])
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        let idx = *self.by_uid.get(&id)?;
        Some(&mut self.sprites[idx])
    }

    /// Lowest-z live sprite of the given kind (payload ignored).
    pub fn get_first_of_kind(&self, kind: &SpriteKind) -> Option<&Sprite> {
        self.iter_kind(kind)
            .min_by(|a, b| a.pos_z.total_cmp(&b.pos_z))
    }

    /// Highest-z live sprite of the given kind (payload ignored).
    pub fn get_last_of_kind(&self, kind: &SpriteKind) -> Option<&Sprite> {
        self.iter_kind(kind)
            .max_by(|a, b| a.pos_z.total_cmp(&b.pos_z))
    }

    /// Find a live sprite by placement or current position.
    pub fn get_at_position(
        &self,
        x: f32,
        y: f32,
        kind: Option<&SpriteKind>,
        mode: PositionMatch,
    ) -> Option<&Sprite> {
        self.sprites.iter().find(|s| {
            if !s.is_live() {
                return false;
            }
            if let Some(k) = kind {
                if mem::discriminant(&s.kind) != mem::discriminant(k) {
                    return false;
                }
            }
            let at_start = near(s.start_pos.x, x) && near(s.start_pos.y, y);
            let at_current = near(s.pos.x, x) && near(s.pos.y, y);
            match mode {
                PositionMatch::Start => at_start,
                PositionMatch::StartAndCurrent => at_start && at_current,
                PositionMatch::StartOrCurrent => at_start || at_current,
            }
        })
    }

    /// Raise a sprite above everything in its massivity bucket, in both
    /// z and iteration order.
    pub fn move_to_front(&mut self, id: SpriteId) {
        let Some(idx) = self.by_uid.get(&id).copied() else {
            return;
        };
        let bucket = self.sprites[idx].massivity;
        let z = self.zorder.front_z(bucket);
        let mut sprite = self.sprites.remove(idx);
        sprite.pos_z = z;
        self.sprites.push(sprite);
        self.reindex_from(idx);
    }

    /// Drop a sprite below everything in its massivity bucket, in both z
    /// and iteration order.
    pub fn move_to_back(&mut self, id: SpriteId) {
        let Some(idx) = self.by_uid.get(&id).copied() else {
            return;
        };
        let bucket = self.sprites[idx].massivity;
        let lowest = self
            .sprites
            .iter()
            .filter(|s| s.massivity == bucket && s.uid != Some(id) && s.is_live())
            .map(|s| s.pos_z)
            .fold(f32::INFINITY, f32::min);
        let z = if lowest.is_finite() {
            lowest - Z_DELTA
        } else {
            bucket.default_z()
        };
        let mut sprite = self.sprites.remove(idx);
        sprite.pos_z = z;
        self.sprites.insert(0, sprite);
        self.reindex_from(0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn count_in_array(&self, array: ArrayBucket) -> usize {
        self.sprites
            .iter()
            .filter(|s| s.is_live() && s.array == array)
            .count()
    }

    /// Uids of every live sprite, in iteration order. Passes snapshot
    /// this before mutating so sprites added mid-pass wait a frame.
    pub fn live_ids(&self) -> Vec<SpriteId> {
        self.sprites
            .iter()
            .filter(|s| s.is_live())
            .filter_map(|s| s.uid)
            .collect()
    }

    /// Uids of live sprites sorted for drawing, lowest z first.
    /// `editor_order` sorts on the editor axis instead.
    pub fn sorted_draw_ids(&self, editor_order: bool) -> Vec<SpriteId> {
        let mut ids: Vec<(f32, SpriteId)> = self
            .sprites
            .iter()
            .filter(|s| s.is_live())
            .filter_map(|s| {
                let z = if editor_order { s.editor_z() } else { s.pos_z };
                s.uid.map(|id| (z, id))
            })
            .collect();
        ids.sort_by(|a, b| a.0.total_cmp(&b.0));
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Frame boundary maintenance: run the pending wipe or remove every
    /// flagged sprite, release their uids and clear ground references
    /// left dangling. Returns the removed uids so callers can scrub
    /// references of their own (the player's ground or held object).
    pub fn end_of_frame(&mut self) -> Vec<SpriteId> {
        if self.wipe_pending {
            let removed = self.sprites.iter().filter_map(|s| s.uid).collect();
            self.delete_all();
            return removed;
        }

        let removed: Vec<SpriteId> = self
            .sprites
            .iter()
            .filter(|s| s.auto_destroy)
            .filter_map(|s| s.uid)
            .collect();
        if removed.is_empty() {
            return removed;
        }

        self.sprites.retain(|s| !s.auto_destroy);
        self.by_uid.clear();
        for (idx, s) in self.sprites.iter().enumerate() {
            if let Some(uid) = s.uid {
                self.by_uid.insert(uid, idx);
            }
        }
        for id in &removed {
            if let Err(err) = self.allocator.release(*id) {
                warn!("releasing uid {}: {}", id.0, err);
            }
        }
        for s in &mut self.sprites {
            if let Some(gid) = s.ground_object {
                if !self.by_uid.contains_key(&gid) {
                    s.ground_object = None;
                }
            }
        }
        removed
    }

    pub fn uid_in_use(&self, id: SpriteId) -> bool {
        self.allocator.is_in_use(id)
    }

    // -- Internals for movement and collision dispatch --

    pub(crate) fn index_of(&self, id: SpriteId) -> Option<usize> {
        self.by_uid.get(&id).copied()
    }

    /// Take a sprite out of its slot, leaving an inert placeholder that
    /// queries skip. Pair with `put_back`.
    pub(crate) fn take_slot(&mut self, idx: usize) -> Sprite {
        mem::take(&mut self.sprites[idx])
    }

    pub(crate) fn put_back(&mut self, idx: usize, sprite: Sprite) {
        self.sprites[idx] = sprite;
    }

    fn iter_kind<'a>(&'a self, kind: &SpriteKind) -> impl Iterator<Item = &'a Sprite> + 'a {
        let disc = mem::discriminant(kind);
        self.sprites
            .iter()
            .filter(move |s| s.is_live() && mem::discriminant(&s.kind) == disc)
    }

    fn reindex_from(&mut self, idx: usize) {
        for (i, s) in self.sprites.iter().enumerate().skip(idx) {
            if let Some(uid) = s.uid {
                self.by_uid.insert(uid, i);
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn near(a: f32, b: f32) -> bool {
    (a - b).abs() < POS_MATCH_EPS
}
