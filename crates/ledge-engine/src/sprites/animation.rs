//! Frame animation for sprites.
//!
//! A sequence of image ids cycled on a speed-factor timer. Sprites without
//! an animation just draw their static image.

use crate::api::types::ImageId;

/// Animation state carried by a sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Image per frame.
    pub frames: Vec<ImageId>,
    /// Speed-factor frames each image stays up.
    pub frame_time: f32,
    pub looping: bool,
    pub playing: bool,
    index: usize,
    timer: f32,
}

impl Animation {
    pub fn new(frames: Vec<ImageId>, frame_time: f32, looping: bool) -> Self {
        Self {
            frames,
            frame_time,
            looping,
            playing: true,
            index: 0,
            timer: 0.0,
        }
    }

    /// Restart from the first frame.
    pub fn restart(&mut self) {
        self.index = 0;
        self.timer = 0.0;
        self.playing = true;
    }

    /// Swap in a different frame sequence, restarting only if it differs.
    pub fn set_frames(&mut self, frames: Vec<ImageId>, frame_time: f32) {
        if self.frames != frames {
            self.frames = frames;
            self.frame_time = frame_time;
            self.restart();
        }
    }

    pub fn current(&self) -> Option<ImageId> {
        self.frames.get(self.index).copied()
    }

    pub fn is_finished(&self) -> bool {
        !self.looping && self.index + 1 >= self.frames.len()
    }

    /// Advance by `sf` speed-factor frames. Returns true if the visible
    /// frame changed.
    pub fn tick(&mut self, sf: f32) -> bool {
        if !self.playing || self.frames.is_empty() || self.frame_time <= 0.0 {
            return false;
        }
        self.timer += sf;
        let mut changed = false;
        while self.timer >= self.frame_time {
            self.timer -= self.frame_time;
            self.index += 1;
            changed = true;
            if self.index >= self.frames.len() {
                if self.looping {
                    self.index = 0;
                } else {
                    self.index = self.frames.len() - 1;
                    self.playing = false;
                    break;
                }
            }
        }
        changed
    }
}
