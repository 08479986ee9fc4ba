use glam::Vec2;

use crate::collision::rect::ColRect;

/// How far beyond the view sprites keep simulating, in pixels.
pub const UPDATE_MARGIN: f32 = 256.0;

/// Scrolling view over the level. World units are pixels and y grows
/// downward. Hosts read `view_rect` each frame and build their own
/// projection from it.
pub struct Camera {
    view: Vec2,
    /// World point at the middle of the view.
    pub center: Vec2,
    /// Level rect the view stays inside, once known.
    limits: Option<ColRect>,
    /// How much the view trails its target. 0.0 locks straight on,
    /// values toward 1.0 drift after it.
    pub follow_lag: f32,
    /// Extra simulation margin around the view.
    pub update_margin: f32,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        let view = Vec2::new(width, height);
        Self {
            view,
            center: view * 0.5,
            limits: None,
            follow_lag: 0.0,
            update_margin: UPDATE_MARGIN,
        }
    }

    /// The world rectangle currently in view.
    pub fn view_rect(&self) -> ColRect {
        let corner = self.center - self.view * 0.5;
        ColRect::new(corner.x, corner.y, self.view.x, self.view.y)
    }

    /// The view grown by the update margin on every side; sprites
    /// outside it sleep.
    pub fn update_range(&self) -> ColRect {
        self.view_rect()
            .grown(self.update_margin * 2.0, self.update_margin * 2.0)
    }

    /// Keep the view inside `area` from now on.
    pub fn confine(&mut self, area: ColRect) {
        self.limits = Some(area);
        self.keep_inside();
    }

    /// Jump straight to `target`.
    pub fn snap_to(&mut self, target: Vec2) {
        self.center = target;
        self.keep_inside();
    }

    /// Trail `target` by the configured lag. Call once per frame with
    /// that frame's speed factor so the drift rate does not depend on
    /// the frame rate.
    pub fn follow(&mut self, target: Vec2, speed_factor: f32) {
        if self.follow_lag <= 0.0 {
            self.snap_to(target);
            return;
        }
        let blend = 1.0 - self.follow_lag.clamp(0.0, 0.99).powf(speed_factor);
        self.center += (target - self.center) * blend;
        self.keep_inside();
    }

    /// Whether any part of `rect` is on screen.
    pub fn sees(&self, rect: &ColRect) -> bool {
        self.view_rect().intersects(rect)
    }

    fn keep_inside(&mut self) {
        let Some(area) = self.limits else { return };
        let half = self.view * 0.5;
        // An axis narrower than the view centers on the level instead.
        self.center.x = if self.view.x >= area.w {
            area.left() + area.w * 0.5
        } else {
            self.center.x.max(area.left() + half.x).min(area.right() - half.x)
        };
        self.center.y = if self.view.y >= area.h {
            area.top() + area.h * 0.5
        } else {
            self.center.y.max(area.top() + half.y).min(area.bottom() - half.y)
        };
    }
}
