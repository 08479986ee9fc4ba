use bytemuck::{Pod, Zeroable};

use crate::api::types::ImageId;
use crate::core::registry::Registry;
use crate::render::camera::Camera;
use crate::sprites::sprite::Sprite;

/// Per-sprite draw data handed to the host renderer.
/// Flat protocol: 8 floats = 32 bytes stride, shareable as raw memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct DrawInstance {
    /// Top-left corner in world space.
    pub x: f32,
    pub y: f32,
    /// Rendered size in world units.
    pub w: f32,
    pub h: f32,
    /// Rotation in radians around the frame center.
    pub rotation: f32,
    /// Image table index (see `assets::images::ImageSet`).
    pub image: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Depth the instance was sorted by; back to front.
    pub z: f32,
}

impl DrawInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Draw list for one frame, ordered back to front.
pub struct DrawBuffer {
    pub instances: Vec<DrawInstance>,
}

impl DrawBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(512),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: DrawInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }
}

impl Default for DrawBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn instance_for(sprite: &Sprite, z: f32, image: ImageId) -> DrawInstance {
    DrawInstance {
        x: sprite.pos.x,
        y: sprite.pos.y,
        w: sprite.size.x,
        h: sprite.size.y,
        rotation: sprite.rotation,
        image: image.0 as f32,
        alpha: sprite.alpha,
        z,
    }
}

/// Fill `buf` with everything visible this frame, back to front.
///
/// `editor_order` switches to the editor depth axis and draws imageless
/// markers (stoppers, unset tiles) with the placeholder image so they
/// can be picked.
pub fn build_draw_buffer(
    reg: &Registry,
    player: Option<&Sprite>,
    camera: &Camera,
    editor_order: bool,
    buf: &mut DrawBuffer,
) {
    buf.clear();
    for id in reg.sorted_draw_ids(editor_order) {
        let sprite = match reg.get(id) {
            Some(s) if s.is_live() => s,
            _ => continue,
        };
        if !camera.sees(&sprite.frame_rect()) {
            continue;
        }
        let z = if editor_order {
            sprite.editor_z()
        } else {
            sprite.pos_z
        };
        match sprite.current_image() {
            Some(image) => buf.push(instance_for(sprite, z, image)),
            None if editor_order => buf.push(instance_for(sprite, z, ImageId::PLACEHOLDER)),
            None => {}
        }
    }
    // The player band sits above every sprite band, so appending keeps
    // the back-to-front order.
    if let Some(p) = player {
        if p.is_live() && camera.sees(&p.frame_rect()) {
            if let Some(image) = p.current_image() {
                buf.push(instance_for(p, p.pos_z, image));
            } else if editor_order {
                buf.push(instance_for(p, p.pos_z, ImageId::PLACEHOLDER));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites::kind::{ArrayBucket, Massivity, SpriteKind};
    use glam::Vec2;

    fn visible_camera() -> Camera {
        let mut cam = Camera::new(640.0, 480.0);
        cam.snap_to(Vec2::new(320.0, 240.0));
        cam
    }

    fn block(pos: Vec2, massivity: Massivity, image: u32) -> Sprite {
        Sprite::new(SpriteKind::Terrain)
            .with_pos(pos)
            .with_size(Vec2::new(32.0, 32.0))
            .with_array(ArrayBucket::Massive)
            .with_massivity(massivity)
            .with_image(ImageId(image))
    }

    #[test]
    fn instances_flatten_to_the_declared_stride() {
        assert_eq!(std::mem::size_of::<DrawInstance>(), DrawInstance::STRIDE_BYTES);

        let mut buf = DrawBuffer::new();
        buf.push(DrawInstance {
            x: 7.0,
            y: 8.0,
            ..Default::default()
        });
        let floats: &[f32] = bytemuck::cast_slice(&buf.instances);
        assert_eq!(floats.len(), DrawInstance::FLOATS);
        assert_eq!(&floats[..2], &[7.0, 8.0]);
    }

    #[test]
    fn draws_back_to_front() {
        let mut reg = Registry::new();
        // Massive band sits above the passive band.
        reg.add(block(Vec2::new(0.0, 0.0), Massivity::Massive, 2)).unwrap();
        reg.add(block(Vec2::new(40.0, 0.0), Massivity::Passive, 1)).unwrap();

        let mut buf = DrawBuffer::new();
        build_draw_buffer(&reg, None, &visible_camera(), false, &mut buf);
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.instances[0].image, 1.0);
        assert_eq!(buf.instances[1].image, 2.0);
        assert!(buf.instances[0].z < buf.instances[1].z);
    }

    #[test]
    fn culls_what_the_camera_cannot_see() {
        let mut reg = Registry::new();
        reg.add(block(Vec2::new(0.0, 0.0), Massivity::Massive, 1)).unwrap();
        reg.add(block(Vec2::new(5000.0, 0.0), Massivity::Massive, 2)).unwrap();

        let mut buf = DrawBuffer::new();
        build_draw_buffer(&reg, None, &visible_camera(), false, &mut buf);
        assert_eq!(buf.instance_count(), 1);
        assert_eq!(buf.instances[0].image, 1.0);
    }

    #[test]
    fn markers_appear_only_in_editor_order() {
        let mut reg = Registry::new();
        reg.add(
            Sprite::new(SpriteKind::EnemyStopper)
                .with_pos(Vec2::new(64.0, 64.0))
                .with_size(Vec2::new(32.0, 32.0))
                .with_array(ArrayBucket::Passive),
        )
        .unwrap();

        let mut buf = DrawBuffer::new();
        build_draw_buffer(&reg, None, &visible_camera(), false, &mut buf);
        assert_eq!(buf.instance_count(), 0);

        build_draw_buffer(&reg, None, &visible_camera(), true, &mut buf);
        assert_eq!(buf.instance_count(), 1);
        assert_eq!(buf.instances[0].image, ImageId::PLACEHOLDER.0 as f32);
    }

    #[test]
    fn player_is_drawn_on_top() {
        let mut reg = Registry::new();
        reg.add(block(Vec2::new(100.0, 100.0), Massivity::Massive, 3)).unwrap();

        let mut avatar = Sprite::new(SpriteKind::Player)
            .with_pos(Vec2::new(100.0, 60.0))
            .with_size(Vec2::new(32.0, 48.0))
            .with_pos_z(crate::core::zorder::Z_PLAYER)
            .with_image(ImageId(9));
        avatar.uid = Some(crate::api::types::SpriteId::PLAYER);

        let mut buf = DrawBuffer::new();
        build_draw_buffer(&reg, Some(&avatar), &visible_camera(), false, &mut buf);
        assert_eq!(buf.instance_count(), 2);
        let last = &buf.instances[1];
        assert_eq!(last.image, 9.0);
        assert!(last.z > buf.instances[0].z);
    }
}
