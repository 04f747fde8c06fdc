use bevy::prelude::*;
use crate::components::Velocity;

/// Sprite-sheet frame counter: advances every `ticks_per_frame` ticks while the
/// owner moves and snaps back to the first frame once it stops.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SpriteAnimation {
    pub frame: usize,
    pub frame_count: usize,
    pub ticks_per_frame: u32,
    elapsed: u32,
}

impl SpriteAnimation {
    pub fn new(frame_count: usize, ticks_per_frame: u32) -> Self {
        Self { frame: 0, frame_count: frame_count.max(1), ticks_per_frame: ticks_per_frame.max(1), elapsed: 0 }
    }

    pub fn advance(&mut self, moving: bool) {
        if !moving {
            self.frame = 0;
            self.elapsed = 0;
            return;
        }
        self.elapsed += 1;
        if self.elapsed >= self.ticks_per_frame {
            self.elapsed = 0;
            self.frame = (self.frame + 1) % self.frame_count;
        }
    }
}

pub fn animate_sprites_system(mut query: Query<(&mut SpriteAnimation, &Velocity)>) {
    for (mut animation, velocity) in query.iter_mut() {
        animation.advance(velocity.0 != Vec2::ZERO);
    }
}
