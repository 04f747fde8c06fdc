use std::sync::Arc;

use bevy::prelude::*;

use crate::mask::CollisionMask;

#[derive(Component, Deref, DerefMut, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

/// Axis-aligned rect in screen-style pixels: `position` is the top-left corner, +y points down.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(top_left: Vec2, size: Vec2) -> Self {
        Self { position: top_left, size }
    }

    pub fn centered_at(center: Vec2, size: Vec2) -> Self {
        Self { position: center - size / 2.0, size }
    }

    pub fn center(&self) -> Vec2 { self.position + self.size / 2.0 }
    pub fn left(&self) -> f32 { self.position.x }
    pub fn right(&self) -> f32 { self.position.x + self.size.x }
    pub fn top(&self) -> f32 { self.position.y }
    pub fn bottom(&self) -> f32 { self.position.y + self.size.y }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

/// Current collision mask of an actor, centred on its body.
#[derive(Component, Deref, Debug, Clone)]
pub struct ActorMask(pub Arc<CollisionMask>);

impl ActorMask {
    /// Top-left of the mask when laid over `body`.
    pub fn origin(&self, body: &Body) -> Vec2 {
        body.center() - self.0.size().as_vec2() / 2.0
    }

    pub fn touches(&self, body: &Body, other: &ActorMask, other_body: &Body) -> bool {
        let offset = (other.origin(other_body) - self.origin(body)).round().as_ivec2();
        self.0.overlaps(&other.0, offset)
    }
}
