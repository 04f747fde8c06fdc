use bevy::prelude::*;
use crate::{
    components::{Body, Velocity},
    config::{CameraMode, GameConfig},
    input::PointerState,
    player::Player,
};

/// World-to-screen translation: `screen = world - world_offset - look`.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewOffset {
    pub world: Vec2,
    /// Cursor-driven bias added on top of `world` when drawing.
    pub look: Vec2,
}

impl ViewOffset {
    pub fn total(&self) -> Vec2 { self.world + self.look }

    pub fn to_screen(&self, world_position: Vec2) -> Vec2 {
        world_position - self.total()
    }
}

pub fn look_ahead(pointer: Vec2, screen_center: Vec2, perception: f32) -> Vec2 {
    (pointer - screen_center) * perception
}

fn scroll_axis(near_edge: f32, far_edge: f32, offset: f32, velocity: f32, viewport: f32, margin: f32) -> f32 {
    let pushing_far = far_edge - offset >= viewport - margin && velocity > 0.0;
    let pushing_near = near_edge - offset <= margin && velocity < 0.0;
    if pushing_far || pushing_near { offset + velocity } else { offset }
}

/// Dead-zone scroll: an axis moves with the player only while the player sits
/// inside that axis' edge margin and is heading toward the edge.
pub fn scroll(body: &Body, velocity: Vec2, offset: Vec2, viewport: Vec2, margin: Vec2) -> Vec2 {
    Vec2::new(
        scroll_axis(body.left(), body.right(), offset.x, velocity.x, viewport.x, margin.x),
        scroll_axis(body.top(), body.bottom(), offset.y, velocity.y, viewport.y, margin.y),
    )
}

/// Offset that puts the body's centre at the middle of the viewport.
pub fn follow(body: &Body, viewport: Vec2) -> Vec2 {
    body.center() - viewport / 2.0
}

pub fn update_view_offset(
    config: Res<GameConfig>,
    pointer: Res<PointerState>,
    player_query: Query<(&Body, &Velocity, &Player)>,
    mut view: ResMut<ViewOffset>,
) {
    let Ok((body, velocity, player)) = player_query.get_single() else { return; };
    view.look = if config.enable_look_ahead {
        look_ahead(pointer.position, config.screen_center(), player.perception)
    } else {
        Vec2::ZERO
    };
    view.world = match config.camera_mode {
        CameraMode::DeadZone => scroll(body, velocity.0, view.world, config.viewport, config.scroll_margin()),
        CameraMode::LockedFollow => follow(body, config.viewport),
    };
}
