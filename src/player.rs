use bevy::prelude::*;
use crate::{
    animation::SpriteAnimation,
    assets::MaskLibrary,
    bullet::{spawn_bullet, Bullet},
    camera::ViewOffset,
    components::{ActorMask, Body, Velocity},
    config::{GameConfig, PlayerTuning},
    input::{movement_input, requested_skin, AxisInput, PointerState},
};

/// Below this speed a released axis snaps to rest.
pub const SNAP_THRESHOLD: f32 = 0.1;
/// Per-tick multiplier on a released axis still above the snap threshold.
pub const DECAY_FACTOR: f32 = 0.9;
const LEAN_DIVISOR: f32 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heading {
    Left,
    #[default]
    Right,
}

#[derive(Component, Debug, Clone)]
pub struct Player {
    pub character: String,
    pub weapon: String,
    pub bullet_skin: String,
    pub acceleration: f32,
    pub max_speed: f32,
    pub perception: f32,
    pub reload_ticks: i32,
    /// Counts up from `-reload_ticks`; the gun is ready at zero.
    pub loaded: i32,
    pub bullet_speed: f32,
    pub bullet_size: Vec2,
    /// Degrees in `[0, 360)`, counter-clockwise on screen.
    pub angle: f32,
    pub rotation_offset: f32,
    pub heading: Heading,
    pub bullets: Vec<Entity>,
}

impl Player {
    pub fn from_tuning(tuning: &PlayerTuning) -> Self {
        Self {
            character: tuning.character.clone(),
            weapon: tuning.weapon.clone(),
            bullet_skin: tuning.bullet_skin.clone(),
            acceleration: tuning.acceleration,
            max_speed: tuning.max_speed,
            perception: tuning.perception,
            reload_ticks: tuning.reload_ticks,
            loaded: 0,
            bullet_speed: tuning.bullet_speed,
            bullet_size: tuning.bullet_size,
            angle: 0.0,
            rotation_offset: 0.0,
            heading: Heading::default(),
            bullets: Vec::new(),
        }
    }

    pub fn ready_to_fire(&self) -> bool { self.loaded >= 0 }

    /// Advances the reload counter; returns true when a shot goes off this tick.
    pub fn try_fire(&mut self, trigger_held: bool) -> bool {
        if trigger_held && self.ready_to_fire() {
            self.loaded = -self.reload_ticks;
            true
        } else {
            if self.loaded < 0 {
                self.loaded += 1;
            }
            false
        }
    }
}

/// One tick of the ease model on a single axis.
pub fn ease_axis(velocity: f32, input: AxisInput, acceleration: f32, max_speed: f32) -> f32 {
    match input {
        AxisInput::Negative => {
            if velocity <= -max_speed + acceleration { -max_speed } else { velocity - acceleration }
        }
        AxisInput::Positive => {
            if velocity >= max_speed - acceleration { max_speed } else { velocity + acceleration }
        }
        AxisInput::Released => {
            if velocity.abs() < SNAP_THRESHOLD { 0.0 } else { velocity * DECAY_FACTOR }
        }
    }
}

/// Polar angle of the cursor around the player's on-screen centre, in degrees
/// `[0, 360)` measured counter-clockwise as seen on screen.
pub fn aim_angle(pointer: Vec2, player_screen_center: Vec2) -> f32 {
    let v = pointer - player_screen_center;
    let polar = v.y.atan2(v.x).to_degrees();
    (360.0 - polar).rem_euclid(360.0)
}

/// Cosmetic shift that keeps the rotated sprite visually centred.
pub fn lean_offset(width: f32, angle_degrees: f32) -> f32 {
    width * (2.0 * angle_degrees.to_radians()).sin().abs() * std::f32::consts::SQRT_2 / LEAN_DIVISOR
}

pub fn spawn_player(commands: &mut Commands, config: &GameConfig) -> Entity {
    let tuning = &config.player;
    let mut player = commands.spawn((
        Player::from_tuning(tuning),
        Body::new(tuning.top_left, tuning.size),
        Velocity(Vec2::ZERO),
        Name::new("Player"),
    ));
    if config.enable_animation {
        player.insert(SpriteAnimation::new(config.animation.frame_count, config.animation.ticks_per_frame));
    }
    player.id()
}

pub fn player_control_system(
    config: Res<GameConfig>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&mut Player, &mut Velocity)>,
) {
    let intent = movement_input(&keyboard_input);
    for (mut player, mut velocity) in query.iter_mut() {
        let (acceleration, max_speed) = (player.acceleration, player.max_speed);
        velocity.x = ease_axis(velocity.x, intent.x, acceleration, max_speed);
        velocity.y = ease_axis(velocity.y, intent.y, acceleration, max_speed);

        for input in [intent.x, intent.y] {
            match input {
                AxisInput::Negative => player.heading = Heading::Left,
                AxisInput::Positive => player.heading = Heading::Right,
                AxisInput::Released => {}
            }
        }

        if let Some(skin) = requested_skin(&keyboard_input, &config.player.skin_hotkeys) {
            if player.character != skin {
                debug!("player skin -> {}", skin);
                player.character = skin.to_string();
            }
        }
    }
}

pub fn player_fire_system(
    mut commands: Commands,
    pointer: Res<PointerState>,
    view: Res<ViewOffset>,
    mut masks: ResMut<MaskLibrary>,
    mut query: Query<(Entity, &mut Player, &Body), Without<Bullet>>,
) {
    for (entity, mut player, body) in query.iter_mut() {
        if player.try_fire(pointer.primary_pressed) {
            let shot = Bullet::aimed(entity, &player, body.center(), pointer.position, *view);
            let bullet_body = Body::centered_at(body.center(), player.bullet_size);
            let mask = ActorMask(masks.rotated(&shot.0.mask_key(), shot.0.angle, bullet_body.size));
            let bullet_entity = spawn_bullet(&mut commands, shot, bullet_body, mask);
            player.bullets.push(bullet_entity);
        }
    }
}

pub fn player_motion_system(
    pointer: Res<PointerState>,
    view: Res<ViewOffset>,
    mut query: Query<(&mut Player, &mut Body, &Velocity)>,
) {
    for (mut player, mut body, velocity) in query.iter_mut() {
        body.translate(velocity.0);
        player.angle = aim_angle(pointer.position, view.to_screen(body.center()));
        player.rotation_offset = lean_offset(body.size.x, player.angle);
    }
}
