use bevy::prelude::*;

pub const SCREEN_WIDTH: f32 = 1000.0;
pub const SCREEN_HEIGHT: f32 = 650.0;
pub const TICK_HZ: f64 = 60.0;
pub const CAPTION: &str = "survive";

const SHOOTER_SCROLL_FRACTION: f32 = 1.0 / 3.0;
const PROTOTYPE_SCROLL_FRACTION: f32 = 1.0 / 4.0;
const TILE_SIZE: f32 = 64.0;

/// How the world offset follows the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Offset only scrolls once the player pushes into the edge margin.
    DeadZone,
    /// Offset keeps the player centred every tick.
    LockedFollow,
}

/// Separation measure used by enemies to decide how far away the player is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Euclidean,
    /// `sqrt(|trunc(dx) ^ 2| + |trunc(dy) ^ 2|)` with `^` as bitwise xor.
    LegacyXor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyLayout {
    Empty,
    Single { top_left: Vec2 },
    /// `count` enemies at the screen centre offset by whole units in `-spread..=spread`.
    Scattered { count: u32, spread: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTuning {
    pub size: Vec2,
    pub top_left: Vec2,
    pub character: String,
    pub weapon: String,
    pub bullet_skin: String,
    pub acceleration: f32,
    pub max_speed: f32,
    pub perception: f32,
    pub reload_ticks: i32,
    pub bullet_speed: f32,
    pub bullet_size: Vec2,
    pub skin_hotkeys: Vec<(KeyCode, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTuning {
    pub size: Vec2,
    pub skin: String,
    pub acceleration: f32,
    pub max_speed: f32,
    pub stop_distance: f32,
    pub distance_metric: DistanceMetric,
    pub anchor_correction: f32,
    pub jitter: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTuning {
    pub frame_size: Vec2,
    pub frame_count: usize,
    pub ticks_per_frame: u32,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub viewport: Vec2,
    pub scroll_margin_fraction: f32,
    pub tick_hz: f64,
    pub enable_bullets: bool,
    pub enable_look_ahead: bool,
    pub enable_animation: bool,
    pub camera_mode: CameraMode,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub enemy_layout: EnemyLayout,
    pub animation: AnimationTuning,
    pub tile_size: Vec2,
    pub clear_color: Color,
    pub rng_seed: Option<u64>,
}

impl GameConfig {
    /// Mouse-aimed shooter: many pursuers, bullets, look-ahead camera.
    pub fn shooter() -> Self {
        let viewport = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        Self {
            viewport,
            scroll_margin_fraction: SHOOTER_SCROLL_FRACTION,
            tick_hz: TICK_HZ,
            enable_bullets: true,
            enable_look_ahead: true,
            enable_animation: false,
            camera_mode: CameraMode::DeadZone,
            player: PlayerTuning {
                size: Vec2::splat(128.0),
                top_left: viewport / 2.0 - Vec2::splat(32.0),
                character: "default".into(),
                weapon: "arrow".into(),
                bullet_skin: "ammo".into(),
                acceleration: 1.5,
                max_speed: 8.0,
                perception: 0.5,
                reload_ticks: 10,
                bullet_speed: 15.0,
                bullet_size: Vec2::splat(64.0),
                skin_hotkeys: vec![(KeyCode::KeyP, "green".into()), (KeyCode::KeyO, "joe".into())],
            },
            enemy: EnemyTuning {
                size: Vec2::splat(128.0),
                skin: "zombo".into(),
                acceleration: 0.1,
                max_speed: 1.0,
                stop_distance: 2.5,
                distance_metric: DistanceMetric::Euclidean,
                anchor_correction: 0.0,
                jitter: 20,
            },
            enemy_layout: EnemyLayout::Scattered { count: 20, spread: 1000 },
            animation: AnimationTuning { frame_size: Vec2::splat(64.0), frame_count: 4, ticks_per_frame: 2 },
            tile_size: Vec2::splat(TILE_SIZE),
            clear_color: Color::rgb_u8(26, 36, 112),
            rng_seed: None,
        }
    }

    /// Early chase prototype: one pursuer, no shooting, camera locked on the player.
    pub fn chase_prototype() -> Self {
        let viewport = Vec2::new(900.0, 500.0);
        let base = Self::shooter();
        Self {
            viewport,
            scroll_margin_fraction: PROTOTYPE_SCROLL_FRACTION,
            enable_bullets: false,
            enable_look_ahead: false,
            enable_animation: true,
            camera_mode: CameraMode::LockedFollow,
            player: PlayerTuning {
                size: Vec2::splat(64.0),
                top_left: viewport / 2.0 - Vec2::splat(32.0),
                character: "joe".into(),
                weapon: "meow".into(),
                ..base.player
            },
            enemy: EnemyTuning {
                size: Vec2::splat(64.0),
                max_speed: 4.0,
                acceleration: 1.0,
                jitter: 0,
                ..base.enemy
            },
            enemy_layout: EnemyLayout::Single { top_left: viewport / 2.0 },
            ..base
        }
    }

    /// Width and height of the edge band that triggers dead-zone scrolling.
    pub fn scroll_margin(&self) -> Vec2 {
        (self.viewport * self.scroll_margin_fraction).floor()
    }

    pub fn screen_center(&self) -> Vec2 {
        (self.viewport / 2.0).floor()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::shooter()
    }
}
