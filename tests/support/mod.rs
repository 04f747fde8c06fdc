// Shared harness: a windowless app that steps the simulation one tick at a time.
#![allow(dead_code)]

use bevy::prelude::*;
use survive::{
    components::Body,
    config::{EnemyLayout, GameConfig},
    enemy::Enemy,
    game::SimulationPlugin,
    input::PointerState,
    player::Player,
};

/// Shooter rules with no enemies, no jitter, no look-ahead and a fixed seed.
pub fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.enemy_layout = EnemyLayout::Empty;
    config.enemy.jitter = 0;
    config.enable_look_ahead = false;
    config.rng_seed = Some(7);
    config
}

/// Builds the app and runs Startup so the world is populated.
pub fn headless_app(config: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins(SimulationPlugin::new(config));
    app.update();
    app
}

pub fn tick(app: &mut App) {
    app.world.run_schedule(FixedUpdate);
}

pub fn ticks(app: &mut App, n: usize) {
    for _ in 0..n {
        tick(app);
    }
}

pub fn press(app: &mut App, key: KeyCode) {
    app.world.resource_mut::<ButtonInput<KeyCode>>().press(key);
}

pub fn release(app: &mut App, key: KeyCode) {
    app.world.resource_mut::<ButtonInput<KeyCode>>().release(key);
}

pub fn point(app: &mut App, position: Vec2, pressed: bool) {
    *app.world.resource_mut::<PointerState>() = PointerState { position, primary_pressed: pressed };
}

pub fn player(app: &mut App) -> (Player, Body) {
    let mut query = app.world.query::<(&Player, &Body)>();
    let (player, body) = query.single(&app.world);
    (player.clone(), *body)
}

pub fn enemies(app: &mut App) -> Vec<(Enemy, Body)> {
    let mut query = app.world.query::<(&Enemy, &Body)>();
    query.iter(&app.world).map(|(e, b)| (e.clone(), *b)).collect()
}
