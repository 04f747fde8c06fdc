mod support;

use bevy::{app::AppExit, prelude::*, window::WindowCloseRequested};
use survive::{
    animation::SpriteAnimation,
    config::{EnemyLayout, GameConfig},
    game::{AppState, TickCount},
};
use support::*;

fn tick_count(app: &App) -> u64 {
    app.world.resource::<TickCount>().0
}

#[test]
fn startup_spawns_player_and_configured_enemies() {
    let mut config = quiet_config();
    config.enemy_layout = EnemyLayout::Scattered { count: 5, spread: 40 };
    let mut app = headless_app(config);
    let (player, body) = player(&mut app);
    assert_eq!(player.character, "default");
    assert_eq!(body.position, Vec2::new(468.0, 293.0));
    assert_eq!(enemies(&mut app).len(), 5);
    assert_eq!(tick_count(&app), 0);
}

#[test]
fn close_request_stops_the_loop_and_exits() {
    let mut app = headless_app(quiet_config());
    ticks(&mut app, 3);
    assert_eq!(tick_count(&app), 3);

    app.world.send_event(WindowCloseRequested { window: Entity::PLACEHOLDER });
    app.update();
    app.update();
    assert_eq!(*app.world.resource::<State<AppState>>().get(), AppState::Stopped);
    assert!(!app.world.resource::<Events<AppExit>>().is_empty());

    // A stopped loop no longer advances the simulation.
    press(&mut app, KeyCode::KeyD);
    let (_, before) = player(&mut app);
    ticks(&mut app, 5);
    assert_eq!(tick_count(&app), 3);
    assert_eq!(player(&mut app).1, before);
}

#[test]
fn sprite_sheet_frames_advance_only_while_moving() {
    let mut config = GameConfig::chase_prototype();
    config.enemy_layout = EnemyLayout::Empty;
    let mut app = headless_app(config);
    let frame = |app: &mut App| {
        let mut query = app.world.query::<&SpriteAnimation>();
        query.single(&app.world).frame
    };

    press(&mut app, KeyCode::KeyD);
    ticks(&mut app, 5);
    assert_eq!(frame(&mut app), 2);

    release(&mut app, KeyCode::KeyD);
    // Velocity decays for a while before the frame resets.
    ticks(&mut app, 60);
    assert_eq!(frame(&mut app), 0);
}

#[test]
fn animation_component_only_in_sprite_sheet_mode() {
    let mut app = headless_app(quiet_config());
    let mut query = app.world.query::<&SpriteAnimation>();
    assert_eq!(query.iter(&app.world).count(), 0);
}
