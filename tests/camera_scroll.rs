mod support;

use bevy::prelude::*;
use survive::{
    camera::ViewOffset,
    components::Velocity,
    config::{EnemyLayout, GameConfig},
    player::Player,
};
use support::*;

fn view(app: &App) -> ViewOffset {
    *app.world.resource::<ViewOffset>()
}

fn player_velocity(app: &mut App) -> Vec2 {
    let mut query = app.world.query_filtered::<&Velocity, With<Player>>();
    query.single(&app.world).0
}

#[test]
fn world_offset_moves_only_inside_the_edge_margin() {
    let mut app = headless_app(quiet_config());
    let margin = GameConfig::default().scroll_margin().x;
    press(&mut app, KeyCode::ArrowRight);

    let mut scrolled = false;
    for _ in 0..80 {
        let (_, body) = player(&mut app);
        let before = view(&app).world.x;
        let speed = player_velocity(&mut app).x;
        tick(&mut app);
        let after = view(&app).world.x;
        if body.right() - before >= 1000.0 - margin && speed > 0.0 {
            assert_eq!(after, before + speed);
            scrolled = true;
        } else {
            assert_eq!(after, before);
        }
    }
    assert!(scrolled);

    // Stopped players never drag the view.
    release(&mut app, KeyCode::ArrowRight);
    ticks(&mut app, 60);
    let settled = view(&app);
    ticks(&mut app, 10);
    assert_eq!(view(&app), settled);
}

#[test]
fn look_ahead_follows_the_cursor() {
    let mut config = quiet_config();
    config.enable_look_ahead = true;
    let mut app = headless_app(config);
    point(&mut app, Vec2::new(700.0, 125.0), false);
    tick(&mut app);
    let view = view(&app);
    assert_eq!(view.look, Vec2::new(100.0, -100.0));
    assert_eq!(view.world, Vec2::ZERO);
}

#[test]
fn locked_follow_keeps_the_player_centred() {
    let mut config = GameConfig::chase_prototype();
    config.enemy_layout = EnemyLayout::Empty;
    let mut app = headless_app(config);
    press(&mut app, KeyCode::KeyS);
    press(&mut app, KeyCode::KeyD);
    ticks(&mut app, 20);
    // The camera runs before the move, so it trails by the last step.
    let (_, body) = player(&mut app);
    let velocity = player_velocity(&mut app);
    let on_screen = view(&app).to_screen(body.center() - velocity);
    assert_eq!(on_screen, Vec2::new(450.0, 250.0));
}
