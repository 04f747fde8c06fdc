mod support;

use bevy::prelude::*;
use survive::{
    bullet::{Bullet, BulletDeath, AIM_CORRECTION},
    components::Body,
    config::{EnemyLayout, GameConfig},
};
use support::*;

fn bullets(app: &mut App) -> Vec<(Entity, Bullet, Body)> {
    let mut query = app.world.query::<(Entity, &Bullet, &Body)>();
    query.iter(&app.world).map(|(e, b, body)| (e, b.clone(), *body)).collect()
}

/// Cursor level with the player's centre and well to the right, so shots fly along +x.
fn aim_right(app: &mut App) {
    let (_, body) = player(app);
    point(app, Vec2::new(1000.0, body.center().y + AIM_CORRECTION), true);
}

#[test]
fn cursor_on_the_muzzle_kills_the_bullet_at_once() {
    let mut app = headless_app(quiet_config());
    let (_, body) = player(&mut app);
    point(&mut app, body.center() + Vec2::splat(AIM_CORRECTION), true);
    tick(&mut app);

    let fired = bullets(&mut app);
    assert_eq!(fired.len(), 1);
    let (_, bullet, bullet_body) = &fired[0];
    assert_eq!(bullet.death(), Some(BulletDeath::DegenerateAim));
    assert_eq!(bullet_body.center(), body.center());

    tick(&mut app);
    assert!(bullets(&mut app).is_empty());
    assert!(player(&mut app).0.bullets.is_empty());
}

#[test]
fn bullet_dies_one_screen_away_from_the_player() {
    let mut app = headless_app(quiet_config());
    aim_right(&mut app);
    tick(&mut app);
    app.world.resource_mut::<survive::input::PointerState>().primary_pressed = false;

    // Starts at x = 500 and moves 15 px per tick; the box edge is 468 + 1000.
    ticks(&mut app, 63);
    let alive = bullets(&mut app);
    assert_eq!(alive.len(), 1);
    assert!(!alive[0].1.is_dead());
    assert_eq!(alive[0].2.position.x, 500.0 + 15.0 * 64.0);

    tick(&mut app);
    assert_eq!(bullets(&mut app)[0].1.death(), Some(BulletDeath::OutOfRange));

    tick(&mut app);
    assert!(bullets(&mut app).is_empty());
    assert!(player(&mut app).0.bullets.is_empty());
}

#[test]
fn struck_enemy_is_removed_on_the_following_tick() {
    let mut config: GameConfig = quiet_config();
    config.enemy_layout = EnemyLayout::Single { top_left: Vec2::new(700.0, 293.0) };
    config.enemy.max_speed = 0.0;
    let mut app = headless_app(config);
    aim_right(&mut app);
    tick(&mut app);
    app.world.resource_mut::<survive::input::PointerState>().primary_pressed = false;

    // Bullet right edge reaches x = 700 after the tenth move.
    ticks(&mut app, 8);
    let standing = enemies(&mut app);
    assert_eq!(standing.len(), 1);
    assert!(!standing[0].0.dead);

    tick(&mut app);
    assert_eq!(bullets(&mut app)[0].1.death(), Some(BulletDeath::Impact));
    assert!(enemies(&mut app)[0].0.dead);

    tick(&mut app);
    assert!(enemies(&mut app).is_empty());
    assert!(bullets(&mut app).is_empty());
}

#[test]
fn bullets_are_never_fired_when_disabled() {
    let mut config = quiet_config();
    config.enable_bullets = false;
    let mut app = headless_app(config);
    aim_right(&mut app);
    ticks(&mut app, 30);
    assert!(bullets(&mut app).is_empty());
}
