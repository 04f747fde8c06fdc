use bevy::prelude::*;
use rand::Rng;
use crate::{
    assets::{enemy_path, MaskLibrary},
    bullet::Bullet,
    components::{ActorMask, Body, Velocity},
    config::{DistanceMetric, EnemyLayout, EnemyTuning, GameConfig},
    game::SimRng,
    player::Player,
};

#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub skin: String,
    pub acceleration: f32,
    pub max_speed: f32,
    pub stop_distance: f32,
    pub aggro: bool,
    pub dead: bool,
}

impl Enemy {
    pub fn from_tuning(tuning: &EnemyTuning) -> Self {
        Self {
            skin: tuning.skin.clone(),
            acceleration: tuning.acceleration,
            max_speed: tuning.max_speed,
            stop_distance: tuning.stop_distance,
            aggro: false,
            dead: false,
        }
    }

    pub fn mask_key(&self) -> String { enemy_path(&self.skin) }
}

/// How far apart two centres are, under the configured metric.
pub fn separation(metric: DistanceMetric, d: Vec2) -> f32 {
    match metric {
        DistanceMetric::Euclidean => d.length(),
        DistanceMetric::LegacyXor => {
            let xor = |v: f32| ((v.trunc() as i64) ^ 2).abs() as f32;
            (xor(d.x) + xor(d.y)).sqrt()
        }
    }
}

/// Velocity toward the player for one tick.
///
/// Zero inside `stop_distance`. Otherwise the displacement is scaled down by
/// `distance / max_speed`, jittered, and clamped to `max_speed` per axis.
pub fn pursuit_velocity(displacement: Vec2, distance: f32, max_speed: f32, stop_distance: f32, jitter: Vec2) -> Vec2 {
    if distance < stop_distance || max_speed <= 0.0 {
        return Vec2::ZERO;
    }
    let reduction = (distance / max_speed).abs();
    let raw = if reduction == 0.0 { displacement } else { displacement / reduction + jitter };
    raw.clamp(Vec2::splat(-max_speed), Vec2::splat(max_speed))
}

fn jitter(rng: &mut SimRng, amplitude: i32) -> Vec2 {
    if amplitude <= 0 {
        return Vec2::ZERO;
    }
    Vec2::new(rng.gen_range(-amplitude..=amplitude) as f32, rng.gen_range(-amplitude..=amplitude) as f32)
}

pub fn spawn_enemy(commands: &mut Commands, masks: &mut MaskLibrary, tuning: &EnemyTuning, top_left: Vec2) -> Entity {
    let enemy = Enemy::from_tuning(tuning);
    let mask = ActorMask(masks.rotated(&enemy.mask_key(), 0.0, tuning.size));
    commands.spawn((enemy, Body::new(top_left, tuning.size), Velocity::default(), mask, Name::new("Enemy"))).id()
}

/// Spawns the configured enemy population; returns how many were placed.
pub fn spawn_enemies(commands: &mut Commands, masks: &mut MaskLibrary, config: &GameConfig, rng: &mut SimRng) -> usize {
    match config.enemy_layout {
        EnemyLayout::Empty => 0,
        EnemyLayout::Single { top_left } => {
            spawn_enemy(commands, masks, &config.enemy, top_left);
            1
        }
        EnemyLayout::Scattered { count, spread } => {
            let center = config.screen_center();
            for _ in 0..count {
                let scatter = jitter(rng, spread);
                spawn_enemy(commands, masks, &config.enemy, center + scatter);
            }
            count as usize
        }
    }
}

pub fn enemy_pursuit_system(
    config: Res<GameConfig>,
    mut rng: ResMut<SimRng>,
    mut masks: ResMut<MaskLibrary>,
    player_query: Query<&Body, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<(&Enemy, &mut Body, &mut Velocity, &mut ActorMask)>,
) {
    let Ok(player_body) = player_query.get_single() else { return; };
    let tuning = &config.enemy;
    for (enemy, mut body, mut velocity, mut mask) in enemy_query.iter_mut() {
        if enemy.dead {
            continue;
        }
        let displacement = player_body.center() - body.center() + Vec2::splat(tuning.anchor_correction);
        let distance = separation(tuning.distance_metric, displacement);
        let shake = jitter(&mut rng, tuning.jitter);
        velocity.0 = pursuit_velocity(displacement, distance, enemy.max_speed, enemy.stop_distance, shake);
        body.translate(velocity.0);
        *mask = ActorMask(masks.rotated(&enemy.mask_key(), 0.0, body.size));
    }
}

pub fn enemy_contact_system(
    mut enemy_query: Query<(&mut Enemy, &Body, &ActorMask), Without<Bullet>>,
    bullet_query: Query<(&Bullet, &Body, &ActorMask), Without<Enemy>>,
) {
    for (mut enemy, body, mask) in enemy_query.iter_mut() {
        if enemy.dead {
            continue;
        }
        let struck = bullet_query
            .iter()
            .filter(|(bullet, _, _)| bullet.is_lethal())
            .any(|(_, bullet_body, bullet_mask)| mask.touches(body, bullet_mask, bullet_body));
        if struck {
            enemy.dead = true;
        }
    }
}

pub fn reap_dead_enemies(mut commands: Commands, enemy_query: Query<(Entity, &Enemy, &Body)>) {
    for (entity, enemy, body) in enemy_query.iter() {
        if enemy.dead {
            info!("enemy {} down at ({:.0}, {:.0})", enemy.skin, body.position.x, body.position.y);
            commands.entity(entity).despawn_recursive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_inside_stop_distance() {
        let v = pursuit_velocity(Vec2::new(2.0, 0.0), 2.0, 1.0, 2.5, Vec2::new(20.0, 20.0));
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn far_target_moves_at_capped_speed_along_displacement() {
        let d = Vec2::new(300.0, -400.0);
        let v = pursuit_velocity(d, d.length(), 4.0, 2.5, Vec2::ZERO);
        assert!((v - Vec2::new(2.4, -3.2)).length() < 1e-5);
    }

    #[test]
    fn jitter_is_clamped_per_axis() {
        let d = Vec2::new(100.0, 0.0);
        let v = pursuit_velocity(d, d.length(), 1.0, 2.5, Vec2::new(20.0, -20.0));
        assert_eq!(v, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn non_positive_max_speed_never_moves() {
        let d = Vec2::new(50.0, 50.0);
        assert_eq!(pursuit_velocity(d, d.length(), 0.0, 2.5, Vec2::ZERO), Vec2::ZERO);
        assert_eq!(pursuit_velocity(d, d.length(), -1.0, 2.5, Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn legacy_metric_xors_truncated_components() {
        // trunc(-5.7) = -5, -5 ^ 2 = -7; 3 ^ 2 = 1.
        let d = Vec2::new(-5.7, 3.2);
        assert!((separation(DistanceMetric::LegacyXor, d) - 8.0_f32.sqrt()).abs() < 1e-6);
        assert_eq!(separation(DistanceMetric::Euclidean, Vec2::new(3.0, 4.0)), 5.0);
        // Touching centres still read as two units apart.
        assert_eq!(separation(DistanceMetric::LegacyXor, Vec2::ZERO), 2.0);
    }
}
