use bevy::prelude::*;
use crate::{
    assets::{bullet_path, MaskLibrary},
    camera::ViewOffset,
    components::{ActorMask, Body, Velocity},
    config::GameConfig,
    enemy::Enemy,
    player::Player,
};

/// Pixel shift from the sprite's drawn corner to its visual centre, applied
/// when turning the cursor position into a firing direction.
pub const AIM_CORRECTION: f32 = 29.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletDeath {
    /// Cursor sat exactly on the muzzle, so there was no direction to fly.
    DegenerateAim,
    OutOfRange,
    Impact,
}

#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub owner: Entity,
    /// Owner's aim angle when fired; used to rotate sprite and mask.
    pub angle: f32,
    pub speed: f32,
    pub skin: String,
    death: Option<BulletDeath>,
}

/// Direction from the player's drawn centre to the cursor, before normalising.
pub fn firing_vector(pointer: Vec2, player_center: Vec2, view: ViewOffset, lean: f32) -> Vec2 {
    pointer - player_center + view.total() + Vec2::splat(lean - AIM_CORRECTION)
}

impl Bullet {
    /// Aims a new bullet from `player` toward the cursor. A zero-length aim
    /// produces a bullet that is already dead and never moves.
    pub fn aimed(owner: Entity, player: &Player, player_center: Vec2, pointer: Vec2, view: ViewOffset) -> (Self, Velocity) {
        let mut bullet = Self {
            owner,
            angle: player.angle,
            speed: player.bullet_speed,
            skin: player.bullet_skin.clone(),
            death: None,
        };
        let aim = firing_vector(pointer, player_center, view, player.rotation_offset);
        let distance = aim.length();
        if distance == 0.0 {
            bullet.kill(BulletDeath::DegenerateAim);
            return (bullet, Velocity(Vec2::ZERO));
        }
        let velocity = Velocity(aim * bullet.speed / distance);
        (bullet, velocity)
    }

    pub fn death(&self) -> Option<BulletDeath> { self.death }
    pub fn is_dead(&self) -> bool { self.death.is_some() }

    /// Still able to kill an enemy this tick: alive, or just died by hitting one.
    pub fn is_lethal(&self) -> bool {
        matches!(self.death, None | Some(BulletDeath::Impact))
    }

    /// Marks the bullet dead; only the first cause sticks.
    pub fn kill(&mut self, cause: BulletDeath) -> bool {
        if self.death.is_some() {
            return false;
        }
        self.death = Some(cause);
        true
    }

    pub fn mask_key(&self) -> String { bullet_path(&self.skin) }
}

/// True once `body` has left the one-screen box around `anchor`.
pub fn out_of_range(body: &Body, anchor: &Body, viewport: Vec2) -> bool {
    body.position.x < anchor.position.x - viewport.x
        || body.position.y < anchor.position.y - viewport.y
        || body.position.x > anchor.position.x + viewport.x
        || body.position.y > anchor.position.y + viewport.y
}

pub fn spawn_bullet(commands: &mut Commands, shot: (Bullet, Velocity), body: Body, mask: ActorMask) -> Entity {
    let (bullet, velocity) = shot;
    debug!("bullet fired at {:.1} degrees{}", bullet.angle, if bullet.is_dead() { " (degenerate aim)" } else { "" });
    commands.spawn((bullet, velocity, body, mask, Name::new("Bullet"))).id()
}

pub fn bullet_flight_system(
    config: Res<GameConfig>,
    mut masks: ResMut<MaskLibrary>,
    player_query: Query<&Body, (With<Player>, Without<Bullet>)>,
    mut bullet_query: Query<(&mut Bullet, &mut Body, &Velocity, &mut ActorMask)>,
    enemy_query: Query<(&Body, &ActorMask), (With<Enemy>, Without<Bullet>)>,
) {
    for (mut bullet, mut body, velocity, mut mask) in bullet_query.iter_mut() {
        if bullet.is_dead() {
            continue;
        }
        body.translate(velocity.0);
        *mask = ActorMask(masks.rotated(&bullet.mask_key(), bullet.angle, body.size));

        let escaped = match player_query.get(bullet.owner) {
            Ok(owner_body) => out_of_range(&body, owner_body, config.viewport),
            Err(_) => true,
        };
        if escaped {
            bullet.kill(BulletDeath::OutOfRange);
            debug!("bullet left range");
            continue;
        }

        if enemy_query.iter().any(|(enemy_body, enemy_mask)| mask.touches(&body, enemy_mask, enemy_body)) {
            bullet.kill(BulletDeath::Impact);
            debug!("bullet hit");
        }
    }
}

/// Compacts owners' bullet lists and despawns every bullet marked dead.
pub fn reap_dead_bullets(
    mut commands: Commands,
    mut player_query: Query<&mut Player>,
    bullet_query: Query<(Entity, &Bullet)>,
) {
    let dead: Vec<Entity> = bullet_query.iter().filter(|(_, b)| b.is_dead()).map(|(e, _)| e).collect();
    if dead.is_empty() {
        return;
    }
    for mut player in player_query.iter_mut() {
        player.bullets.retain(|e| !dead.contains(e));
    }
    for entity in dead {
        commands.entity(entity).despawn_recursive();
    }
}
