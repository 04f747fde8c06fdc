use bevy::{prelude::*, render::render_resource::TextureFormat, winit::WinitWindows};
use thiserror::Error;
use winit::window::{BadIcon, Icon};
use crate::{
    animation::SpriteAnimation,
    assets::{bullet_path, character_path, enemy_path, sheet_path, weapon_path, SpriteLibrary, ICON_PATH},
    bullet::Bullet,
    camera::ViewOffset,
    components::Body,
    config::GameConfig,
    enemy::Enemy,
    player::{Heading, Player},
};

const CAMERA_Z: f32 = 999.0;
const PLAYER_Z: f32 = 1.0;
const BULLET_Z: f32 = 0.7;
const ENEMY_Z: f32 = 0.5;
/// Gun sits just above the body it is parented to.
const WEAPON_Z: f32 = 0.1;

#[derive(Component)]
pub struct MainCamera;

#[derive(Component)]
pub struct WeaponSprite;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("unsupported icon format {0:?}")]
    UnsupportedFormat(TextureFormat),
    #[error(transparent)]
    Rejected(#[from] BadIcon),
}

/// Icon image waiting to be handed to the window once it finishes loading.
#[derive(Resource)]
struct PendingWindowIcon(Handle<Image>);

pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, load_window_icon))
            .add_systems(Update, apply_window_icon.run_if(resource_exists::<PendingWindowIcon>))
            .add_systems(
                Update,
                (
                    (attach_player_sprites, attach_enemy_sprites, attach_bullet_sprites),
                    (sync_player_transform, sync_enemy_transforms, sync_bullet_transforms, swap_player_skin, show_animation_frame),
                )
                    .chain(),
            );
    }
}

/// Bevy world position of the centre of a screen-space rect
/// (top-left origin, +y down) inside a viewport centred on the camera.
pub fn screen_to_world(top_left: Vec2, size: Vec2, viewport: Vec2) -> Vec2 {
    let center = top_left + size / 2.0;
    Vec2::new(center.x - viewport.x / 2.0, viewport.y / 2.0 - center.y)
}

/// Screen-space top-left where an actor is drawn this frame.
pub fn draw_origin(body: &Body, view: &ViewOffset) -> Vec2 {
    view.to_screen(body.position)
}

/// Bevy translation of an actor's sprite. Sprites rotate about their own
/// centre, so rotation never moves this point.
pub fn sprite_translation(body: &Body, view: &ViewOffset, viewport: Vec2) -> Vec2 {
    screen_to_world(draw_origin(body, view), body.size, viewport)
}

pub fn window_icon(image: &Image) -> Result<Icon, IconError> {
    match image.texture_descriptor.format {
        TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => {
            Ok(Icon::from_rgba(image.data.clone(), image.width(), image.height())?)
        }
        other => Err(IconError::UnsupportedFormat(other)),
    }
}

fn load_window_icon(mut commands: Commands, asset_server: Res<AssetServer>, mut sprites: ResMut<SpriteLibrary>) {
    commands.insert_resource(PendingWindowIcon(sprites.get(&asset_server, ICON_PATH)));
}

fn apply_window_icon(
    mut commands: Commands,
    pending: Res<PendingWindowIcon>,
    images: Res<Assets<Image>>,
    windows: NonSend<WinitWindows>,
) {
    let Some(image) = images.get(&pending.0) else { return; };
    if windows.windows.is_empty() {
        return;
    }
    match window_icon(image) {
        Ok(icon) => {
            for window in windows.windows.values() {
                window.set_window_icon(Some(icon.clone()));
            }
            debug!("window icon set from {}", ICON_PATH);
        }
        Err(err) => warn!("window icon {} unusable: {}", ICON_PATH, err),
    }
    commands.remove_resource::<PendingWindowIcon>();
}

fn setup_camera(mut commands: Commands) {
    let mut camera_bundle = Camera2dBundle::default();
    camera_bundle.transform.translation.z = CAMERA_Z;
    commands.spawn((camera_bundle, MainCamera));
}

fn body_texture_path(config: &GameConfig, character: &str) -> String {
    if config.enable_animation { sheet_path(character) } else { character_path(character) }
}

fn attach_player_sprites(
    mut commands: Commands,
    config: Res<GameConfig>,
    asset_server: Res<AssetServer>,
    mut sprites: ResMut<SpriteLibrary>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
    query: Query<(Entity, &Player, &Body), Added<Player>>,
) {
    for (entity, player, body) in query.iter() {
        let texture = sprites.get(&asset_server, &body_texture_path(&config, &player.character));
        let sprite = Sprite { custom_size: Some(body.size), ..default() };
        let mut entity_commands = commands.entity(entity);
        if config.enable_animation {
            let layout = TextureAtlasLayout::from_grid(config.animation.frame_size, config.animation.frame_count, 1, None, None);
            entity_commands.insert(SpriteSheetBundle {
                sprite,
                texture,
                atlas: TextureAtlas { layout: layouts.add(layout), index: 0 },
                ..default()
            });
        } else {
            entity_commands.insert(SpriteBundle { sprite, texture, ..default() });
        }
        let weapon = sprites.get(&asset_server, &weapon_path(&player.weapon));
        entity_commands.with_children(|parent| {
            parent.spawn((
                SpriteBundle {
                    texture: weapon,
                    sprite: Sprite { custom_size: Some(body.size), ..default() },
                    transform: Transform::from_xyz(0.0, 0.0, WEAPON_Z),
                    ..default()
                },
                WeaponSprite,
                Name::new("Weapon"),
            ));
        });
    }
}

fn attach_enemy_sprites(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut sprites: ResMut<SpriteLibrary>,
    query: Query<(Entity, &Enemy, &Body), Added<Enemy>>,
) {
    for (entity, enemy, body) in query.iter() {
        commands.entity(entity).insert(SpriteBundle {
            texture: sprites.get(&asset_server, &enemy_path(&enemy.skin)),
            sprite: Sprite { custom_size: Some(body.size), ..default() },
            ..default()
        });
    }
}

fn attach_bullet_sprites(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut sprites: ResMut<SpriteLibrary>,
    query: Query<(Entity, &Bullet, &Body), Added<Bullet>>,
) {
    for (entity, bullet, body) in query.iter() {
        commands.entity(entity).insert(SpriteBundle {
            texture: sprites.get(&asset_server, &bullet_path(&bullet.skin)),
            sprite: Sprite { custom_size: Some(body.size), ..default() },
            ..default()
        });
    }
}

fn sync_player_transform(
    config: Res<GameConfig>,
    view: Res<ViewOffset>,
    mut query: Query<(&Player, &Body, &mut Transform)>,
) {
    for (player, body, mut transform) in query.iter_mut() {
        transform.translation = sprite_translation(body, &view, config.viewport).extend(PLAYER_Z);
        transform.rotation = Quat::from_rotation_z(player.angle.to_radians());
    }
}

fn sync_enemy_transforms(
    config: Res<GameConfig>,
    view: Res<ViewOffset>,
    mut query: Query<(&Body, &mut Transform), With<Enemy>>,
) {
    for (body, mut transform) in query.iter_mut() {
        transform.translation = sprite_translation(body, &view, config.viewport).extend(ENEMY_Z);
    }
}

fn sync_bullet_transforms(
    config: Res<GameConfig>,
    view: Res<ViewOffset>,
    mut query: Query<(&Bullet, &Body, &mut Transform)>,
) {
    for (bullet, body, mut transform) in query.iter_mut() {
        transform.translation = sprite_translation(body, &view, config.viewport).extend(BULLET_Z);
        transform.rotation = Quat::from_rotation_z(bullet.angle.to_radians());
    }
}

fn swap_player_skin(
    config: Res<GameConfig>,
    asset_server: Res<AssetServer>,
    mut sprites: ResMut<SpriteLibrary>,
    mut query: Query<(&Player, &mut Handle<Image>, &mut Sprite), Changed<Player>>,
) {
    for (player, mut texture, mut sprite) in query.iter_mut() {
        let wanted = sprites.get(&asset_server, &body_texture_path(&config, &player.character));
        if *texture != wanted {
            *texture = wanted;
        }
        sprite.flip_x = config.enable_animation && player.heading == Heading::Left;
    }
}

fn show_animation_frame(mut query: Query<(&SpriteAnimation, &mut TextureAtlas), Changed<SpriteAnimation>>) {
    for (animation, mut atlas) in query.iter_mut() {
        atlas.index = animation.frame;
    }
}
