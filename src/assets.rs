use std::{collections::HashMap, sync::Arc};

use bevy::prelude::*;
use crate::{config::GameConfig, mask::CollisionMask};

pub const TILE_PATH: &str = "tile.png";
pub const ICON_PATH: &str = "icon.png";

pub fn character_path(name: &str) -> String { format!("characters/{name}.png") }
pub fn weapon_path(name: &str) -> String { format!("guns/{name}.png") }
pub fn bullet_path(name: &str) -> String { format!("bullets/{name}.png") }
pub fn enemy_path(name: &str) -> String { format!("enemies/{name}.png") }
pub fn sheet_path(name: &str) -> String { format!("sheets/{name}.png") }

/// Image handles, loaded once per path and shared by every sprite using it.
#[derive(Resource, Default)]
pub struct SpriteLibrary {
    handles: HashMap<String, Handle<Image>>,
}

impl SpriteLibrary {
    pub fn get(&mut self, asset_server: &AssetServer, path: &str) -> Handle<Image> {
        self.handles
            .entry(path.to_string())
            .or_insert_with(|| asset_server.load(path.to_string()))
            .clone()
    }

    pub fn len(&self) -> usize { self.handles.len() }
}

/// Collision masks keyed by asset path, plus every size and rotation asked
/// for so far.
///
/// Masks are stretched to the requested size, matching sprites drawn with a
/// custom size. A key with no mask built yet (image still loading, unreadable,
/// or running headless) resolves to a solid rectangle of that size.
#[derive(Resource, Default)]
pub struct MaskLibrary {
    base: HashMap<String, Arc<CollisionMask>>,
    turned: HashMap<(String, UVec2, i32), Arc<CollisionMask>>,
}

impl MaskLibrary {
    pub fn insert(&mut self, key: impl Into<String>, mask: CollisionMask) {
        let key = key.into();
        self.turned.retain(|(k, _, _), _| *k != key);
        self.base.insert(key, Arc::new(mask));
    }

    /// Mask for `key` fitted to `size` and turned by `degrees` (rounded to whole degrees).
    pub fn rotated(&mut self, key: &str, degrees: f32, size: Vec2) -> Arc<CollisionMask> {
        let size = size.round().as_uvec2();
        let turn = (degrees.round() as i32).rem_euclid(360);
        let cache_key = (key.to_string(), size, turn);
        if let Some(mask) = self.turned.get(&cache_key) {
            return mask.clone();
        }
        let fitted = match self.base.get(key) {
            Some(mask) => mask.scaled(size),
            None => CollisionMask::solid(size),
        };
        let mask = Arc::new(if turn == 0 { fitted } else { fitted.rotated(turn as f32) });
        self.turned.insert(cache_key, mask.clone());
        mask
    }
}

pub struct SpriteAssetsPlugin;

impl Plugin for SpriteAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpriteLibrary>()
            .init_resource::<MaskLibrary>()
            .add_systems(Startup, preload_sprites)
            .add_systems(PreUpdate, build_masks_from_images);
    }
}

fn preload_sprites(config: Res<GameConfig>, asset_server: Res<AssetServer>, mut sprites: ResMut<SpriteLibrary>) {
    let player = &config.player;
    let body_path: fn(&str) -> String = if config.enable_animation { sheet_path } else { character_path };
    let mut paths = vec![
        body_path(&player.character),
        weapon_path(&player.weapon),
        enemy_path(&config.enemy.skin),
        TILE_PATH.to_string(),
    ];
    if config.enable_bullets {
        paths.push(bullet_path(&player.bullet_skin));
    }
    paths.extend(player.skin_hotkeys.iter().map(|(_, skin)| body_path(skin)));
    for path in paths {
        sprites.get(&asset_server, &path);
    }
    debug!("preloaded {} sprite images", sprites.len());
}

fn build_masks_from_images(
    mut events: EventReader<AssetEvent<Image>>,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    mut masks: ResMut<MaskLibrary>,
) {
    for event in events.read() {
        let id = match event {
            AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id } => *id,
            _ => continue,
        };
        let (Some(path), Some(image)) = (asset_server.get_path(id), images.get(id)) else { continue; };
        let key = path.path().to_string_lossy().replace('\\', "/");
        match CollisionMask::from_image(image) {
            Ok(mask) => {
                debug!("mask for {} built: {} solid pixels", key, mask.count());
                masks.insert(key, mask);
            }
            Err(err) => warn!("no pixel mask for {}: {}; using its bounding box", key, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ActorMask, Body};

    #[test]
    fn missing_mask_falls_back_to_solid_box() {
        let mut masks = MaskLibrary::default();
        let mask = masks.rotated(&bullet_path("ammo"), 0.0, Vec2::splat(64.0));
        assert_eq!(mask.size(), UVec2::splat(64));
        assert_eq!(mask.count(), 64 * 64);
    }

    #[test]
    fn rotations_are_cached_per_whole_degree() {
        let mut masks = MaskLibrary::default();
        masks.insert("bar", CollisionMask::solid(UVec2::new(8, 2)));
        let a = masks.rotated("bar", 89.6, Vec2::new(8.0, 2.0));
        let b = masks.rotated("bar", 450.0, Vec2::new(8.0, 2.0));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.size(), UVec2::new(2, 8));
    }

    #[test]
    fn inserting_a_mask_drops_stale_rotations() {
        let mut masks = MaskLibrary::default();
        let fallback = masks.rotated("enemies/zombo.png", 0.0, Vec2::splat(4.0));
        assert_eq!(fallback.count(), 16);
        masks.insert("enemies/zombo.png", CollisionMask::empty(UVec2::splat(2)));
        let built = masks.rotated("enemies/zombo.png", 0.0, Vec2::splat(4.0));
        assert_eq!(built.size(), UVec2::splat(4));
        assert_eq!(built.count(), 0);
    }

    #[test]
    fn fallback_follows_each_requested_size() {
        let mut masks = MaskLibrary::default();
        let small = masks.rotated("bullets/ammo.png", 0.0, Vec2::splat(16.0));
        let large = masks.rotated("bullets/ammo.png", 0.0, Vec2::splat(64.0));
        assert_eq!(small.size(), UVec2::splat(16));
        assert_eq!(large.size(), UVec2::splat(64));
    }

    #[test]
    fn small_image_mask_covers_the_whole_drawn_actor() {
        let mut masks = MaskLibrary::default();
        masks.insert(enemy_path("zombo"), CollisionMask::solid(UVec2::splat(64)));
        let enemy_body = Body::new(Vec2::ZERO, Vec2::splat(128.0));
        let enemy_mask = ActorMask(masks.rotated(&enemy_path("zombo"), 0.0, enemy_body.size));
        assert_eq!(enemy_mask.size(), UVec2::splat(128));

        // Near the drawn corner, outside where an unscaled 64 px mask would sit.
        let bullet_body = Body::new(Vec2::splat(4.0), Vec2::splat(16.0));
        let bullet_mask = ActorMask(masks.rotated(&bullet_path("ammo"), 0.0, bullet_body.size));
        assert!(enemy_mask.touches(&enemy_body, &bullet_mask, &bullet_body));
    }

    #[test]
    fn asset_paths_use_skin_folders() {
        assert_eq!(character_path("joe"), "characters/joe.png");
        assert_eq!(weapon_path("arrow"), "guns/arrow.png");
        assert_eq!(sheet_path("joe"), "sheets/joe.png");
    }
}
