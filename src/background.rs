use bevy::prelude::*;
use crate::{
    assets::{SpriteLibrary, TILE_PATH},
    camera::ViewOffset,
    config::GameConfig,
    render::screen_to_world,
};

const BACKGROUND_Z: f32 = -10.0;
/// Extra tiles past the viewport on each axis so scrolling never shows a gap.
const GRID_PADDING: usize = 10;

#[derive(Component)]
struct BackgroundTile {
    column: usize,
    row: usize,
}

pub struct BackgroundPlugin;

impl Plugin for BackgroundPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_background)
            .add_systems(Update, scroll_background);
    }
}

/// Columns and rows of the tile grid for a viewport.
pub fn grid_dimensions(viewport: Vec2, tile: Vec2) -> UVec2 {
    UVec2::new(
        (viewport.x / tile.x) as u32 + GRID_PADDING as u32,
        (viewport.y / tile.y) as u32 + GRID_PADDING as u32,
    )
}

/// Screen-space top-left of the tile at grid cell `(column, row)`.
pub fn tile_origin(column: usize, row: usize, offset: Vec2, tile: Vec2) -> Vec2 {
    Vec2::new(column as f32 * tile.x, row as f32 * tile.y)
        - Vec2::new(offset.x.rem_euclid(tile.x), offset.y.rem_euclid(tile.y))
}

fn setup_background(
    mut commands: Commands,
    config: Res<GameConfig>,
    asset_server: Res<AssetServer>,
    mut sprites: ResMut<SpriteLibrary>,
) {
    let texture = sprites.get(&asset_server, TILE_PATH);
    let dims = grid_dimensions(config.viewport, config.tile_size);
    for row in 0..dims.y as usize {
        for column in 0..dims.x as usize {
            let origin = tile_origin(column, row, Vec2::ZERO, config.tile_size);
            commands.spawn((
                SpriteBundle {
                    texture: texture.clone(),
                    sprite: Sprite { custom_size: Some(config.tile_size), ..default() },
                    transform: Transform::from_translation(
                        screen_to_world(origin, config.tile_size, config.viewport).extend(BACKGROUND_Z),
                    ),
                    ..default()
                },
                BackgroundTile { column, row },
                Name::new(format!("BackgroundTile_{}_{}", column, row)),
            ));
        }
    }
}

fn scroll_background(
    config: Res<GameConfig>,
    view: Res<ViewOffset>,
    mut tiles: Query<(&BackgroundTile, &mut Transform)>,
) {
    let offset = view.total();
    for (tile, mut transform) in tiles.iter_mut() {
        let origin = tile_origin(tile.column, tile.row, offset, config.tile_size);
        transform.translation = screen_to_world(origin, config.tile_size, config.viewport).extend(BACKGROUND_Z);
    }
}
