use bevy::{log::LogPlugin, prelude::*};
use survive::{
    config::{GameConfig, CAPTION},
    game::GamePlugin,
};

fn main() {
    let config = GameConfig::default();
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: CAPTION.into(),
                        resolution: (config.viewport.x, config.viewport.y).into(),
                        resizable: false,
                        ..default()
                    }),
                    close_when_requested: false,
                    ..default()
                })
                .set(LogPlugin {
                    filter: "info,wgpu=error,naga=warn,survive=debug".into(),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .add_plugins(GamePlugin { config })
        .run();
}
