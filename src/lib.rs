pub mod animation;
pub mod assets;
pub mod background;
pub mod bullet;
pub mod camera;
pub mod components;
pub mod config;
pub mod enemy;
pub mod game;
pub mod input;
pub mod mask;
pub mod player;
pub mod render;
