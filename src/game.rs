use bevy::{app::AppExit, prelude::*, window::WindowCloseRequested};
use rand::{rngs::StdRng, SeedableRng};
use crate::{
    animation::animate_sprites_system,
    assets::{MaskLibrary, SpriteAssetsPlugin},
    background::BackgroundPlugin,
    bullet::{bullet_flight_system, reap_dead_bullets},
    camera::{update_view_offset, ViewOffset},
    config::GameConfig,
    enemy::{enemy_contact_system, enemy_pursuit_system, reap_dead_enemies, spawn_enemies},
    input::{PointerInputPlugin, PointerState},
    player::{player_control_system, player_fire_system, player_motion_system, spawn_player},
    render::PresentationPlugin,
};

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Running,
    Stopped,
}

/// Phases of one simulation tick, run in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    Reap,
    Camera,
    Player,
    Enemies,
    Animate,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickCount(pub u64);

/// Randomness for enemy scatter and pursuit jitter; seedable for replays and tests.
#[derive(Resource, Deref, DerefMut)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

/// The fixed-tick game rules with no window, renderer or asset server.
pub struct SimulationPlugin {
    pub config: GameConfig,
}

impl SimulationPlugin {
    pub fn new(config: GameConfig) -> Self { Self { config } }
}

impl Default for SimulationPlugin {
    fn default() -> Self { Self::new(GameConfig::default()) }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(SimRng::new(self.config.rng_seed))
            .init_state::<AppState>()
            .init_resource::<TickCount>()
            .init_resource::<ViewOffset>()
            .init_resource::<PointerState>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<MaskLibrary>()
            .add_event::<WindowCloseRequested>()
            .add_event::<AppExit>()
            .configure_sets(
                FixedUpdate,
                (TickSet::Reap, TickSet::Camera, TickSet::Player, TickSet::Enemies, TickSet::Animate)
                    .chain()
                    .run_if(in_state(AppState::Running)),
            )
            .add_systems(Startup, spawn_world)
            .add_systems(FixedUpdate, (count_tick, reap_dead_bullets, reap_dead_enemies).chain().in_set(TickSet::Reap))
            .add_systems(FixedUpdate, update_view_offset.in_set(TickSet::Camera))
            .add_systems(
                FixedUpdate,
                (
                    player_control_system,
                    player_fire_system.run_if(bullets_enabled),
                    bullet_flight_system,
                    player_motion_system,
                )
                    .chain()
                    .in_set(TickSet::Player),
            )
            .add_systems(FixedUpdate, (enemy_pursuit_system, enemy_contact_system).chain().in_set(TickSet::Enemies))
            .add_systems(FixedUpdate, animate_sprites_system.in_set(TickSet::Animate))
            .add_systems(Update, stop_on_close_request.run_if(in_state(AppState::Running)))
            .add_systems(OnEnter(AppState::Stopped), exit_app);
    }
}

/// Windowed game: simulation at the configured tick rate plus everything that draws it.
pub struct GamePlugin {
    pub config: GameConfig,
}

impl Default for GamePlugin {
    fn default() -> Self { Self { config: GameConfig::default() } }
}

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz))
            .insert_resource(ClearColor(self.config.clear_color))
            .add_plugins((
                SimulationPlugin::new(self.config.clone()),
                PointerInputPlugin,
                SpriteAssetsPlugin,
                PresentationPlugin,
                BackgroundPlugin,
            ));
    }
}

fn bullets_enabled(config: Res<GameConfig>) -> bool { config.enable_bullets }

fn count_tick(mut ticks: ResMut<TickCount>) {
    ticks.0 += 1;
}

fn spawn_world(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut rng: ResMut<SimRng>,
    mut masks: ResMut<MaskLibrary>,
) {
    spawn_player(&mut commands, &config);
    let enemies = spawn_enemies(&mut commands, &mut masks, &config, &mut rng);
    info!(
        "world ready: {}x{} view, {} enemies, bullets {}",
        config.viewport.x,
        config.viewport.y,
        enemies,
        if config.enable_bullets { "on" } else { "off" }
    );
}

fn stop_on_close_request(mut close_requests: EventReader<WindowCloseRequested>, mut next_state: ResMut<NextState<AppState>>) {
    if close_requests.read().next().is_some() {
        info!("close requested, stopping");
        next_state.set(AppState::Stopped);
    }
}

fn exit_app(mut exit: EventWriter<AppExit>) {
    exit.send(AppExit);
}
