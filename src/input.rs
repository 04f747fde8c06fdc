use bevy::{prelude::*, window::PrimaryWindow};

const LEFT_KEYS: [KeyCode; 2] = [KeyCode::ArrowLeft, KeyCode::KeyA];
const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::ArrowRight, KeyCode::KeyD];
const UP_KEYS: [KeyCode; 2] = [KeyCode::ArrowUp, KeyCode::KeyW];
const DOWN_KEYS: [KeyCode; 2] = [KeyCode::ArrowDown, KeyCode::KeyS];

/// Cursor position in window pixels (top-left origin) and primary button state,
/// sampled once per frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub primary_pressed: bool,
}

/// What the keyboard asks of one movement axis this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisInput {
    Negative,
    Positive,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveInput {
    pub x: AxisInput,
    pub y: AxisInput,
}

fn axis(keys: &ButtonInput<KeyCode>, negative: [KeyCode; 2], positive: [KeyCode; 2]) -> AxisInput {
    // Negative wins when both directions are held.
    if keys.any_pressed(negative) {
        AxisInput::Negative
    } else if keys.any_pressed(positive) {
        AxisInput::Positive
    } else {
        AxisInput::Released
    }
}

pub fn movement_input(keys: &ButtonInput<KeyCode>) -> MoveInput {
    MoveInput { x: axis(keys, LEFT_KEYS, RIGHT_KEYS), y: axis(keys, UP_KEYS, DOWN_KEYS) }
}

/// First skin whose hotkey is held, in hotkey order.
pub fn requested_skin<'a>(keys: &ButtonInput<KeyCode>, hotkeys: &'a [(KeyCode, String)]) -> Option<&'a str> {
    hotkeys.iter().find(|(key, _)| keys.pressed(*key)).map(|(_, skin)| skin.as_str())
}

pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .add_systems(PreUpdate, poll_pointer.after(bevy::input::InputSystem));
    }
}

fn poll_pointer(
    window_query: Query<&Window, With<PrimaryWindow>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut pointer: ResMut<PointerState>,
) {
    let Ok(window) = window_query.get_single() else { return; };
    // Off-window cursor keeps its last known position.
    if let Some(position) = window.cursor_position() {
        pointer.position = position;
    }
    pointer.primary_pressed = mouse_buttons.pressed(MouseButton::Left);
}
