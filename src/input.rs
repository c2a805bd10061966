use raylib::prelude::*;

/// Foto del estado de teclas de un tick. El navegador solo ve esto: nada de
/// estado global de input, cada tick recibe su propio snapshot.
#[derive(Clone, Copy, Default)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub look_left: bool,
    pub look_right: bool,
    pub look_up: bool,
    pub look_down: bool,
    pub ascend: bool,
    pub descend: bool,
    // flancos (solo el tick en que se presiono)
    pub toggle_fly: bool,
    pub toggle_minimap: bool,
}

impl InputState {
    /// WASD + flechas para mirar, Space/Shift para volar, F vuelo, M minimapa.
    pub fn poll(rl: &RaylibHandle) -> Self {
        Self {
            forward: rl.is_key_down(KeyboardKey::KEY_W),
            back: rl.is_key_down(KeyboardKey::KEY_S),
            strafe_left: rl.is_key_down(KeyboardKey::KEY_A),
            strafe_right: rl.is_key_down(KeyboardKey::KEY_D),
            look_left: rl.is_key_down(KeyboardKey::KEY_LEFT),
            look_right: rl.is_key_down(KeyboardKey::KEY_RIGHT),
            look_up: rl.is_key_down(KeyboardKey::KEY_UP),
            look_down: rl.is_key_down(KeyboardKey::KEY_DOWN),
            ascend: rl.is_key_down(KeyboardKey::KEY_SPACE),
            descend: rl.is_key_down(KeyboardKey::KEY_LEFT_SHIFT),
            toggle_fly: rl.is_key_pressed(KeyboardKey::KEY_F),
            toggle_minimap: rl.is_key_pressed(KeyboardKey::KEY_M),
        }
    }
}
