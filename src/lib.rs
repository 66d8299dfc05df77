pub mod board;
pub mod camera;
pub mod config;
pub mod flood;
pub mod menu;
pub mod session;
pub mod state;

pub mod prelude {
    use bevy::{color::Color, math::Vec2};

    pub const BG_COLOR: Color = Color::srgb(0.0, 0.1, 0.3);
    pub const WINDOW_SIZE: Vec2 = Vec2::new(440.0, 540.0);

    pub const BOARD_SIZE: u32 = 12;
    pub const NUM_COLORS: u8 = 4;
    pub const MAX_MOVES: u32 = 15;
    pub const BOARD_POS: Vec2 = Vec2::new(0.0, 50.0);
    pub const CELL_SIZE_PX: Vec2 = Vec2::splat(30.0);

    /// cell colors, indexed by color index
    pub const PALETTE: [Color; 4] = [
        Color::srgb(0.271, 0.510, 0.710), // steel blue
        Color::srgb(0.851, 0.369, 0.369), // indian red
        Color::srgb(0.459, 0.741, 0.651), // medium aquamarine
        Color::srgb(0.949, 0.690, 0.341), // sandy brown
    ];

    pub const BUTTON_SIZE_PX: Vec2 = Vec2::splat(25.0);
    pub const BUTTON_SPACING_PX: f32 = 30.0;
    pub const SELECTOR_WIDTH_PX: f32 = 3.0;
    pub const SELECTOR_COLOR: Color = Color::WHITE;
    pub const RESTART_SIZE_PX: Vec2 = Vec2::new(100.0, 30.0);
    pub const RESTART_COLOR: Color = Color::srgb(0.83, 0.83, 0.83);
    pub const HINT_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);

    pub const WIN_COLOR: Color = Color::srgba(0.0, 0.5, 0.0, 0.78);
    pub const LOSS_COLOR: Color = Color::srgba(0.5, 0.0, 0.0, 0.78);
}
