use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Role;

/// An sRGB colour as stored in chart data.
pub type Rgb = [u8; 3];

pub const GREY: Rgb = [0x7f, 0x7f, 0x7f];
pub const TEAM_AVERAGE: Rgb = [0xff, 0x00, 0x00];

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            [
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

/// Colour of a player role on the leaderboard. Unknown roles are grey.
pub fn role_color(role: &str) -> Rgb {
    match Role::parse(role) {
        Some(Role::Attacker) => [0x1f, 0x77, 0xb4],
        Some(Role::Midfielder) => [0xff, 0x7f, 0x0e],
        Some(Role::Defender) => [0x2c, 0xa0, 0x2c],
        Some(Role::Goalkeeper) => [0xd6, 0x27, 0x28],
        None => GREY,
    }
}

/// Bar cycle of the per-position percentage views.
pub const POSITION_CYCLE: [Rgb; 3] = [[0x1f, 0x77, 0xb4], [0xff, 0x7f, 0x0e], [0x2c, 0xa0, 0x2c]];

/// Bar cycle of the card-rate view.
pub const RATE_CYCLE: [Rgb; 3] = [[0x94, 0x67, 0xbd], [0x8c, 0x56, 0x4b], [0xe3, 0x77, 0xc2]];

/// `n` colours taken positionally from `cycle`; categories past its end
/// get evenly spaced hues instead of repeating.
pub fn positional(cycle: &[Rgb], n: usize) -> Vec<Rgb> {
    if n <= cycle.len() {
        return cycle[..n].to_vec();
    }
    let extra = generate_palette(n - cycle.len());
    cycle.iter().copied().chain(extra).collect()
}
