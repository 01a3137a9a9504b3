pub mod panels;
pub mod plot;

use eframe::egui::Color32;

use crate::color::Rgb;

pub fn to_color32([r, g, b]: Rgb) -> Color32 {
    Color32::from_rgb(r, g, b)
}
