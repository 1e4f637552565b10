use crate::transform::ColorKey;
use iced::Color;

/// Fixed colors for the named load phases.
pub const COLOR_MAP: [(&str, u32); 5] = [
    ("LoadScene", 0x636EFA),
    ("LoadAsset", 0x636EFA),
    ("GetPreloadObjects", 0xEF553B),
    ("CleanPreload", 0x00CC96),
    ("LoadMods", 0xAB63FA),
];

/// Qualitative sequence used for keys without a fixed color.
pub const DEFAULT_SEQUENCE: [u32; 10] = [
    0x636EFA, 0xEF553B, 0x00CC96, 0xAB63FA, 0xFFA15A, 0x19D3F3, 0xFF6692, 0xB6E880, 0xFF97FF,
    0xFECB52,
];

pub fn color_from_hex(rgb: u32) -> Color {
    Color::from_rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Assigns a color to every color key, remembering earlier assignments.
///
/// A new key takes `DEFAULT_SEQUENCE[known % 10]`, where `known` counts
/// every key already assigned, the fixed ones included.
#[derive(Debug, Clone)]
pub struct Palette {
    assigned: Vec<(ColorKey, Color)>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    pub fn new() -> Self {
        let assigned = COLOR_MAP
            .iter()
            .map(|&(label, rgb)| (ColorKey::Label(label.to_string()), color_from_hex(rgb)))
            .collect();
        Self { assigned }
    }

    pub fn color_for(&mut self, key: &ColorKey) -> Color {
        if let Some((_, color)) = self.assigned.iter().find(|(k, _)| k == key) {
            return *color;
        }
        let color = color_from_hex(DEFAULT_SEQUENCE[self.assigned.len() % DEFAULT_SEQUENCE.len()]);
        self.assigned.push((key.clone(), color));
        color
    }
}

/// Darkened variant of `color` for outlines.
pub fn shade(color: Color, factor: f32) -> Color {
    Color::from_rgba(
        color.r * factor,
        color.g * factor,
        color.b * factor,
        color.a,
    )
}

/// Whether dark text reads better than light text on `color`.
pub fn prefers_dark_text(color: Color) -> bool {
    0.299 * color.r + 0.587 * color.g + 0.114 * color.b > 0.6
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> ColorKey {
        ColorKey::Label(s.to_string())
    }

    #[test]
    fn fixed_phases_use_the_color_map() {
        let mut palette = Palette::new();
        assert_eq!(palette.color_for(&label("LoadScene")), color_from_hex(0x636EFA));
        assert_eq!(palette.color_for(&label("LoadAsset")), color_from_hex(0x636EFA));
        assert_eq!(palette.color_for(&label("GetPreloadObjects")), color_from_hex(0xEF553B));
        assert_eq!(palette.color_for(&label("CleanPreload")), color_from_hex(0x00CC96));
        assert_eq!(palette.color_for(&label("LoadMods")), color_from_hex(0xAB63FA));
    }

    #[test]
    fn unmapped_keys_continue_after_the_fixed_entries() {
        let mut palette = Palette::new();
        assert_eq!(palette.color_for(&ColorKey::Parity(1)), color_from_hex(0x19D3F3));
        assert_eq!(palette.color_for(&ColorKey::Parity(0)), color_from_hex(0xFF6692));
        // Repeated keys keep their first color.
        assert_eq!(palette.color_for(&ColorKey::Parity(1)), color_from_hex(0x19D3F3));
        assert_eq!(palette.color_for(&label("Other")), color_from_hex(0xB6E880));
    }

    #[test]
    fn sequence_wraps_around() {
        let mut palette = Palette::new();
        for i in 0..5 {
            palette.color_for(&label(&format!("k{}", i)));
        }
        assert_eq!(palette.color_for(&label("wrapped")), color_from_hex(0x636EFA));
    }

    #[test]
    fn hex_components() {
        let color = color_from_hex(0xFF8000);
        assert_eq!(color, Color::from_rgb8(255, 128, 0));
    }

    #[test]
    fn text_contrast() {
        assert!(prefers_dark_text(color_from_hex(0xFECB52)));
        assert!(!prefers_dark_text(color_from_hex(0x636EFA)));
    }
}
