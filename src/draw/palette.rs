use egui::Color32;

use crate::elements::{EntityKind, LinkKind, RiskLevel};

pub const PATH_COLOR: Color32 = Color32::from_rgb(0xfa, 0xcc, 0x15);
pub const SELECTION_COLOR: Color32 = Color32::WHITE;
pub const SEARCH_COLOR: Color32 = Color32::from_rgb(0x38, 0xbd, 0xf8);
pub const HOVER_COLOR: Color32 = Color32::from_gray(200);
pub const NODE_STROKE_COLOR: Color32 = Color32::from_gray(30);
pub const GLYPH_COLOR: Color32 = Color32::WHITE;
pub const LABEL_COLOR: Color32 = Color32::from_gray(220);

/// Opacity kept by elements outside the current selection's neighbourhood.
const DIM_FACTOR: f32 = 0.25;

pub fn dim(c: Color32) -> Color32 {
    c.gamma_multiply(DIM_FACTOR)
}

pub fn risk_color(risk: RiskLevel) -> Color32 {
    match risk {
        RiskLevel::Critical => Color32::from_rgb(0xdc, 0x26, 0x26),
        RiskLevel::High => Color32::from_rgb(0xf9, 0x73, 0x16),
        RiskLevel::Medium => Color32::from_rgb(0xea, 0xb3, 0x08),
        RiskLevel::Low => Color32::from_rgb(0x22, 0xc5, 0x5e),
        RiskLevel::Unknown => Color32::from_rgb(0x6b, 0x72, 0x80),
    }
}

pub fn link_color(kind: LinkKind) -> Color32 {
    match kind {
        LinkKind::Call => Color32::from_rgb(0x3b, 0x82, 0xf6),
        LinkKind::Sms => Color32::from_rgb(0x06, 0xb6, 0xd4),
        LinkKind::Transfer => Color32::from_rgb(0x22, 0xc5, 0x5e),
        LinkKind::Meeting => Color32::from_rgb(0xa8, 0x55, 0xf7),
        LinkKind::Family => Color32::from_rgb(0xec, 0x48, 0x99),
        LinkKind::Business => Color32::from_rgb(0xf5, 0x9e, 0x0b),
        LinkKind::Criminal => Color32::from_rgb(0xef, 0x44, 0x44),
    }
}

/// Radius in canvas units.
pub fn node_radius(kind: EntityKind) -> f32 {
    match kind {
        EntityKind::Person => 22.,
        _ => 18.,
    }
}

pub fn glyph(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Person => "P",
        EntityKind::Phone => "T",
        EntityKind::Account => "$",
        EntityKind::Address => "@",
        EntityKind::Organization => "O",
        EntityKind::CryptoAsset => "B",
        EntityKind::Vehicle => "V",
    }
}

/// Cuts `label` after `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut s: String = label.chars().take(max_chars).collect();
    s.push('…');
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_chars_not_bytes() {
        assert_eq!(truncate_label("short", 15), "short");
        assert_eq!(truncate_label("abcdefghijklmnopq", 15), "abcdefghijklmno…");
        assert_eq!(truncate_label("สมชาย ใจดี มีทรัพย์", 5), "สมชาย…");
    }

    #[test]
    fn persons_are_larger() {
        assert!(node_radius(EntityKind::Person) > node_radius(EntityKind::Phone));
    }
}
