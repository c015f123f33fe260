use serde::{Deserialize, Serialize};

use crate::i18n::Lang;
use crate::template::TemplateId;

pub const MAX_ATTACHMENTS: usize = 6;
pub const MAX_ATTACHMENT_BYTES: u64 = 2 * 1024 * 1024;

/// Supported page geometries for the paginated render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperFormat {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PaperFormat {
    pub const ALL: [PaperFormat; 3] = [PaperFormat::A4, PaperFormat::Letter, PaperFormat::Legal];

    pub fn as_str(self) -> &'static str {
        match self {
            PaperFormat::A4 => "A4",
            PaperFormat::Letter => "Letter",
            PaperFormat::Legal => "Legal",
        }
    }

    /// Physical page size in millimetres, width × height.
    pub fn size_mm(self) -> (f64, f64) {
        match self {
            PaperFormat::A4 => (210.0, 297.0),
            PaperFormat::Letter => (215.9, 279.4),
            PaperFormat::Legal => (215.9, 355.6),
        }
    }
}

/// An embedded image: uploaded file converted to base64 so it can be stored
/// in a JSON column and served to both render targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub mime: String,
    pub data: String,
    pub size: u64,
}

impl Attachment {
    pub fn decode(&self) -> Option<Vec<u8>> {
        use base64::Engine as _;
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .ok()
    }

    /// File extension the paginated renderer uses for virtual asset paths.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/jpeg" => "jpg",
            _ => "png",
        }
    }
}

/// Everything a template evaluation depends on besides the invoice and the
/// company profile. Threaded explicitly so rendering stays a pure function
/// of its arguments.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub lang: Lang,
    /// `#rrggbb`; `None` falls back to the template's own accent.
    pub accent: Option<String>,
    pub paper: PaperFormat,
}

/// Persisted UI preferences (settings tab).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub lang: Lang,
    #[serde(default)]
    pub accent: Option<String>,
    pub paper: PaperFormat,
    pub template: TemplateId,
}

impl Preferences {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            lang: self.lang,
            accent: self.accent.clone(),
            paper: self.paper,
        }
    }
}

/// `#rrggbb` → egui color. Lenient about a missing `#`.
pub fn parse_hex_color(hex: &str) -> Option<egui::Color32> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(egui::Color32::from_rgb(r, g, b))
}

pub fn color_to_hex(color: egui::Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_sizes() {
        assert_eq!(PaperFormat::A4.size_mm(), (210.0, 297.0));
        assert_eq!(PaperFormat::Letter.size_mm(), (215.9, 279.4));
        assert_eq!(PaperFormat::Legal.size_mm(), (215.9, 355.6));
    }

    #[test]
    fn hex_color_round_trip() {
        let c = parse_hex_color("#6366f1").unwrap();
        assert_eq!(color_to_hex(c), "#6366f1");
        assert!(parse_hex_color("#12345").is_none());
        assert!(parse_hex_color("red").is_none());
    }

    #[test]
    fn attachment_decode() {
        use base64::Engine as _;
        let data = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
        let att = Attachment {
            name: "a.png".into(),
            mime: "image/png".into(),
            data,
            size: 3,
        };
        assert_eq!(att.decode().unwrap(), vec![1, 2, 3]);
        assert_eq!(att.extension(), "png");
    }
}
