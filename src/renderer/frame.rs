//! Frame description types for 2D canvas rendering

use bytemuck::{Pod, Zeroable};

use crate::settings::Palette;

/// Axis-aligned filled rectangle in canvas pixels
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FillRect {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl FillRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            size: [w, h],
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Canvas `textAlign` value
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// A line of text anchored at (x, y) on its baseline
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: [f32; 4],
    pub align: TextAlign,
}

/// Everything needed to paint one frame, back to front
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rects: Vec<FillRect>,
    pub texts: Vec<TextLabel>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        self.rects.push(FillRect::new(x, y, w, h, color));
    }

    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: [f32; 4], align: TextAlign) {
        self.texts.push(TextLabel {
            text: text.into(),
            x,
            y,
            size,
            color,
            align,
        });
    }

    /// Rectangles as raw bytes (for handing to JS or a GPU buffer)
    pub fn rect_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rects)
    }
}

/// Colors for game elements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colors {
    pub background: [f32; 4],
    pub grid: [f32; 4],
    /// Body segments, paddles, locked cells, text
    pub block: [f32; 4],
    /// Food, ball, active piece
    pub active: [f32; 4],
}

const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub mod colors {
    use super::{Colors, rgb};

    pub const NOKIA: Colors = Colors {
        background: rgb(0x9bbb0f),
        grid: rgb(0x8bad0f),
        block: rgb(0x2c5234),
        active: rgb(0x1a3320),
    };

    pub const HIGH_CONTRAST: Colors = Colors {
        background: rgb(0x000000),
        grid: rgb(0x333333),
        block: rgb(0xffffff),
        active: rgb(0xffd700),
    };
}

impl Colors {
    pub fn for_palette(palette: Palette) -> Self {
        match palette {
            Palette::Nokia => colors::NOKIA,
            Palette::HighContrast => colors::HIGH_CONTRAST,
        }
    }
}

/// CSS color string for a canvas fill style
pub fn css_color(color: [f32; 4]) -> String {
    let [r, g, b, a] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("rgba({}, {}, {}, {:.3})", r, g, b, f32::from(a) / 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<FillRect>(), 8 * 4);
        let mut frame = Frame::new(10, 10);
        frame.rect(1.0, 2.0, 3.0, 4.0, [1.0; 4]);
        frame.rect(0.0, 0.0, 1.0, 1.0, [0.0; 4]);
        assert_eq!(frame.rect_bytes().len(), 2 * 32);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(colors::NOKIA.background), "#9bbb0f");
        assert_eq!(css_color(colors::NOKIA.block), "#2c5234");
        assert_eq!(css_color([1.0, 0.0, 0.0, 0.0]), "rgba(255, 0, 0, 0.000)");
    }
}
