/*!
 * Document-level presentation settings.
 *
 * Styles are applied uniformly to every cue when exporting ASS and are ignored
 * by the markup-free SRT and VTT writers.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

static RGBA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$")
        .expect("valid rgba regex")
});

static ASS_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&H([0-9A-Fa-f]{2})?([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})&?$")
        .expect("valid ASS color regex")
});

/// A color string that could not be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid color '{0}'")]
pub struct ColorParseError(pub String);

/// RGBA color; `a` is opacity (255 = opaque)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)` or `rgba(r,g,b,a)` with `a` in `[0,1]`
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        let err = || ColorParseError(input.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
            if !hex.is_ascii() {
                return Err(err());
            }
            return match hex.len() {
                3 => {
                    let expand = |i: usize| channel(hex[i..i + 1].repeat(2).as_str());
                    Ok(Color::rgb(expand(0)?, expand(1)?, expand(2)?))
                }
                6 => Ok(Color::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
                8 => Ok(Color {
                    r: channel(&hex[0..2])?,
                    g: channel(&hex[2..4])?,
                    b: channel(&hex[4..6])?,
                    a: channel(&hex[6..8])?,
                }),
                _ => Err(err()),
            };
        }

        let lowered = trimmed.to_lowercase();
        let caps = RGBA_REGEX.captures(&lowered).ok_or_else(err)?;
        let channel = |i: usize| caps[i].parse::<u8>().map_err(|_| err());
        let alpha = match caps.get(4) {
            Some(m) => {
                let value: f64 = m.as_str().parse().map_err(|_| err())?;
                if !(0.0..=1.0).contains(&value) {
                    return Err(err());
                }
                (value * 255.0).round() as u8
            }
            None => 255,
        };

        Ok(Color {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
            a: alpha,
        })
    }

    /// Scale opacity by a percentage (0-100)
    pub fn with_opacity(self, percent: u8) -> Self {
        let percent = percent.min(100) as u32;
        let alpha = self.a as u32 * percent / 100;
        Color { a: alpha as u8, ..self }
    }

    /// Encode as ASS `&HAABBGGRR`, where `AA` is transparency (00 = opaque)
    pub fn to_ass(&self) -> String {
        format!("&H{:02X}{:02X}{:02X}{:02X}", 255 - self.a, self.b, self.g, self.r)
    }

    /// Decode an ASS `&HAABBGGRR` (or `&HBBGGRR`) color
    pub fn from_ass(input: &str) -> Result<Self, ColorParseError> {
        let caps = ASS_COLOR_REGEX
            .captures(input.trim())
            .ok_or_else(|| ColorParseError(input.to_string()))?;
        let channel = |i: usize| u8::from_str_radix(&caps[i], 16).unwrap_or(0);
        let transparency = caps
            .get(1)
            .and_then(|m| u8::from_str_radix(m.as_str(), 16).ok())
            .unwrap_or(0);

        Ok(Color {
            r: channel(4),
            g: channel(3),
            b: channel(2),
            a: 255 - transparency,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Named vertical anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Middle,
    Bottom,
}

/// Vertical placement: percent from the top of the frame, or a named anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerticalPosition {
    Percent(u8),
    Anchor(Anchor),
}

impl VerticalPosition {
    /// Position as percent from the top
    pub fn y_percent(&self) -> u8 {
        match self {
            Self::Percent(p) => (*p).min(100),
            Self::Anchor(Anchor::Top) => 10,
            Self::Anchor(Anchor::Middle) => 50,
            Self::Anchor(Anchor::Bottom) => 90,
        }
    }

    /// ASS vertical margin
    pub fn margin_v(&self) -> u8 {
        100 - self.y_percent()
    }
}

impl Default for VerticalPosition {
    fn default() -> Self {
        Self::Percent(90)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    None,
    #[default]
    Fade,
    Pop,
    Slide,
}

/// Presentation settings shared by every cue of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubtitleStyle {
    pub font_family: String,
    pub font_size: u32,
    pub position: VerticalPosition,
    pub text_align: TextAlign,
    pub text_color: Color,
    pub background_color: Color,
    /// Background opacity, 0-100
    pub background_opacity: u8,
    pub animation: Animation,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 24,
            position: VerticalPosition::default(),
            text_align: TextAlign::default(),
            text_color: Color::WHITE,
            background_color: Color::BLACK,
            background_opacity: 80,
            animation: Animation::default(),
        }
    }
}

impl SubtitleStyle {
    /// ASS numpad alignment (1-9) from the anchor row and the text alignment column
    pub fn ass_alignment(&self) -> u8 {
        let row_base = match self.position {
            VerticalPosition::Anchor(Anchor::Top) => 7,
            VerticalPosition::Anchor(Anchor::Middle) => 4,
            _ => 1,
        };
        let column = match self.text_align {
            TextAlign::Left => 0,
            TextAlign::Center => 1,
            TextAlign::Right => 2,
        };
        row_base + column
    }

    /// Background color with the background opacity applied
    pub fn effective_background(&self) -> Color {
        self.background_color.with_opacity(self.background_opacity)
    }
}
