use std::{fmt, str::FromStr};
use thiserror::Error;

/// The neutral gray used for color names which are not known
pub const FALLBACK_RGB: Rgb = Rgb::new(128, 128, 128);

/// The closed set of color names a mosaic may be drawn with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorName {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Cyan,
}

impl ColorName {
    /// All of the color names in display order
    pub const ALL: [ColorName; 8] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Purple,
        Self::Orange,
        Self::Pink,
        Self::Cyan,
    ];

    /// Retrieves the canonical english identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Pink => "pink",
            Self::Cyan => "cyan",
        }
    }

    /// Retrieves the rgb value bound to this name
    pub const fn rgb(&self) -> Rgb {
        match self {
            Self::Red => Rgb::new(255, 0, 0),
            Self::Blue => Rgb::new(0, 0, 255),
            Self::Green => Rgb::new(0, 128, 0),
            Self::Yellow => Rgb::new(255, 255, 0),
            Self::Purple => Rgb::new(128, 0, 128),
            Self::Orange => Rgb::new(255, 165, 0),
            Self::Pink => Rgb::new(255, 192, 203),
            Self::Cyan => Rgb::new(0, 255, 255),
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorName {
    type Err = UnknownColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownColorError(s.to_owned()))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown color name: {:?}", .0)]
pub struct UnknownColorError(pub String);

/// An 8 bit per channel rgb color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// The red component
    pub r: u8,
    /// The green component
    pub g: u8,
    /// The blue component
    pub b: u8,
}

impl Rgb {
    /// Creates a new rgb color
    ///
    /// # Parameters
    ///
    /// r: The red component
    ///
    /// g: The green component
    ///
    /// b: The blue component
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
        }
    }

    /// Formats the color as #rrggbb
    pub fn to_hex(&self) -> String {
        rgb_to_hex(self.r as i32, self.g as i32, self.b as i32)
    }
}

/// Looks up the rgb value of a color name, unknown names give FALLBACK_RGB
///
/// # Parameters
///
/// name: The canonical english color name
pub fn color_to_rgb(name: &str) -> Rgb {
    name.parse::<ColorName>()
        .map(|color| color.rgb())
        .unwrap_or(FALLBACK_RGB)
}

/// Formats the channels as a lowercase #rrggbb string, each channel is clamped to 0..=255 first
///
/// # Parameters
///
/// r: The red component
///
/// g: The green component
///
/// b: The blue component
pub fn rgb_to_hex(r: i32, g: i32, b: i32) -> String {
    format!("#{:02x}{:02x}{:02x}", r.clamp(0, 255), g.clamp(0, 255), b.clamp(0, 255))
}

/// Linearly interpolates between two named colors, each channel is truncated towards zero
///
/// # Parameters
///
/// start: The color for factor = 0
///
/// end: The color for factor = 1
///
/// factor: The interpolation factor in 0..=1
pub fn interpolate(start: &str, end: &str, factor: f64) -> String {
    let start = color_to_rgb(start);
    let end = color_to_rgb(end);

    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * factor) as i32;

    rgb_to_hex(channel(start.r, end.r), channel(start.g, end.g), channel(start.b, end.b))
}

/// Finds the color of a cell in a diagonal gradient going from start in the
/// top left corner to end in the bottom right corner
///
/// # Parameters
///
/// start: The color of the top left cell
///
/// end: The color of the bottom right cell
///
/// row: The row of the cell
///
/// col: The column of the cell
///
/// total_rows: The number of rows in the grid
///
/// total_cols: The number of columns in the grid
pub fn gradient_color(start: &str, end: &str, row: usize, col: usize, total_rows: usize, total_cols: usize) -> String {
    interpolate(start, end, gradient_factor(row, col, total_rows, total_cols))
}

/// The interpolation factor used by gradient_color, always in 0..=1 for cells inside the grid
pub fn gradient_factor(row: usize, col: usize, total_rows: usize, total_cols: usize) -> f64 {
    let normalize = |index: usize, total: usize| {
        if total > 1 {
            index as f64 / (total - 1) as f64
        } else {
            0.5
        }
    };

    (normalize(col, total_cols) + normalize(row, total_rows)) / 2.0
}

/// Describes a rgba color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    /// The red component
    pub r: f32,
    /// The green component
    pub g: f32,
    /// The blue component
    pub b: f32,
    /// The alpha component
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new_rgb(1.0, 1.0, 1.0);

    /// Creates a new rgb color with a = 1
    ///
    /// # Parameters
    ///
    /// r: The red component
    ///
    /// g: The green component
    ///
    /// b: The blue component
    pub const fn new_rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: 1.0,
        }
    }

    /// Converts an 8 bit sRGB color to a linear color for an sRGB render target
    ///
    /// # Parameters
    ///
    /// rgb: The color to convert
    pub fn from_srgb(rgb: &Rgb) -> Self {
        Self::new_rgb(srgb_to_linear(rgb.r), srgb_to_linear(rgb.g), srgb_to_linear(rgb.b))
    }

    /// Parses a #rrggbb string into a linear color
    ///
    /// # Parameters
    ///
    /// hex: The string to parse
    ///
    /// # Errors
    ///
    /// See ParseColorError for the possible errors
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let digits = hex.strip_prefix('#').ok_or_else(|| ParseColorError::MissingPrefix(hex.to_owned()))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ParseColorError::InvalidLength(hex.to_owned()));
        }

        let channel = |start: usize| {
            u8::from_str_radix(&digits[start..start + 2], 16)
                .map_err(|_| ParseColorError::InvalidDigit(hex.to_owned()))
        };
        let rgb = Rgb::new(channel(0)?, channel(2)?, channel(4)?);

        Ok(Self::from_srgb(&rgb))
    }

    /// Retrieves the data for the gpu
    pub fn get_data(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("A hex color must start with '#' but received {:?}", .0)]
    MissingPrefix(String),
    #[error("A hex color must have exactly 6 digits but received {:?}", .0)]
    InvalidLength(String),
    #[error("Invalid hex digit in {:?}", .0)]
    InvalidDigit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_map_to_their_rgb() {
        assert_eq!(color_to_rgb("red"), Rgb::new(255, 0, 0));
        assert_eq!(color_to_rgb("orange"), Rgb::new(255, 165, 0));
        assert_eq!(color_to_rgb("pink"), Rgb::new(255, 192, 203));
    }

    #[test]
    fn unknown_name_falls_back_to_gray() {
        assert_eq!(color_to_rgb("magenta"), Rgb::new(128, 128, 128));
        assert_eq!(color_to_rgb("magenta").to_hex(), "#808080");
        assert_eq!(interpolate("nope", "nope", 0.3), "#808080");
    }

    #[test]
    fn every_name_round_trips_through_from_str() {
        for name in ColorName::ALL {
            assert_eq!(name.as_str().parse::<ColorName>(), Ok(name));
        }
        assert!("Red".parse::<ColorName>().is_err());
    }

    #[test]
    fn rgb_to_hex_clamps_and_pads() {
        assert_eq!(rgb_to_hex(-10, 300, 128), "#00ff80");
        assert_eq!(rgb_to_hex(1, 2, 3), "#010203");
    }

    #[test]
    fn interpolate_endpoints_are_exact() {
        for a in ColorName::ALL {
            for b in ColorName::ALL {
                assert_eq!(interpolate(a.as_str(), b.as_str(), 0.0), a.rgb().to_hex());
                assert_eq!(interpolate(a.as_str(), b.as_str(), 1.0), b.rgb().to_hex());
            }
        }
    }

    #[test]
    fn interpolate_with_itself_is_identity() {
        for name in ColorName::ALL {
            for step in 0..=10 {
                let factor = step as f64 / 10.0;
                assert_eq!(interpolate(name.as_str(), name.as_str(), factor), name.rgb().to_hex());
            }
        }
    }

    #[test]
    fn interpolate_truncates_instead_of_rounding() {
        // 255 * 0.5 = 127.5 which truncates to 127 = 0x7f
        assert_eq!(interpolate("blue", "red", 0.5), "#7f007f");
        // 0 + (128 - 0) * 0.3 = 38.4, 255 * 0.7 = 178.5
        assert_eq!(interpolate("red", "green", 0.3), "#b22600");
    }

    #[test]
    fn gradient_corners_match_endpoints() {
        for n in 2..=20 {
            assert_eq!(gradient_color("red", "blue", 0, 0, n, n), interpolate("red", "blue", 0.0));
            assert_eq!(gradient_color("red", "blue", n - 1, n - 1, n, n), interpolate("red", "blue", 1.0));
        }
    }

    #[test]
    fn gradient_factor_stays_in_unit_range() {
        let n = 9;
        for row in 0..n {
            for col in 0..n {
                let factor = gradient_factor(row, col, n, n);
                assert!((0.0..=1.0).contains(&factor));
            }
        }
        assert_eq!(gradient_factor(0, 3, 4, 4), 0.5);
    }

    #[test]
    fn gradient_factor_handles_single_row_and_column() {
        assert_eq!(gradient_factor(0, 0, 1, 1), 0.5);
        assert_eq!(gradient_factor(0, 0, 0, 0), 0.5);
        assert_eq!(gradient_factor(0, 2, 1, 3), 0.75);
    }

    #[test]
    fn from_hex_parses_channels() {
        let close = |a: &Color, b: &Color| {
            a.get_data().iter().zip(b.get_data().iter()).all(|(x, y)| (x - y).abs() < 1e-5)
        };
        assert!(close(&Color::from_hex("#ffffff").unwrap(), &Color::WHITE));
        assert_eq!(Color::from_hex("#000000"), Ok(Color::BLACK));
        assert!(close(&Color::from_hex("#ff0000").unwrap(), &Color::new_rgb(1.0, 0.0, 0.0)));
        let gray = Color::from_hex("#808080").unwrap();
        assert!((gray.r - 0.2158605).abs() < 1e-5);
    }

    #[test]
    fn from_hex_rejects_malformed_input() {
        assert!(matches!(Color::from_hex("ff0000"), Err(ParseColorError::MissingPrefix(_))));
        assert!(matches!(Color::from_hex("#ff00"), Err(ParseColorError::InvalidLength(_))));
        assert!(matches!(Color::from_hex("#gg0000"), Err(ParseColorError::InvalidDigit(_))));
    }
}
