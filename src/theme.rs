/*!
 * Visual themes for styled subtitle output.
 *
 * A `Theme` is always complete: every attribute has a default, and the
 * override helpers return a new theme rather than patching one in place.
 * The built-in catalogue is static; callers add or shadow entries through a
 * `ThemeRegistry` they own.
 */

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{SubtitleError, SubtitleResult};

/// Name of the theme used when none is requested
pub const DEFAULT_THEME_NAME: &str = "default";

/// Packed ASS colour, `&HAABBGGRR` (alpha 00 is opaque)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0x00FF_FFFF);
    pub const BLACK: Color = Color(0x0000_0000);
    pub const RED: Color = Color(0x0000_00FF);
    pub const YELLOW: Color = Color(0x0000_FFFF);
    /// Black at roughly half opacity, used for background boxes
    pub const TRANSLUCENT_BLACK: Color = Color(0x8000_0000);

    /// Build a colour from RGB components and an ASS alpha (0 = opaque)
    pub fn from_rgba(r: u8, g: u8, b: u8, alpha: u8) -> Self {
        Color(u32::from_be_bytes([alpha, b, g, r]))
    }

    /// Parse `&HAABBGGRR`, `&HBBGGRR`, an optional trailing `&`, or a plain decimal value
    pub fn parse_ass(literal: &str) -> SubtitleResult<Self> {
        let trimmed = literal.trim().trim_end_matches('&');
        let parsed = match trimmed.strip_prefix("&H").or_else(|| trimmed.strip_prefix("&h")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => trimmed.parse::<u32>(),
        };
        parsed
            .map(Color)
            .map_err(|_| SubtitleError::InvalidArgument(format!("invalid colour '{}'", literal)))
    }

    /// Format as `&HAABBGGRR`
    pub fn to_ass_string(&self) -> String {
        format!("&H{:08X}", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ass_string())
    }
}

impl TryFrom<String> for Color {
    type Error = SubtitleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_ass(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_ass_string()
    }
}

/// Vertical placement shortcut mapped onto numpad alignment codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalPosition {
    Top,
    Center,
    Bottom,
}

impl VerticalPosition {
    // @returns: Bottom-centre 2, middle-centre 5, top-centre 8
    pub fn alignment_code(&self) -> u8 {
        match self {
            Self::Top => 8,
            Self::Center => 5,
            Self::Bottom => 2,
        }
    }
}

impl fmt::Display for VerticalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

impl FromStr for VerticalPosition {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "center" | "centre" | "middle" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            _ => Err(SubtitleError::InvalidArgument(format!(
                "invalid position '{}', expected top, center or bottom",
                s
            ))),
        }
    }
}

/// Complete set of visual attributes for one style row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Catalogue name, also the style name when written as-is
    // A missing name reads as empty so it is rejected instead of shadowing "default"
    #[serde(default)]
    pub name: String,
    pub font_name: String,
    pub font_size: u32,
    pub primary_colour: Color,
    pub secondary_colour: Color,
    pub outline_colour: Color,
    pub back_colour: Color,
    pub bold: bool,
    pub italic: bool,
    /// 1 = outline and shadow, 3 = opaque box
    pub border_style: u8,
    pub outline: f32,
    pub shadow: f32,
    /// Numpad-style alignment, 1 to 9
    pub alignment: u8,
    pub margin_l: u32,
    pub margin_r: u32,
    pub margin_v: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: DEFAULT_THEME_NAME.to_string(),
            font_name: "Arial".to_string(),
            font_size: 20,
            primary_colour: Color::WHITE,
            secondary_colour: Color::RED,
            outline_colour: Color::BLACK,
            back_colour: Color::BLACK,
            bold: false,
            italic: false,
            border_style: 1,
            outline: 2.0,
            shadow: 2.0,
            alignment: 2,
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
        }
    }
}

impl Theme {
    /// Copy of this theme under another name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy with an explicit font size
    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Copy with the alignment of the given vertical position
    pub fn with_position(mut self, position: VerticalPosition) -> Self {
        self.alignment = position.alignment_code();
        self
    }

    /// Copy drawing a translucent box behind the text
    pub fn with_background(mut self) -> Self {
        self.border_style = 3;
        self.back_colour = Color::TRANSLUCENT_BLACK;
        self
    }

    /// Check that the theme has a name and fits in a comma-separated style row
    pub fn validate(&self) -> SubtitleResult<()> {
        if self.name.trim().is_empty() {
            return Err(SubtitleError::InvalidArgument("theme has no name".to_string()));
        }
        for (field, value) in [("name", &self.name), ("font name", &self.font_name)] {
            if value.contains(',') {
                return Err(SubtitleError::InvalidArgument(format!(
                    "theme '{}' has a comma in its {}: '{}'",
                    self.name, field, value
                )));
            }
        }
        Ok(())
    }
}

// @const: Built-in theme catalogue
static BUILTIN_THEMES: Lazy<Vec<Theme>> = Lazy::new(|| {
    vec![
        Theme::default(),
        Theme {
            name: "classic".to_string(),
            font_name: "Trebuchet MS".to_string(),
            font_size: 22,
            primary_colour: Color::YELLOW,
            shadow: 1.0,
            ..Theme::default()
        },
        Theme {
            name: "bold".to_string(),
            font_name: "Arial Black".to_string(),
            font_size: 24,
            bold: true,
            outline: 3.0,
            shadow: 0.0,
            ..Theme::default()
        },
        Theme {
            name: "minimal".to_string(),
            font_name: "Helvetica".to_string(),
            font_size: 18,
            outline: 1.0,
            shadow: 0.0,
            margin_v: 20,
            ..Theme::default()
        },
        Theme {
            name: "cinema".to_string(),
            font_name: "Georgia".to_string(),
            font_size: 22,
            italic: true,
            primary_colour: Color::from_rgba(0xDC, 0xDC, 0xDC, 0),
            outline: 1.0,
            shadow: 3.0,
            margin_v: 30,
            ..Theme::default()
        },
        Theme {
            name: "news".to_string(),
            font_name: "Verdana".to_string(),
            bold: true,
            alignment: 8,
            ..Theme::default()
        }
        .with_background(),
    ]
});

/// Built-in themes in catalogue order
pub fn builtin_themes() -> &'static [Theme] {
    BUILTIN_THEMES.as_slice()
}

/// Theme lookup combining the built-in catalogue with caller-registered themes
#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    custom: HashMap<String, Theme>,
}

impl ThemeRegistry {
    /// Registry containing only the built-in themes
    pub fn with_builtins() -> Self {
        Self::default()
    }

    /// Registry with the given themes registered on top of the built-ins
    pub fn with_themes<'a>(themes: impl IntoIterator<Item = &'a Theme>) -> SubtitleResult<Self> {
        let mut registry = Self::with_builtins();
        for theme in themes {
            registry.register(theme.clone())?;
        }
        Ok(registry)
    }

    /// Add a theme, replacing any custom or built-in theme of the same name.
    ///
    /// Fails with `InvalidArgument` for an unnamed theme or a comma in the
    /// name or font name.
    pub fn register(&mut self, theme: Theme) -> SubtitleResult<()> {
        theme.validate()?;
        let key = theme.name.to_lowercase();
        if self.custom.contains_key(&key) || builtin(&key).is_some() {
            debug!("Theme '{}' now shadows an existing theme", theme.name);
        }
        self.custom.insert(key, theme);
        Ok(())
    }

    /// Resolve a theme by name, case-insensitively
    pub fn get(&self, name: &str) -> SubtitleResult<&Theme> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return Err(SubtitleError::InvalidArgument("theme name is empty".to_string()));
        }

        self.custom
            .get(&key)
            .or_else(|| builtin(&key))
            .ok_or_else(|| SubtitleError::ThemeNotFound(name.to_string()))
    }

    /// Whether a theme name resolves
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Every resolvable theme, built-ins first, custom themes after, sorted by name
    pub fn themes(&self) -> Vec<&Theme> {
        let mut themes: Vec<&Theme> = BUILTIN_THEMES
            .iter()
            .filter(|theme| !self.custom.contains_key(&theme.name.to_lowercase()))
            .collect();

        let mut custom: Vec<&Theme> = self.custom.values().collect();
        custom.sort_by(|a, b| a.name.cmp(&b.name));
        themes.extend(custom);
        themes
    }
}

fn builtin(key: &str) -> Option<&'static Theme> {
    BUILTIN_THEMES.iter().find(|theme| theme.name == key)
}
