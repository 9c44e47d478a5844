use serde::{Serialize, Serializer};
use std::fmt;

use crate::models::Period;
use crate::time::codec::classify_period;

/// A named four-stop background gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub name: &'static str,
    pub colors: [&'static str; 4],
}

pub const MORNING_PALETTE: Palette = Palette {
    name: "morning",
    colors: ["#FFE5B4", "#FFB07C", "#FFD27F", "#87CEEB"],
};

pub const AFTERNOON_PALETTE: Palette = Palette {
    name: "afternoon",
    colors: ["#87CEEB", "#4FC3F7", "#FFF3B0", "#FFD700"],
};

pub const EVENING_PALETTE: Palette = Palette {
    name: "evening",
    colors: ["#FF6B00", "#FF8C42", "#C9184A", "#590D22"],
};

pub const NIGHT_PALETTE: Palette = Palette {
    name: "night",
    colors: ["#000814", "#001D3D", "#003566", "#0B132B"],
};

/// Palette for a period of the day.
pub fn palette_for(period: Period) -> &'static Palette {
    match period {
        Period::Morning => &MORNING_PALETTE,
        Period::Afternoon => &AFTERNOON_PALETTE,
        Period::Evening => &EVENING_PALETTE,
        Period::Night => &NIGHT_PALETTE,
    }
}

/// Palette for an hour value, using the same half-open ranges as [`classify_period`].
pub fn select(hour: f64) -> &'static Palette {
    palette_for(classify_period(hour))
}

/// 8-bit RGB color, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Relative luminance in `[0, 1]` using the Rec. 601 weights.
    pub fn luminance(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Continuous background color over the day: dark at midnight, orange at dawn and dusk,
/// gold at noon.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundScale {
    stops: Vec<(f64, Rgb)>,
}

impl Default for BackgroundScale {
    fn default() -> Self {
        let midnight = Rgb::new(0x00, 0x08, 0x14);
        let twilight = Rgb::new(0xFF, 0x6B, 0x00);
        let noon = Rgb::new(0xFF, 0xD7, 0x00);
        Self {
            stops: vec![
                (0.0, midnight),
                (6.0, twilight),
                (12.0, noon),
                (18.0, twilight),
                (24.0, midnight),
            ],
        }
    }
}

impl BackgroundScale {
    /// Build a scale from `(hour, color)` stops; stops are sorted by hour.
    pub fn new(mut stops: Vec<(f64, Rgb)>) -> Self {
        stops.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { stops }
    }

    /// Interpolated color at `hours`, clamped to the first and last stop.
    pub fn color_at(&self, hours: f64) -> Rgb {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgb::BLACK;
        };
        if !hours.is_finite() || hours <= first.0 {
            return first.1;
        }
        if hours >= last.0 {
            return last.1;
        }
        for pair in self.stops.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if hours <= end.0 {
                let span = end.0 - start.0;
                let t = if span > 0.0 { (hours - start.0) / span } else { 1.0 };
                return start.1.lerp(end.1, t);
            }
        }
        last.1
    }
}

/// Black text on light backgrounds, white on dark ones.
pub fn contrast_text_color(background: Rgb) -> Rgb {
    if background.luminance() > 0.5 {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}
