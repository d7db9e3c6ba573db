//! Color math
//!
//! Hex parsing, HSL transforms and WCAG contrast. Transforms are relative, matching the
//! common design-tool convention: `lighten(0.1)` raises lightness by 10% of its current
//! value rather than by ten points.

use std::fmt;

/// An opaque sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees [0, 360), saturation and lightness in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (alpha ignored); the `#` is optional.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let digits = raw.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 | 8 => Some(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_hsl(&self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;

        if delta == 0.0 {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };
        let h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Hsl { h: h * 60.0, s, l }
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        let Hsl { h, s, l } = hsl.normalized();
        if s == 0.0 {
            let v = to_channel(l);
            return Self::new(v, v, v);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = h / 360.0;
        Self::new(
            to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_channel(hue_to_rgb(p, q, h)),
            to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }

    fn map_hsl(&self, f: impl FnOnce(Hsl) -> Hsl) -> Self {
        Self::from_hsl(f(self.to_hsl()))
    }

    pub fn rotate(&self, degrees: f64) -> Self {
        self.map_hsl(|c| Hsl { h: c.h + degrees, ..c })
    }

    pub fn lighten(&self, ratio: f64) -> Self {
        self.map_hsl(|c| Hsl { l: c.l + c.l * ratio, ..c })
    }

    pub fn darken(&self, ratio: f64) -> Self {
        self.map_hsl(|c| Hsl { l: c.l - c.l * ratio, ..c })
    }

    pub fn saturate(&self, ratio: f64) -> Self {
        self.map_hsl(|c| Hsl { s: c.s + c.s * ratio, ..c })
    }

    pub fn desaturate(&self, ratio: f64) -> Self {
        self.map_hsl(|c| Hsl { s: c.s - c.s * ratio, ..c })
    }

    pub fn negate(&self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// WCAG 2.x relative luminance in [0, 1]
    pub fn relative_luminance(&self) -> f64 {
        let linear = |c: u8| {
            let c = f64::from(c) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// WCAG contrast ratio in [1, 21]
    pub fn contrast(&self, other: &Rgb) -> f64 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        let (light, dark) = if a >= b { (a, b) } else { (b, a) };
        (light + 0.05) / (dark + 0.05)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Hsl {
    fn normalized(self) -> Self {
        Self {
            h: self.h.rem_euclid(360.0),
            s: self.s.clamp(0.0, 1.0),
            l: self.l.clamp(0.0, 1.0),
        }
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Contrast between two hex colors; `None` if either does not parse
pub fn contrast_ratio(foreground: &str, background: &str) -> Option<f64> {
    Some(Rgb::from_hex(foreground)?.contrast(&Rgb::from_hex(background)?))
}

/// Apply `f` to a hex color, leaving unparseable input untouched
pub fn transform_hex(hex: &str, f: impl FnOnce(Rgb) -> Rgb) -> String {
    match Rgb::from_hex(hex) {
        Some(rgb) => f(rgb).to_hex(),
        None => hex.to_string(),
    }
}
