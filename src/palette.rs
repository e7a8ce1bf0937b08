//! Colors and the fixed color-scheme table.
//!
//! Colors are authored as sRGB (hex literals, HSL) and converted to linear
//! space only when they are handed to the GPU.

use rand::Rng;

/// An sRGB color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_hex(0xffffff);
    pub const BLACK: Color = Color::from_hex(0x000000);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Hue, saturation and lightness all in `0.0..=1.0`; the hue wraps.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Self::new(l, l, l);
        }
        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;
        Self::new(
            hue_to_rgb(q, p, h + 1.0 / 3.0),
            hue_to_rgb(q, p, h),
            hue_to_rgb(q, p, h - 1.0 / 3.0),
        )
    }

    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_linear(self) -> [f32; 3] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        ]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b] = self.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

/// A named primary/secondary/accent triple used to retint lights and materials.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScheme {
    pub name: &'static str,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
}

impl ColorScheme {
    pub fn colors(&self) -> [Color; 3] {
        [self.primary, self.secondary, self.accent]
    }

    /// Picks one of the three entries uniformly.
    pub fn pick(&self, rng: &mut impl Rng) -> Color {
        self.colors()[rng.gen_range(0..3)]
    }
}

pub const SCHEMES: [ColorScheme; 4] = [
    ColorScheme {
        name: "cyber",
        primary: Color::from_hex(0x00eaff),
        secondary: Color::from_hex(0xffdb00),
        accent: Color::from_hex(0xff00aa),
    },
    ColorScheme {
        name: "sunset",
        primary: Color::from_hex(0xff6b35),
        secondary: Color::from_hex(0xf7c59f),
        accent: Color::from_hex(0xd7263d),
    },
    ColorScheme {
        name: "forest",
        primary: Color::from_hex(0x2d6a4f),
        secondary: Color::from_hex(0x95d5b2),
        accent: Color::from_hex(0xd8f3dc),
    },
    ColorScheme {
        name: "neon",
        primary: Color::from_hex(0x7b2ff7),
        secondary: Color::from_hex(0xf107a3),
        accent: Color::from_hex(0x00f5d4),
    },
];

/// Index of the scheme following `current`, wrapping around the table.
pub fn next_scheme(current: usize) -> usize {
    (current + 1) % SCHEMES.len()
}
