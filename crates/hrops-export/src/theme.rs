//! Built-in visual themes.

use serde::Serialize;
use tracing::warn;

/// Name of the fallback theme.
pub const DEFAULT_THEME: &str = "default";

/// Named color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
    pub danger: &'static str,
    pub light: &'static str,
    pub dark: &'static str,
    pub border: &'static str,
}

/// Header and body font names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontPair {
    pub header: &'static str,
    pub body: &'static str,
}

/// Font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeScale {
    pub title: f32,
    pub subtitle: f32,
    pub header: f32,
    pub body: f32,
}

/// Layout constants in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    pub margin: f32,
    pub row_height: f32,
    pub header_padding: f32,
}

/// Complete style record used by the PDF, preview and chart renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Theme {
    pub name: &'static str,
    pub colors: Palette,
    pub fonts: FontPair,
    pub sizes: SizeScale,
    pub spacing: Spacing,
}

pub const DEFAULT: Theme = Theme {
    name: "default",
    colors: Palette {
        primary: "#2563eb",
        secondary: "#6b7280",
        success: "#059669",
        warning: "#d97706",
        danger: "#dc2626",
        light: "#f3f4f6",
        dark: "#1f2937",
        border: "#e5e7eb",
    },
    fonts: FontPair {
        header: "Helvetica-Bold",
        body: "Helvetica",
    },
    sizes: SizeScale {
        title: 24.0,
        subtitle: 14.0,
        header: 12.0,
        body: 10.0,
    },
    spacing: Spacing {
        margin: 50.0,
        row_height: 25.0,
        header_padding: 10.0,
    },
};

pub const DARK: Theme = Theme {
    name: "dark",
    colors: Palette {
        primary: "#3b82f6",
        secondary: "#9ca3af",
        success: "#22c55e",
        warning: "#f59e0b",
        danger: "#ef4444",
        light: "#1f2937",
        dark: "#f3f4f6",
        border: "#374151",
    },
    fonts: DEFAULT.fonts,
    sizes: DEFAULT.sizes,
    spacing: DEFAULT.spacing,
};

pub const CORPORATE: Theme = Theme {
    name: "corporate",
    colors: Palette {
        primary: "#1e40af",
        secondary: "#64748b",
        success: "#059669",
        warning: "#d97706",
        danger: "#dc2626",
        light: "#f8fafc",
        dark: "#0f172a",
        border: "#e2e8f0",
    },
    fonts: FontPair {
        header: "Arial-Bold",
        body: "Arial",
    },
    sizes: SizeScale {
        title: 28.0,
        subtitle: 16.0,
        header: 14.0,
        body: 12.0,
    },
    spacing: Spacing {
        margin: 60.0,
        row_height: 30.0,
        header_padding: 15.0,
    },
};

/// All built-in themes.
pub const BUILTIN_THEMES: [&Theme; 3] = [&DEFAULT, &DARK, &CORPORATE];

impl Theme {
    /// Look up a built-in theme by exact name.
    pub fn find(name: &str) -> Option<&'static Theme> {
        BUILTIN_THEMES.iter().copied().find(|t| t.name == name)
    }

    /// Look up a theme, falling back to the default one for unknown names.
    pub fn resolve(name: Option<&str>) -> &'static Theme {
        match name {
            None => &DEFAULT,
            Some(name) => Theme::find(name).unwrap_or_else(|| {
                warn!(theme = name, "Unknown theme, using default");
                &DEFAULT
            }),
        }
    }

    /// Color for a workflow status value (attendance, leave, payroll,
    /// incident, equipment, project states).
    pub fn status_color(&self, status: &str) -> &'static str {
        let c = &self.colors;
        match status {
            "PRESENT" | "APPROVED" | "PAID" | "RESOLVED" | "AVAILABLE" | "ACTIVE"
            | "COMPLETED" => c.success,
            "ABSENT" | "REJECTED" | "CANCELLED" | "RETIRED" => c.danger,
            "LATE" | "PENDING" | "OPEN" | "MAINTENANCE" | "PLANNING" => c.warning,
            "IN_PROGRESS" | "ASSIGNED" => c.primary,
            _ => c.secondary,
        }
    }
}

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Some(Rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    /// Packed `0xRRGGBB`.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.0) << 16) | (u32::from(self.1) << 8) | u32::from(self.2)
    }

    /// Channels as fractions in `0.0..=1.0`.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}
