//! Shadcn-aligned colour tokens (zinc palette) for basemaps and markers.

use crate::ui::style::MarkerVariant;

/// Basemap colours for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasemapPalette {
    pub background: &'static str,
    pub land: &'static str,
    pub water: &'static str,
    pub road_minor: &'static str,
    pub road_major: &'static str,
    pub road_highway: &'static str,
    pub building: &'static str,
    pub label: &'static str,
    pub label_halo: &'static str,
    pub boundary: &'static str,
}

/// Fill, border and text colour of a marker variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerColors {
    pub bg: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPalette {
    pub default: MarkerColors,
    pub primary: MarkerColors,
    pub destructive: MarkerColors,
    pub success: MarkerColors,
    pub warning: MarkerColors,
}

impl MarkerPalette {
    pub fn for_variant(&self, variant: MarkerVariant) -> MarkerColors {
        match variant {
            MarkerVariant::Default => self.default,
            MarkerVariant::Primary => self.primary,
            MarkerVariant::Destructive => self.destructive,
            MarkerVariant::Success => self.success,
            MarkerVariant::Warning => self.warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTokens {
    pub dark: BasemapPalette,
    pub light: BasemapPalette,
    pub marker: MarkerPalette,
}

pub const COLORS: ColorTokens = ColorTokens {
    dark: BasemapPalette {
        background: "#09090b", // zinc-950
        land: "#0c0c0e",
        water: "#0c1929",
        road_minor: "#18181b",   // zinc-900
        road_major: "#27272a",   // zinc-800
        road_highway: "#3f3f46", // zinc-700
        building: "#18181b",     // zinc-900
        label: "#71717a",        // zinc-500
        label_halo: "#09090b",   // zinc-950
        boundary: "#27272a",     // zinc-800
    },
    light: BasemapPalette {
        background: "#fafafa", // zinc-50
        land: "#f4f4f5",       // zinc-100
        water: "#dbeafe",
        road_minor: "#e4e4e7",   // zinc-200
        road_major: "#d4d4d8",   // zinc-300
        road_highway: "#a1a1aa", // zinc-400
        building: "#e4e4e7",     // zinc-200
        label: "#71717a",        // zinc-500
        label_halo: "#ffffff",
        boundary: "#d4d4d8", // zinc-300
    },
    marker: MarkerPalette {
        default: MarkerColors {
            bg: "#27272a",     // zinc-800
            border: "#3f3f46", // zinc-700
            text: "#fafafa",   // zinc-50
        },
        primary: MarkerColors {
            bg: "#3b82f6",     // blue-500
            border: "#2563eb", // blue-600
            text: "#ffffff",
        },
        destructive: MarkerColors {
            bg: "#ef4444",     // red-500
            border: "#dc2626", // red-600
            text: "#ffffff",
        },
        success: MarkerColors {
            bg: "#22c55e",     // green-500
            border: "#16a34a", // green-600
            text: "#ffffff",
        },
        warning: MarkerColors {
            bg: "#f59e0b",     // amber-500
            border: "#d97706", // amber-600
            text: "#ffffff",
        },
    },
};
