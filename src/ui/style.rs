use crate::{core::constants, style::colors::COLORS};
use serde::{Deserialize, Serialize};

/// Marker colour variants, matching the shadcn button variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerVariant {
    #[default]
    Default,
    Primary,
    Destructive,
    Success,
    Warning,
}

impl MarkerVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerVariant::Default => "default",
            MarkerVariant::Primary => "primary",
            MarkerVariant::Destructive => "destructive",
            MarkerVariant::Success => "success",
            MarkerVariant::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl MarkerSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerSize::Sm => "sm",
            MarkerSize::Md => "md",
            MarkerSize::Lg => "lg",
        }
    }

    /// Dot diameter in pixels
    pub fn pixels(&self) -> u32 {
        match self {
            MarkerSize::Sm => constants::MARKER_SIZE_SM,
            MarkerSize::Md => constants::MARKER_SIZE_MD,
            MarkerSize::Lg => constants::MARKER_SIZE_LG,
        }
    }
}

/// Resolved appearance of a marker element, handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    /// Dot diameter in pixels
    pub size: u32,
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub text_color: &'static str,
    /// Animated halo around the dot
    pub pulse: bool,
    /// Label shown on hover
    pub label: Option<String>,
    /// CSS classes for the marker element
    pub class_name: String,
}

impl MarkerStyle {
    pub fn resolve(
        variant: MarkerVariant,
        size: MarkerSize,
        pulse: bool,
        label: Option<&str>,
        class: Option<&str>,
    ) -> Self {
        let colors = COLORS.marker.for_variant(variant);

        let mut class_name = format!(
            "shadmap-marker shadmap-marker-{} shadmap-marker-{}",
            variant.as_str(),
            size.as_str()
        );
        if pulse {
            class_name.push_str(" shadmap-marker-pulse");
        }
        if let Some(extra) = class.map(str::trim).filter(|c| !c.is_empty()) {
            class_name.push(' ');
            class_name.push_str(extra);
        }

        Self {
            size: size.pixels(),
            background_color: colors.bg,
            border_color: colors.border,
            text_color: colors.text,
            pulse,
            label: label.map(str::to_string),
            class_name,
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::resolve(MarkerVariant::Default, MarkerSize::Md, false, None, None)
    }
}
