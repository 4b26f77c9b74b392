use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed card dimensions shared by every person node. Layout never measures
/// text; all spacing derives from these two numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            width: 260.0,
            height: 160.0,
        }
    }
}

/// Spacing parameters for the packed (vertical/horizontal) strategy.
/// `stem_length` must stay below `generation_gap - card height` so the bus
/// line lands between the parent and child rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackedConfig {
    pub sibling_gap: f32,
    pub cousin_gap: f32,
    pub partner_gap: f32,
    pub generation_gap: f32,
    pub stem_length: f32,
}

impl Default for PackedConfig {
    fn default() -> Self {
        Self {
            sibling_gap: 50.0,
            cousin_gap: 300.0,
            partner_gap: 24.0,
            generation_gap: 250.0,
            stem_length: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularConfig {
    pub base_radius: f32,
    pub radius_step: f32,
}

impl Default for CircularConfig {
    fn default() -> Self {
        Self {
            base_radius: 200.0,
            radius_step: 260.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanConfig {
    pub base_radius: f32,
    pub radius_step: f32,
    /// Total arc in radians; the fan is centered on the upward vertical.
    pub spread: f32,
    /// Extra vertical offset applied per generation so deeper rows fan
    /// outward and downward rather than wrapping behind the root.
    pub depth_drop: f32,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            base_radius: 180.0,
            radius_step: 180.0,
            spread: std::f32::consts::PI * 1.2,
            depth_drop: 120.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub card: CardConfig,
    pub packed: PackedConfig,
    pub circular: CircularConfig,
    pub fan: FanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub padding: f32,
    pub corner_radius: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            corner_radius: 12.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
struct CardConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct PackedConfigFile {
    sibling_gap: Option<f32>,
    cousin_gap: Option<f32>,
    partner_gap: Option<f32>,
    generation_gap: Option<f32>,
    stem_length: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct CircularConfigFile {
    base_radius: Option<f32>,
    radius_step: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct FanConfigFile {
    base_radius: Option<f32>,
    radius_step: Option<f32>,
    spread: Option<f32>,
    depth_drop: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct RenderConfigFile {
    padding: Option<f32>,
    corner_radius: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    theme: Option<String>,
    card: Option<CardConfigFile>,
    packed: Option<PackedConfigFile>,
    circular: Option<CircularConfigFile>,
    fan: Option<FanConfigFile>,
    render: Option<RenderConfigFile>,
}

/// Load a partial JSON config file over the defaults. Absent sections and
/// fields keep their default values.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "classic" {
            config.theme = Theme::classic();
        } else if theme_name == "modern" || theme_name == "default" {
            config.theme = Theme::modern();
        }
    }

    if let Some(card) = parsed.card {
        if let Some(v) = card.width {
            config.layout.card.width = v;
        }
        if let Some(v) = card.height {
            config.layout.card.height = v;
        }
    }

    if let Some(packed) = parsed.packed {
        if let Some(v) = packed.sibling_gap {
            config.layout.packed.sibling_gap = v;
        }
        if let Some(v) = packed.cousin_gap {
            config.layout.packed.cousin_gap = v;
        }
        if let Some(v) = packed.partner_gap {
            config.layout.packed.partner_gap = v;
        }
        if let Some(v) = packed.generation_gap {
            config.layout.packed.generation_gap = v;
        }
        if let Some(v) = packed.stem_length {
            config.layout.packed.stem_length = v;
        }
    }

    if let Some(circular) = parsed.circular {
        if let Some(v) = circular.base_radius {
            config.layout.circular.base_radius = v;
        }
        if let Some(v) = circular.radius_step {
            config.layout.circular.radius_step = v;
        }
    }

    if let Some(fan) = parsed.fan {
        if let Some(v) = fan.base_radius {
            config.layout.fan.base_radius = v;
        }
        if let Some(v) = fan.radius_step {
            config.layout.fan.radius_step = v;
        }
        if let Some(v) = fan.spread {
            config.layout.fan.spread = v;
        }
        if let Some(v) = fan.depth_drop {
            config.layout.fan.depth_drop = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
        if let Some(v) = render.corner_radius {
            config.render.corner_radius = v;
        }
    }

    Ok(config)
}
