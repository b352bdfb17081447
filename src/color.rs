use eframe::egui::Color32;
use palette::Srgb;

use crate::config::ColorConfig;
use crate::data::series::Category;
use crate::data::model::Statistic;

// ---------------------------------------------------------------------------
// Fixed colour per chart category
// ---------------------------------------------------------------------------

/// Parse a `#rrggbb` string into a [`Color32`].
pub fn parse_hex(hex: &str) -> anyhow::Result<Color32> {
    let rgb: Srgb<u8> = hex
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("'{hex}' is not a hex colour: {e}"))?;
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Colours for the four bars of every benchmark chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryColors {
    pub top_decile: Color32,
    pub top_quartile: Color32,
    pub average: Color32,
    pub fund: Color32,
}

impl CategoryColors {
    pub fn from_config(config: &ColorConfig) -> anyhow::Result<Self> {
        Ok(Self {
            top_decile: parse_hex(&config.top_decile)?,
            top_quartile: parse_hex(&config.top_quartile)?,
            average: parse_hex(&config.average)?,
            fund: parse_hex(&config.fund)?,
        })
    }

    pub fn color_for(&self, category: Category) -> Color32 {
        match category {
            Category::Benchmark(Statistic::TopDecile) => self.top_decile,
            Category::Benchmark(Statistic::TopQuartile) => self.top_quartile,
            Category::Benchmark(Statistic::Average) => self.average,
            Category::Fund => self.fund,
        }
    }
}

impl Default for CategoryColors {
    fn default() -> Self {
        Self {
            top_decile: Color32::from_rgb(0x4E, 0x79, 0xA7),
            top_quartile: Color32::from_rgb(0x76, 0xB7, 0xB2),
            average: Color32::from_rgb(0xF2, 0x8E, 0x2B),
            fund: Color32::from_rgb(0xE1, 0x57, 0x59),
        }
    }
}
