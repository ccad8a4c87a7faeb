use ratatui::style::Color;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Theme {
    pub draft_border: Color,
    pub final_border: Color,
    pub accent: Color,
    pub muted: Color,
    pub success: Color,
}

#[cfg(test)]
impl Default for Theme {
    fn default() -> Self {
        crate::config::GuideConfig::default().theme
    }
}

impl Theme {
    #[cfg(test)]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let cfg: ThemeFileToml = toml::from_str(s)?;
        Ok(Self::from(cfg.theme))
    }
}

impl From<ThemeToml> for Theme {
    fn from(cfg: ThemeToml) -> Self {
        Self {
            draft_border: cfg.draft_border.to_color(),
            final_border: cfg.final_border.to_color(),
            accent: cfg.accent.to_color(),
            muted: cfg.muted.to_color(),
            success: cfg.success.to_color(),
        }
    }
}

#[cfg(test)]
#[derive(Debug, Deserialize)]
struct ThemeFileToml {
    theme: ThemeToml,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeToml {
    draft_border: RgbToml,
    final_border: RgbToml,
    accent: RgbToml,
    muted: RgbToml,
    success: RgbToml,
}

#[derive(Debug, Clone, Deserialize)]
struct RgbToml {
    r: u8,
    g: u8,
    b: u8,
}

impl RgbToml {
    fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}
