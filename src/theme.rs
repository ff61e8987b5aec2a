use std::fs;
use std::path::Path;

use ratatui::style::Color;
use serde::Deserialize;
use tracing::warn;

use crate::plan::Action;

#[derive(Debug, Clone)]
pub struct Theme {
    pub border: Color,
    pub title: Color,
    pub text_fg: Color,
    pub muted_fg: Color,
    pub help_fg: Color,
    pub status_bg: Color,
    pub error_fg: Color,
    pub accent: Color,
    pub badge_fg: Color,
    pub pick: Color,
    pub squash: Color,
    pub fixup: Color,
    pub edit: Color,
    pub drop: Color,
    pub tag_fg: Color,
    pub hash_label: Color,
    pub author_label: Color,
    pub date_label: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin Mocha
        Self {
            border: Color::Rgb(203, 166, 247),
            title: Color::Rgb(137, 180, 250),
            text_fg: Color::Rgb(205, 214, 244),
            muted_fg: Color::Rgb(166, 173, 200),
            help_fg: Color::Rgb(88, 91, 112),
            status_bg: Color::Rgb(49, 50, 68),
            error_fg: Color::Rgb(243, 139, 168),
            accent: Color::Rgb(203, 166, 247),
            badge_fg: Color::Rgb(17, 17, 27),
            pick: Color::Rgb(166, 227, 161),
            squash: Color::Rgb(250, 179, 135),
            fixup: Color::Rgb(249, 226, 175),
            edit: Color::Rgb(137, 220, 235),
            drop: Color::Rgb(243, 139, 168),
            tag_fg: Color::Rgb(249, 226, 175),
            hash_label: Color::Rgb(137, 180, 250),
            author_label: Color::Rgb(166, 227, 161),
            date_label: Color::Rgb(250, 179, 135),
        }
    }
}

impl Theme {
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path_ref = path.as_ref();
        match fs::read_to_string(path_ref) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(theme) => theme,
                Err(err) => {
                    warn!(path = %path_ref.display(), %err, "failed to parse theme file; using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                warn!(path = %path_ref.display(), %err, "failed to read theme file; using defaults");
                Self::default()
            }
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let cfg: ThemeToml = toml::from_str(s)?;
        let c = cfg.colors;
        Ok(Self {
            border: c.border.to_color(),
            title: c.title.to_color(),
            text_fg: c.text_fg.to_color(),
            muted_fg: c.muted_fg.to_color(),
            help_fg: c.help_fg.to_color(),
            status_bg: c.status_bg.to_color(),
            error_fg: c.error_fg.to_color(),
            accent: c.accent.to_color(),
            badge_fg: c.badge_fg.to_color(),
            pick: c.pick.to_color(),
            squash: c.squash.to_color(),
            fixup: c.fixup.to_color(),
            edit: c.edit.to_color(),
            drop: c.drop.to_color(),
            tag_fg: c.tag_fg.to_color(),
            hash_label: c.hash_label.to_color(),
            author_label: c.author_label.to_color(),
            date_label: c.date_label.to_color(),
        })
    }

    pub fn action_color(&self, action: Action) -> Color {
        match action {
            Action::Pick => self.pick,
            Action::Squash => self.squash,
            Action::Fixup => self.fixup,
            Action::Edit => self.edit,
            Action::Drop => self.drop,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThemeToml {
    colors: ThemeColorsToml,
}

#[derive(Debug, Deserialize)]
struct ThemeColorsToml {
    border: RgbToml,
    title: RgbToml,
    text_fg: RgbToml,
    muted_fg: RgbToml,
    help_fg: RgbToml,
    status_bg: RgbToml,
    error_fg: RgbToml,
    accent: RgbToml,
    badge_fg: RgbToml,
    pick: RgbToml,
    squash: RgbToml,
    fixup: RgbToml,
    edit: RgbToml,
    drop: RgbToml,
    tag_fg: RgbToml,
    hash_label: RgbToml,
    author_label: RgbToml,
    date_label: RgbToml,
}

#[derive(Debug, Deserialize)]
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
