use crate::foundation::core::Rgba8;

/// Color scheme of the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Light text on near-black.
    #[default]
    Dark,
    /// Dark text on white.
    Light,
    /// Brown text on paper.
    Sepia,
    /// White on black with a yellow highlight.
    HighContrast,
}

/// Resolved colors for a [`Theme`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Viewport background.
    pub background: Rgba8,
    /// Regular word color.
    pub text: Rgba8,
    /// Active word color.
    pub highlight: Rgba8,
    /// Band drawn behind active words.
    pub highlight_bg: Rgba8,
}

impl Theme {
    /// All themes, in menu order.
    pub const ALL: [Theme; 4] = [Theme::Dark, Theme::Light, Theme::Sepia, Theme::HighContrast];

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Sepia => "sepia",
            Theme::HighContrast => "high_contrast",
        }
    }

    /// Parse a name produced by [`Theme::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name.trim())
    }

    /// Colors used by the renderer.
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Rgba8::rgb(0x11, 0x11, 0x11),
                text: Rgba8::rgb(0xe6, 0xe6, 0xe6),
                highlight: Rgba8::rgb(0xff, 0xd5, 0x4f),
                highlight_bg: Rgba8 { r: 0xff, g: 0xd5, b: 0x4f, a: 0x33 },
            },
            Theme::Light => Palette {
                background: Rgba8::rgb(0xff, 0xff, 0xff),
                text: Rgba8::rgb(0x22, 0x22, 0x22),
                highlight: Rgba8::rgb(0xd8, 0x1b, 0x60),
                highlight_bg: Rgba8 { r: 0xd8, g: 0x1b, b: 0x60, a: 0x22 },
            },
            Theme::Sepia => Palette {
                background: Rgba8::rgb(0xf4, 0xec, 0xd8),
                text: Rgba8::rgb(0x5b, 0x46, 0x36),
                highlight: Rgba8::rgb(0xa0, 0x52, 0x2d),
                highlight_bg: Rgba8 { r: 0xa0, g: 0x52, b: 0x2d, a: 0x26 },
            },
            Theme::HighContrast => Palette {
                background: Rgba8::rgb(0x00, 0x00, 0x00),
                text: Rgba8::rgb(0xff, 0xff, 0xff),
                highlight: Rgba8::rgb(0xff, 0xff, 0x00),
                highlight_bg: Rgba8 { r: 0xff, g: 0xff, b: 0x00, a: 0x40 },
            },
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
