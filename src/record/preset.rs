use crate::foundation::core::Canvas;

/// Output targets with known recording settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Preset {
    InstagramStory,
    InstagramReel,
    WhatsappStatus,
    Tiktok,
    FacebookStory,
    YoutubeShorts,
    Snapchat,
    InstagramPost,
    Linkedin,
    Twitter,
    /// User-supplied resolution and settings.
    #[default]
    Custom,
}

/// Settings bundled with a [`Preset`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresetSpec {
    /// Output resolution.
    pub resolution: Canvas,
    /// Frames per second.
    pub fps: u32,
    /// Video bitrate in bits per second.
    pub bitrate: u32,
    /// Recording scroll speed.
    pub speed: f64,
    /// Font-size multiplier applied while the preset is selected.
    pub text_scale: f64,
}

const PORTRAIT: PresetSpec = PresetSpec {
    resolution: Canvas {
        width: 1080,
        height: 1920,
    },
    fps: 30,
    bitrate: 8_000_000,
    speed: 1.0,
    text_scale: 0.9,
};

impl Preset {
    /// Every preset, in menu order.
    pub const ALL: [Preset; 11] = [
        Preset::InstagramStory,
        Preset::InstagramReel,
        Preset::WhatsappStatus,
        Preset::Tiktok,
        Preset::FacebookStory,
        Preset::YoutubeShorts,
        Preset::Snapchat,
        Preset::InstagramPost,
        Preset::Linkedin,
        Preset::Twitter,
        Preset::Custom,
    ];

    /// Identifier as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Preset::InstagramStory => "instagram_story",
            Preset::InstagramReel => "instagram_reel",
            Preset::WhatsappStatus => "whatsapp_status",
            Preset::Tiktok => "tiktok",
            Preset::FacebookStory => "facebook_story",
            Preset::YoutubeShorts => "youtube_shorts",
            Preset::Snapchat => "snapchat",
            Preset::InstagramPost => "instagram_post",
            Preset::Linkedin => "linkedin",
            Preset::Twitter => "twitter",
            Preset::Custom => "custom",
        }
    }

    /// Parse a name produced by [`Preset::name`]. Dashes are accepted in place of underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().replace('-', "_");
        Self::ALL.into_iter().find(|p| p.name() == wanted)
    }

    /// Form used in artifact filenames (`_` becomes `-`).
    pub fn slug(self) -> String {
        self.name().replace('_', "-")
    }

    /// Bundled settings; `None` for [`Preset::Custom`].
    pub fn spec(self) -> Option<PresetSpec> {
        match self {
            Preset::InstagramStory
            | Preset::InstagramReel
            | Preset::WhatsappStatus
            | Preset::Tiktok
            | Preset::FacebookStory
            | Preset::YoutubeShorts
            | Preset::Snapchat => Some(PORTRAIT),
            Preset::InstagramPost => Some(PresetSpec {
                resolution: Canvas {
                    width: 1920,
                    height: 1920,
                },
                text_scale: 1.0,
                ..PORTRAIT
            }),
            Preset::Linkedin => Some(PresetSpec {
                resolution: Canvas {
                    width: 1920,
                    height: 1080,
                },
                fps: 30,
                bitrate: 5_000_000,
                speed: 0.75,
                text_scale: 1.2,
            }),
            Preset::Twitter => Some(PresetSpec {
                resolution: Canvas {
                    width: 1280,
                    height: 720,
                },
                fps: 30,
                bitrate: 5_000_000,
                speed: 1.0,
                text_scale: 1.1,
            }),
            Preset::Custom => None,
        }
    }

    /// Font-size multiplier for this preset (1.0 for custom).
    pub fn text_scale(self) -> f64 {
        self.spec().map_or(1.0, |s| s.text_scale)
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
