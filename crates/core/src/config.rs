use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Everything tunable about the page. Every field has a default, so a host
/// only needs to supply the values it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub ids: PageIds,
    pub theme: ThemeConfig,
    pub nav: NavConfig,
    /// `.reveal` sections.
    pub reveal: RevealGroupConfig,
    /// `.experience-card` timeline entries.
    pub experience: RevealGroupConfig,
    pub tilt: TiltConfig,
    pub parallax: ParallaxConfig,
    pub typewriter: TypewriterConfig,
    pub contact: ContactConfig,
    pub copy: CopyConfig,
}

impl SiteConfig {
    /// Parse and validate a JSON config block.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, group) in [("reveal", &self.reveal), ("experience", &self.experience)] {
            if !(0.0..=1.0).contains(&group.threshold) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("threshold {} is outside 0..=1", group.threshold),
                });
            }
            if !(group.fold_factor > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("fold_factor {} must be positive", group.fold_factor),
                });
            }
            if group.classes.is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "at least one reveal class is required".into(),
                });
            }
        }
        if !(self.nav.breakpoint_px > 0.0) {
            return Err(ConfigError::Invalid {
                field: "nav",
                reason: format!("breakpoint_px {} must be positive", self.nav.breakpoint_px),
            });
        }
        if self.contact.recipient.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "contact",
                reason: "recipient must not be empty".into(),
            });
        }
        Ok(())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            ids: PageIds::default(),
            theme: ThemeConfig::default(),
            nav: NavConfig::default(),
            reveal: RevealGroupConfig {
                threshold: 0.25,
                fold_factor: 1.05,
                classes: vec!["active".into(), "is-visible".into()],
                dot_class: None,
                root_marker: Some("js".into()),
                track_resize: true,
            },
            experience: RevealGroupConfig {
                threshold: 0.35,
                fold_factor: 1.05,
                classes: vec!["visible".into(), "is-visible".into()],
                dot_class: Some("active".into()),
                root_marker: None,
                track_resize: false,
            },
            tilt: TiltConfig::default(),
            parallax: ParallaxConfig::default(),
            typewriter: TypewriterConfig::default(),
            contact: ContactConfig::default(),
            copy: CopyConfig::default(),
        }
    }
}

/// Ids of the singleton elements the page script works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageIds {
    pub theme_toggle: String,
    pub menu_toggle: String,
    pub mobile_nav: String,
    pub year: String,
    pub typing_text: String,
    pub typing_cursor: String,
    pub contact_form: String,
}

impl Default for PageIds {
    fn default() -> Self {
        Self {
            theme_toggle: "themeToggle".into(),
            menu_toggle: "menuToggle".into(),
            mobile_nav: "mobileNav".into(),
            year: "year".into(),
            typing_text: "typing-text".into(),
            typing_cursor: "typing-cursor".into(),
            contact_form: "contactForm".into(),
        }
    }
}

/// What to show when no valid preference has been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultTheme {
    /// Always dark, whatever the system says. The shipped site behaves this way.
    Dark,
    Light,
    /// Follow `prefers-color-scheme`.
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub attribute: String,
    pub default: DefaultTheme,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".into(),
            attribute: "data-theme".into(),
            default: DefaultTheme::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Width at which the desktop nav takes over and the mobile panel closes.
    pub breakpoint_px: f64,
    pub close_key: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 820.0,
            close_key: "Escape".into(),
        }
    }
}

impl NavConfig {
    pub fn media_query(&self) -> String {
        format!("(min-width: {}px)", self.breakpoint_px)
    }
}

/// One group of elements revealed on scroll. Overrides must be complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealGroupConfig {
    /// Fraction of the element that must be visible to reveal it.
    pub threshold: f64,
    /// Elements whose top lies within `fold_factor * viewport height` are
    /// revealed at boot.
    pub fold_factor: f64,
    pub classes: Vec<String>,
    /// Class added to the element's timeline dot, if it has one.
    pub dot_class: Option<String>,
    /// Root class marking that scripted reveal is running.
    pub root_marker: Option<String>,
    /// Re-run the fold check on window resize.
    pub track_resize: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    pub max_deg: f64,
    pub perspective_px: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_deg: 8.0,
            perspective_px: 1200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub strength_px: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self { strength_px: 14.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub lines: Vec<String>,
    /// Viewports narrower than this type faster.
    pub narrow_width_px: f64,
    pub narrow_interval_ms: u32,
    pub interval_ms: u32,
    /// Pause after a line is complete.
    pub settle_ms: u32,
    /// Pause between clearing a line and typing the next one.
    pub clear_ms: u32,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            lines: vec![
                "Hello, welcome to my corner of the web.".into(),
                "How can I help you?".into(),
                "Software engineer · security-first thinker\nI build secure software and real-world tools."
                    .into(),
            ],
            narrow_width_px: 640.0,
            narrow_interval_ms: 28,
            interval_ms: 40,
            settle_ms: 600,
            clear_ms: 400,
        }
    }
}

impl TypewriterConfig {
    pub fn interval_for(&self, viewport_width: f64) -> u32 {
        if viewport_width < self.narrow_width_px {
            self.narrow_interval_ms
        } else {
            self.interval_ms
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub recipient: String,
    pub subject_prefix: String,
    /// Stand-in for an empty name in the subject line.
    pub anonymous_name: String,
    pub max_name: usize,
    pub max_email: usize,
    pub max_message: usize,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: "hello@example.com".into(),
            subject_prefix: "Portfolio inquiry from ".into(),
            anonymous_name: "Someone".into(),
            max_name: 80,
            max_email: 120,
            max_message: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub success_label: String,
    pub failure_label: String,
    /// Label restored when the button had no text of its own.
    pub fallback_label: String,
    pub restore_ms: u32,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            success_label: "Copied".into(),
            failure_label: "Press Ctrl+C".into(),
            fallback_label: "Copy".into(),
            restore_ms: 1400,
        }
    }
}
