use std::time::Duration;

use tracing::warn;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Timings and endpoints of the page behaviors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionSettings {
    /// How long a flash message stays fully visible.
    pub flash_visible_for: Duration,
    /// Delay between the fade starting and the message being removed.
    pub flash_fade_for: Duration,
    /// Delay before a reset skill bar is restored to its target width.
    pub skill_fill_delay: Duration,
    /// Vertical offset applied to a hovered project card, in pixels.
    pub card_hover_offset_px: i32,
    /// Origin the like endpoint is resolved against.
    pub server_url: String,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            flash_visible_for: Duration::from_millis(3000),
            flash_fade_for: Duration::from_millis(300),
            skill_fill_delay: Duration::from_millis(100),
            card_hover_offset_px: -5,
            server_url: DEFAULT_SERVER_URL.into(),
        }
    }
}

pub fn load_settings() -> InteractionSettings {
    let mut settings = InteractionSettings::default();

    if let Ok(v) = std::env::var("PORTFOLIO_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Ok(v) = std::env::var("PORTFOLIO_FLASH_MS") {
        match v.parse::<u64>() {
            Ok(ms) => settings.flash_visible_for = Duration::from_millis(ms),
            Err(error) => warn!(value = %v, %error, "ignoring invalid PORTFOLIO_FLASH_MS"),
        }
    }

    settings
}
