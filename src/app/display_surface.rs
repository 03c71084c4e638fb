use crate::config::PresentationConfig;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub delay: Duration,
    pub duration: Duration,
}

impl Transition {
    pub fn hint(presentation: &PresentationConfig) -> Self {
        Self {
            delay: Duration::from_millis(presentation.hint_delay_ms),
            duration: Duration::from_millis(presentation.show_duration_ms),
        }
    }

    pub fn reveal(presentation: &PresentationConfig) -> Self {
        Self {
            delay: Duration::from_millis(presentation.show_delay_ms),
            duration: Duration::from_millis(presentation.show_duration_ms),
        }
    }

    pub fn hide(presentation: &PresentationConfig) -> Self {
        Self {
            delay: Duration::ZERO,
            duration: Duration::from_millis(presentation.hide_duration_ms),
        }
    }
}

/// Where classification text ends up. Animation is the implementor's business.
pub trait DisplaySurface: Send + Sync {
    fn show(&self, text: &str, transition: Transition);
    fn hide(&self, transition: Transition);
}

/// Default surface, writes every update to the log.
#[derive(Debug, Default)]
pub struct TracingSurface;

impl DisplaySurface for TracingSurface {
    fn show(&self, text: &str, transition: Transition) {
        info!(delay = ?transition.delay, "{}", text);
    }

    fn hide(&self, transition: Transition) {
        info!(duration = ?transition.duration, "Hiding results");
    }
}
