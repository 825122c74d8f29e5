//! Scroll-driven page styling.

use crate::surface::Rgba;
use std::time::Duration;

/// Scroll offset past which the navigation bar turns more opaque.
pub const NAV_THRESHOLD: f32 = 50.0;

/// Elements that animate in when scrolled into view.
pub const REVEAL_SELECTOR: &str = ".fade-in-up, .slide-in-left, .skill-progress";

/// Class marking a skill bar inside [`REVEAL_SELECTOR`].
pub const SKILL_BAR_CLASS: &str = "skill-progress";

/// Delay between a skill bar entering view and it filling.
pub const SKILL_BAR_DELAY: Duration = Duration::from_millis(500);

/// Intersection observer settings for revealing elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    pub threshold: f64,
    pub root_margin: &'static str,
}

pub const REVEAL_OPTIONS: RevealOptions = RevealOptions {
    threshold: 0.1,
    root_margin: "0px 0px -50px 0px",
};

/// How far down the page the reader is, in percent.
///
/// Clamped to `[0, 100]`. A page that cannot scroll reports 0.
pub fn progress(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

/// Inline style of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavStyle {
    pub background: Rgba,
    pub backdrop_filter: &'static str,
}

impl NavStyle {
    pub fn for_scroll(scroll_y: f64) -> Self {
        let alpha = if scroll_y > NAV_THRESHOLD as f64 { 0.95 } else { 0.9 };
        Self {
            background: Rgba::BLACK.with_alpha(alpha),
            backdrop_filter: "blur(10px)",
        }
    }
}

/// What to do with an element reported by the reveal observer.
#[derive(Debug, Clone, PartialEq)]
pub enum RevealAction {
    /// Resume its paused CSS animation.
    Play,
    /// Set its width to `width` after `after`.
    FillBar { width: String, after: Duration },
}

/// Actions for one observer entry.
///
/// Nothing happens while the element is out of view. A skill bar without a
/// `data-width` only plays its animation.
pub fn reveal(intersecting: bool, is_skill_bar: bool, data_width: Option<&str>) -> Vec<RevealAction> {
    if !intersecting {
        return Vec::new();
    }
    let mut actions = vec![RevealAction::Play];
    if let (true, Some(width)) = (is_skill_bar, data_width) {
        actions.push(RevealAction::FillBar {
            width: width.to_owned(),
            after: SKILL_BAR_DELAY,
        });
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        assert_eq!(progress(0.0, 2000.0, 1000.0), 0.0);
        assert_eq!(progress(500.0, 2000.0, 1000.0), 50.0);
        assert_eq!(progress(1000.0, 2000.0, 1000.0), 100.0);
    }

    #[test]
    fn test_progress_clamps() {
        // Overscroll on touch devices.
        assert_eq!(progress(-40.0, 2000.0, 1000.0), 0.0);
        assert_eq!(progress(1100.0, 2000.0, 1000.0), 100.0);
        assert_eq!(progress(0.0, 800.0, 1000.0), 0.0);
        assert_eq!(progress(10.0, 1000.0, 1000.0), 0.0);
    }

    #[test]
    fn test_nav_style() {
        assert_eq!(NavStyle::for_scroll(0.0).background.to_css(), "rgba(0, 0, 0, 0.9)");
        assert_eq!(NavStyle::for_scroll(50.0).background.a, 0.9);
        assert_eq!(NavStyle::for_scroll(51.0).background.to_css(), "rgba(0, 0, 0, 0.95)");
        assert_eq!(NavStyle::for_scroll(51.0).backdrop_filter, "blur(10px)");
    }

    #[test]
    fn test_reveal() {
        assert!(reveal(false, true, Some("90%")).is_empty());
        assert_eq!(reveal(true, false, None), vec![RevealAction::Play]);
        assert_eq!(reveal(true, true, None), vec![RevealAction::Play]);
        assert_eq!(
            reveal(true, true, Some("90%")),
            vec![
                RevealAction::Play,
                RevealAction::FillBar {
                    width: "90%".into(),
                    after: Duration::from_millis(500),
                },
            ]
        );
    }
}
