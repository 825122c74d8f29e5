//! Mobile navigation menu toggle.
//!
//! The hamburger button has three bars. Opening the menu turns them into a
//! cross (top and bottom bars rotate, middle bar fades) and slides the menu
//! down; closing reverts both.

/// Inline style for one hamburger bar. `None` leaves the property alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarStyle {
    pub transform: Option<&'static str>,
    pub opacity: Option<&'static str>,
    pub transition: Option<&'static str>,
}

/// Inline styles for the button bars and the menu panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuStyle {
    pub bars: [BarStyle; 3],
    pub max_height: &'static str,
    pub opacity: &'static str,
}

/// Class toggled on both the menu and its button.
pub const ACTIVE_CLASS: &str = "active";

const OPEN: MenuStyle = MenuStyle {
    bars: [
        BarStyle {
            transform: Some("rotate(45deg) translate(5px, 5px)"),
            opacity: None,
            transition: Some("transform 0.3s ease"),
        },
        BarStyle {
            transform: None,
            opacity: Some("0"),
            transition: Some("opacity 0.3s ease"),
        },
        BarStyle {
            transform: Some("rotate(-45deg) translate(7px, -6px)"),
            opacity: None,
            transition: Some("transform 0.3s ease"),
        },
    ],
    max_height: "300px",
    opacity: "1",
};

const CLOSED: MenuStyle = MenuStyle {
    bars: [
        BarStyle {
            transform: Some("none"),
            opacity: None,
            transition: None,
        },
        BarStyle {
            transform: None,
            opacity: Some("1"),
            transition: None,
        },
        BarStyle {
            transform: Some("none"),
            opacity: None,
            transition: None,
        },
    ],
    max_height: "0",
    opacity: "0",
};

/// Open/closed state of the mobile menu. Starts closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub const fn new() -> Self {
        Self { open: false }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the state and return the styles for the new state.
    pub fn toggle(&mut self) -> MenuStyle {
        self.open = !self.open;
        self.style()
    }

    pub fn style(&self) -> MenuStyle {
        if self.open {
            OPEN
        } else {
            CLOSED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_makes_a_cross() {
        let mut menu = MobileMenu::new();
        let style = menu.toggle();

        assert!(menu.is_open());
        assert_eq!(style.bars[0].transform, Some("rotate(45deg) translate(5px, 5px)"));
        assert_eq!(style.bars[1].opacity, Some("0"));
        assert_eq!(style.bars[2].transform, Some("rotate(-45deg) translate(7px, -6px)"));
        assert_eq!(style.max_height, "300px");
        assert_eq!(style.opacity, "1");
    }

    #[test]
    fn test_close_reverts() {
        let mut menu = MobileMenu::new();
        menu.toggle();
        let style = menu.toggle();

        assert!(!menu.is_open());
        assert_eq!(style.bars[0].transform, Some("none"));
        assert_eq!(style.bars[1].opacity, Some("1"));
        assert_eq!(style.bars[2].transform, Some("none"));
        assert_eq!(style.max_height, "0");
        assert_eq!(style.opacity, "0");
    }
}
