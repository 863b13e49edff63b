use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Switch housing color
    pub border: Color,
    /// Lever color for a switch in the up position
    pub lever: Color,
    /// Goal indicator, lit
    pub goal_lit: Color,
    /// Goal indicator, unlit
    pub goal_unlit: Color,
    /// Command line background
    pub highlight_bg: Color,
    /// Strike color
    pub error: Color,
    /// Solved color
    pub success: Color,
    /// Info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 130, g: 140, b: 170 },
            lever: Color::Rgb { r: 80, g: 180, b: 255 },
            goal_lit: Color::Rgb { r: 90, g: 255, b: 130 },
            goal_unlit: Color::Rgb { r: 70, g: 75, b: 90 },
            highlight_bg: Color::Rgb { r: 35, g: 40, b: 55 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 60, g: 60, b: 80 },
            lever: Color::Rgb { r: 30, g: 100, b: 200 },
            goal_lit: Color::Rgb { r: 40, g: 160, b: 60 },
            goal_unlit: Color::Rgb { r: 180, g: 180, b: 195 },
            highlight_bg: Color::Rgb { r: 230, g: 232, b: 242 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            name: "high contrast",
            bg: Color::Black,
            fg: Color::White,
            border: Color::White,
            lever: Color::Cyan,
            goal_lit: Color::Green,
            goal_unlit: Color::DarkGrey,
            highlight_bg: Color::Rgb { r: 30, g: 30, b: 30 },
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
        }
    }

    /// The theme after this one in the `t` rotation
    pub fn next(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            "light" => Self::high_contrast(),
            _ => Self::dark(),
        }
    }
}
