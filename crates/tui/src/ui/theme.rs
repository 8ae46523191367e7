use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub pending: Color,
    pub resolved: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            pending: Color::Rgb(210, 170, 80),
            resolved: Color::Rgb(110, 180, 110),
            error: Color::Rgb(200, 80, 80),
        }
    }
}
