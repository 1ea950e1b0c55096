use ratatui::style::Color;

/// Colors of the watch view. `tracked` marks processes that feed the plot.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub brand_bg: Color,
    pub brand_fg: Color,
    pub border: Color,
    pub heading: Color,
    pub muted: Color,
    pub tracked: Color,
    pub selected_bg: Color,
    pub mem_fill: Color,
    pub mem_empty: Color,
    pub cpu_line: Color,
    pub bar_bg: Color,
    pub panel_bg: Color,
    pub key_bg: Color,
    pub key_fg: Color,
    pub key_desc: Color,
    pub log_path: Color,
    pub error: Color,
}

const CYAN: Color = Color::Rgb(103, 232, 249);
const STEEL: Color = Color::Rgb(70, 130, 180);
const PALE: Color = Color::Rgb(215, 215, 215);

pub const DARK: Theme = Theme {
    name: "dark",
    brand_bg: Color::Green,
    brand_fg: Color::Black,
    border: Color::DarkGray,
    heading: Color::White,
    muted: Color::Gray,
    tracked: CYAN,
    selected_bg: Color::Rgb(35, 40, 51),
    mem_fill: CYAN,
    mem_empty: Color::DarkGray,
    cpu_line: Color::Rgb(251, 146, 60),
    bar_bg: Color::DarkGray,
    panel_bg: Color::Rgb(30, 30, 36),
    key_bg: Color::Yellow,
    key_fg: Color::Black,
    key_desc: Color::White,
    log_path: Color::Green,
    error: Color::LightRed,
};

pub const LIGHT: Theme = Theme {
    name: "light",
    brand_bg: Color::Blue,
    brand_fg: Color::White,
    border: Color::Rgb(150, 150, 150),
    heading: Color::Black,
    muted: Color::DarkGray,
    tracked: Color::Blue,
    selected_bg: Color::Rgb(200, 200, 200),
    mem_fill: STEEL,
    mem_empty: PALE,
    cpu_line: STEEL,
    bar_bg: PALE,
    panel_bg: Color::Rgb(235, 235, 235),
    key_bg: Color::Blue,
    key_fg: Color::White,
    key_desc: Color::Black,
    log_path: Color::Rgb(0, 120, 0),
    error: Color::Red,
};

impl Theme {
    /// Unknown names get the dark theme.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case(LIGHT.name) {
            LIGHT
        } else {
            DARK
        }
    }

    pub fn dark() -> Self {
        DARK
    }

    pub fn light() -> Self {
        LIGHT
    }
}
