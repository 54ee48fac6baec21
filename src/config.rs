//! Optional user settings loaded from `<config_home>/bft.toml`.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use cross_xdg::BaseDirs;
use nu_ansi_term::Color;

use crate::machine::DEFAULT_TAPE_CAPACITY;

/// Settings resolved once per process: file values over defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Number of addressable tape cells for CLI and REPL runs.
    pub tape_capacity: usize,
    pub colors: Colors,
}

/// Per-instruction colors for the REPL syntax highlighter.
#[derive(Debug, Clone)]
pub struct Colors {
    pub op_right: Color,   // '>'
    pub op_left: Color,    // '<'
    pub op_inc: Color,     // '+'
    pub op_dec: Color,     // '-'
    pub op_output: Color,  // '.'
    pub op_input: Color,   // ','
    pub op_bracket: Color, // '[' and ']'
    pub op_other: Color,   // anything non-Brainfuck
}

impl Default for Colors {
    fn default() -> Self {
        // Catppuccin Mocha accents
        Self {
            op_right: Color::Rgb(137, 220, 235),   // sky
            op_left: Color::Rgb(148, 226, 213),    // teal
            op_inc: Color::Rgb(166, 227, 161),     // green
            op_dec: Color::Rgb(243, 139, 168),     // red
            op_output: Color::Rgb(249, 226, 175),  // yellow
            op_input: Color::Rgb(250, 179, 135),   // peach
            op_bracket: Color::Rgb(203, 166, 247), // mauve
            op_other: Color::Rgb(108, 112, 134),   // surface2
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tape_capacity: DEFAULT_TAPE_CAPACITY,
            colors: Colors::default(),
        }
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| load_from_toml().unwrap_or_default())
}

fn load_from_toml() -> Option<Settings> {
    let base_dirs = BaseDirs::new().unwrap();

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let config_home = base_dirs.config_home();

    let mut path = PathBuf::from(config_home);
    path.push("bft.toml");

    let content = fs::read_to_string(path).ok()?;
    Some(parse_settings(&content))
}

/// Very small hand-rolled parser: `[interpreter]` and `[colors]` sections
/// with `key = value` pairs. Color values are strings like "#RRGGBB" or
/// named colors; unknown keys and unparsable values fall back to defaults.
fn parse_settings(content: &str) -> Settings {
    let mut section = String::new();
    let mut interpreter: HashMap<String, String> = HashMap::new();
    let mut colors: HashMap<String, String> = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len() - 1].to_string();
            continue;
        }
        let Some(eq) = line.find('=') else { continue };
        let key = line[..eq].trim().to_string();
        let val_raw = line[eq + 1..].trim();
        // Accept quoted or unquoted
        let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
            val_raw[1..val_raw.len() - 1].to_string()
        } else {
            val_raw.to_string()
        };
        match section.as_str() {
            "interpreter" => {
                interpreter.insert(key, val);
            }
            "colors" => {
                colors.insert(key, val);
            }
            _ => {}
        }
    }

    let mut cfg = Settings::default();

    if let Some(n) = interpreter
        .get("tape_capacity")
        .and_then(|s| s.parse::<usize>().ok())
    {
        cfg.tape_capacity = n;
    }

    macro_rules! set {
        ($field:ident, $key:literal) => {
            if let Some(c) = colors.get($key).and_then(|s| parse_color(s)) {
                cfg.colors.$field = c;
            }
        };
    }

    set!(op_right, "op_right");
    set!(op_left, "op_left");
    set!(op_inc, "op_inc");
    set!(op_dec, "op_dec");
    set!(op_output, "op_output");
    set!(op_input, "op_input");
    set!(op_bracket, "op_bracket");
    set!(op_other, "op_other");

    cfg
}

fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        return None;
    }

    // Named colors matching nu_ansi_term::Color variants
    let name = s.to_ascii_lowercase();
    Some(match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Purple,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "lightgray" | "light_gray" => Color::LightGray,
        "darkgray" | "dark_gray" | "darkgrey" | "dark_grey" => Color::DarkGray,
        "lightred" | "light_red" => Color::LightRed,
        "lightgreen" | "light_green" => Color::LightGreen,
        "lightblue" | "light_blue" => Color::LightBlue,
        "lightmagenta" | "light_magenta" | "lightpurple" | "light_purple" => Color::LightPurple,
        "lightcyan" | "light_cyan" => Color::LightCyan,
        _ => return None,
    })
}
