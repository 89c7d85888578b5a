//! Application configuration and constants.

/// Window title when no recipe is open
pub const APP_TITLE: &str = "智能食谱助手";

/// Lookup endpoint host. Fixed at build time; set `COOK_API_BASE_URL` when
/// compiling to point at another host.
pub const API_BASE_URL: &str = match option_env!("COOK_API_BASE_URL") {
    Some(url) => url,
    None => DEFAULT_API_BASE_URL,
};

#[cfg(debug_assertions)]
const DEFAULT_API_BASE_URL: &str = "http://localhost:3004";

#[cfg(not(debug_assertions))]
const DEFAULT_API_BASE_URL: &str = "https://cook.aries-happy.com";

/// Public host used in share links
pub const SHARE_BASE_URL: &str = "https://cook.aries-happy.com";

/// Log file name, created in the system temp dir
pub const LOG_FILE_NAME: &str = "recipe-assistant.log";

pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,

    pub share_base_url: String,

    /// Main loop tick rate in milliseconds (target 60 FPS = ~16ms)
    pub tick_rate_ms: u64,

    /// How many ticks to show status messages (180 = ~3s at 60fps)
    pub status_timeout_ticks: u64,

    /// Ticks per spinner frame
    pub spinner_ticks: usize,

    /// Lines to scroll per key press
    pub scroll_step: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            share_base_url: SHARE_BASE_URL.to_string(),
            tick_rate_ms: 16,
            status_timeout_ticks: 180,
            spinner_ticks: 5,
            scroll_step: 3,
        }
    }
}

/// Key hints shown in the footer
pub const KEY_HINTS: &[(&str, &str)] = &[
    ("Enter", "搜索"),
    ("Tab", "切换焦点"),
    ("Ctrl+B", "返回"),
    ("Ctrl+S", "分享"),
    ("F2", "链接预览"),
    ("Esc", "退出"),
];
