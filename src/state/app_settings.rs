use log::LevelFilter;
use std::path::PathBuf;

pub const APP_DIR: &str = "nflbracket";
const STATE_FILE: &str = "bracket.json";
const EXPORT_DIR: &str = "exports";

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Autosave location for the current bracket.
    pub state_path: PathBuf,
    /// Directory for timestamped exports.
    pub export_dir: PathBuf,
    /// File imported by the import key. Falls back to the newest export.
    pub import_path: Option<PathBuf>,
}

impl AppSettings {
    /// Settings come from the environment:
    /// `NFLBRACKET_LOG`, `NFLBRACKET_STATE`, `NFLBRACKET_IMPORT`.
    pub fn load() -> Self {
        let config_dir = config_dir();
        Self {
            full_screen: false,
            log_level: env_value("NFLBRACKET_LOG").and_then(|v| parse_level(&v)),
            state_path: env_value("NFLBRACKET_STATE")
                .map(PathBuf::from)
                .unwrap_or_else(|| config_dir.join(STATE_FILE)),
            export_dir: config_dir.join(EXPORT_DIR),
            import_path: env_value("NFLBRACKET_IMPORT").map(PathBuf::from),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_level(raw: &str) -> Option<LevelFilter> {
    raw.parse::<LevelFilter>().ok()
}

fn config_dir() -> PathBuf {
    if let Some(config_dir) = env_value("XDG_CONFIG_HOME") {
        return PathBuf::from(config_dir).join(APP_DIR);
    }
    if let Some(home) = env_value("HOME") {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }
    PathBuf::from(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_any_case() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("WARN"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn exports_live_next_to_the_state_file_by_default() {
        let settings = AppSettings::load();
        assert!(settings.export_dir.ends_with("exports"));
        assert!(settings.export_dir.parent().is_some());
    }
}
