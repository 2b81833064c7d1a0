use std::{
    env,
    fs::{self, create_dir_all},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

const APP_DIR: &str = "bettercmd";
const HISTORY_FILE: &str = "cmdhistory.txt";
const ALIAS_FILE: &str = "aliases.json";

const DEFAULT_CONFIG: &str = "\
# bettercmd configuration
# history_file = ~/.local/share/bettercmd/cmdhistory.txt
# alias_file = ~/.local/share/bettercmd/aliases.json
#
# lines after the startup marker run before the first prompt
#startup
";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub history_file: PathBuf,
    pub alias_file: PathBuf,
    pub startup: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        // Without a data dir fall back to files in the working directory
        let data = dirs::data_dir().map(|d| d.join(APP_DIR)).unwrap_or_default();
        Self {
            history_file: data.join(HISTORY_FILE),
            alias_file: data.join(ALIAS_FILE),
            startup: vec![],
        }
    }
}

//config file
pub fn config_file_path() -> Option<PathBuf> {
    env::var_os("BETTERCMD_CONFIG")
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join(APP_DIR).join("config")))
}

pub fn init() -> Config {
    let Some(config_path) = config_file_path() else {
        return Config::default();
    };

    if !config_path.exists() {
        write_default(&config_path);
    }
    load_config(&config_path)
}

/// Writes the commented template, creating parent directories first.
fn write_default(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = create_dir_all(parent) {
            warn!("could not create config directory {}: {e}", parent.display());
            return;
        }
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("could not write default config {}: {e}", path.display());
    }
}

pub fn load_config(path: &Path) -> Config {
    match fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "loaded config");
            parse_config(&content)
        }
        Err(e) => {
            warn!("could not read config {}: {e}", path.display());
            Config::default()
        }
    }
}

fn parse_config(content: &str) -> Config {
    let mut config = Config::default();
    let mut in_startup = false;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(comment) = line.strip_prefix('#') {
            if comment.trim().eq_ignore_ascii_case("startup") {
                in_startup = true;
            }
            continue;
        }

        if in_startup {
            config.startup.push(line.to_string());
        } else if let Some((key, value)) = line.split_once('=') {
            let value = expand_path(value.trim().trim_matches('"'));
            match key.trim() {
                "history_file" => config.history_file = value,
                "alias_file" => config.alias_file = value,
                other => warn!("unknown config key '{other}'"),
            }
        }
    }
    config
}

fn expand_path(value: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(value).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_parses_to_defaults() {
        assert_eq!(parse_config(DEFAULT_CONFIG), Config::default());
    }

    #[test]
    fn keys_override_paths() {
        let cfg = parse_config("history_file = /tmp/h.txt\nalias_file = \"/tmp/a.json\"\n");
        assert_eq!(cfg.history_file, PathBuf::from("/tmp/h.txt"));
        assert_eq!(cfg.alias_file, PathBuf::from("/tmp/a.json"));
        assert!(cfg.startup.is_empty());
    }

    #[test]
    fn tilde_is_expanded() {
        let Some(home) = dirs::home_dir() else { return };
        let cfg = parse_config("alias_file = ~/x.json");
        assert_eq!(cfg.alias_file, PathBuf::from(format!("{}/x.json", home.display())));
    }

    #[test]
    fn startup_section_collects_lines() {
        let cfg = parse_config("#startup\nalias ll=ls -la\n# a comment\necho ready\nhistory_file = not-a-key\n");
        assert_eq!(
            cfg.startup,
            vec!["alias ll=ls -la", "echo ready", "history_file = not-a-key"]
        );
        assert_eq!(cfg.history_file, Config::default().history_file);
    }

    #[test]
    fn load_reads_file_or_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "#startup\necho hi\n").unwrap();
        assert_eq!(load_config(&path).startup, vec!["echo hi"]);
        assert_eq!(load_config(&dir.path().join("missing")), Config::default());
    }

    #[test]
    fn default_config_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("config");
        write_default(&path);
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn unwritable_config_directory_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join("sub").join("config");
        write_default(&path);
        assert!(!path.exists());
        assert_eq!(load_config(&path), Config::default());
    }
}
