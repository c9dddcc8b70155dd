//! Configuration loading and parsing.
//!
//! Parses `vellum.toml` from the working directory or the platform config
//! directory (an explicit path from the binary overrides discovery). Every
//! field has a default; a missing or unparseable file degrades to the
//! defaults rather than aborting, since a broken config should never keep
//! the editor from starting. Unknown fields are ignored so older binaries
//! tolerate newer files.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> usize {
        8
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ScrollConfig {
    #[serde(default = "ScrollConfig::default_horizontal_stride")]
    pub horizontal_stride: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            horizontal_stride: Self::default_horizontal_stride(),
        }
    }
}

impl ScrollConfig {
    const fn default_horizontal_stride() -> usize {
        40
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UndoConfig {
    #[serde(default = "UndoConfig::default_history_max")]
    pub history_max: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            history_max: Self::default_history_max(),
        }
    }
}

impl UndoConfig {
    const fn default_history_max() -> usize {
        200
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub undo: UndoConfig,
}

/// Best-effort config path: a `vellum.toml` in the working directory wins,
/// then the platform config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("vellum.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vellum").join("vellum.toml");
    }
    PathBuf::from("vellum.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(cfg) => {
                info!(target: "config", path = %path.display(), "config loaded");
                Ok(cfg)
            }
            Err(err) => {
                warn!(
                    target: "config",
                    path = %path.display(),
                    %err,
                    "config parse failed, using defaults"
                );
                Ok(Config::default())
            }
        },
        Err(_) => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults_without_a_file() {
        let cfg = load_from(Some(PathBuf::from("/nonexistent/vellum.toml"))).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.editor.tab_width, 8);
        assert_eq!(cfg.scroll.horizontal_stride, 40);
        assert_eq!(cfg.undo.history_max, 200);
    }

    #[test]
    fn partial_file_fills_missing_sections() {
        let f = write_config("[editor]\ntab_width = 4\n");
        let cfg = load_from(Some(f.path().to_path_buf())).unwrap();
        assert_eq!(cfg.editor.tab_width, 4);
        assert_eq!(cfg.scroll.horizontal_stride, 40);
    }

    #[test]
    fn full_file_parses() {
        let f = write_config(
            "[editor]\ntab_width = 2\n[scroll]\nhorizontal_stride = 20\n[undo]\nhistory_max = 50\n",
        );
        let cfg = load_from(Some(f.path().to_path_buf())).unwrap();
        assert_eq!(cfg.editor.tab_width, 2);
        assert_eq!(cfg.scroll.horizontal_stride, 20);
        assert_eq!(cfg.undo.history_max, 50);
    }

    #[test]
    fn parse_error_degrades_to_defaults() {
        let f = write_config("[editor\ntab_width = oops");
        let cfg = load_from(Some(f.path().to_path_buf())).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let f = write_config("[editor]\ntab_width = 4\nfuture_knob = true\n");
        let cfg = load_from(Some(f.path().to_path_buf())).unwrap();
        assert_eq!(cfg.editor.tab_width, 4);
    }
}
