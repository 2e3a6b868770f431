//! Game settings and preferences
//!
//! Key bindings, language, last difficulty, last font and the high score
//! table, persisted together as one JSON record (`~/.spaceshooterrc` by default).

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FONT;
use crate::error::ConfigError;
use crate::game::input::{Action, Key};
use crate::highscores::HighScores;

/// Settings file name under the home directory
pub const CONFIG_FILE_NAME: &str = ".spaceshooterrc";

/// Difficulty levels (the Options board)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    /// Drops never hurt
    Easy,
    #[default]
    Normal,
    /// Scenery collisions hurt
    Hard,
    /// No damage at all
    Unlimited,
}

impl Difficulty {
    /// Options board order
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Unlimited,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Unlimited => "Unlimited",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" | "hardcore" => Some(Difficulty::Hard),
            "unlimited" => Some(Difficulty::Unlimited),
            _ => None,
        }
    }

    /// Position on the Options board (0..=3)
    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
            Difficulty::Unlimited => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Step used by the cadence ramp; Unlimited paces like Easy
    pub fn cadence_step(&self) -> u32 {
        (self.index() % 3) as u32
    }
}

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pl,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pl => "pl",
        }
    }
}

fn default_keys() -> BTreeMap<Action, Key> {
    Action::SETUP_ORDER
        .iter()
        .map(|a| (*a, a.default_key()))
        .collect()
}

/// Persisted configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Action -> key bindings
    pub keys: BTreeMap<Action, Key>,
    pub lang: Language,
    pub hiscores: HighScores,
    /// Last selected difficulty
    pub lastmode: Difficulty,
    pub lastfont: String,

    #[serde(skip)]
    path: Option<PathBuf>,
    /// Font given on the command line wins over the stored one
    #[serde(skip)]
    font_forced: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keys: default_keys(),
            lang: Language::En,
            hiscores: HighScores::new(),
            lastmode: Difficulty::Normal,
            lastfont: DEFAULT_FONT.to_string(),
            path: None,
            font_forced: false,
        }
    }
}

impl Config {
    /// Defaults bound to `path`, with an optional forced font
    pub fn new(path: Option<PathBuf>, font: Option<String>) -> Self {
        let mut config = Self {
            path,
            ..Self::default()
        };
        if let Some(font) = font {
            config.lastfont = font;
            config.font_forced = true;
        }
        config
    }

    /// `~/.spaceshooterrc`, if a home directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Merge the stored record into this one. A missing file keeps defaults.
    pub fn read(&mut self) -> Result<(), ConfigError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        let stored: Config = serde_json::from_str(&json).map_err(ConfigError::Parse)?;

        self.lang = stored.lang;
        self.lastmode = stored.lastmode;
        self.hiscores = stored.hiscores;
        self.hiscores.normalize();
        if !self.font_forced {
            self.lastfont = stored.lastfont;
        }
        self.keys.extend(stored.keys);

        log::info!(
            "Loaded settings from {} ({} hiscores)",
            path.display(),
            self.hiscores.len()
        );
        Ok(())
    }

    /// Write the record atomically (temp file, then rename)
    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        write_atomic(path, json.as_bytes()).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn get_key(&self, action: Action) -> Option<Key> {
        self.keys.get(&action).copied()
    }

    /// Bind `key` to `action`; `Key::None` clears the binding
    pub fn set_key(&mut self, action: Action, key: Key) {
        if key == Key::None {
            self.keys.remove(&action);
        } else {
            self.keys.insert(action, key);
        }
    }

    /// Key -> action lookup used while playing
    pub fn actions(&self) -> HashMap<Key, Action> {
        self.keys.iter().map(|(a, k)| (*k, *a)).collect()
    }

    pub fn is_hiscore(&self, score: u32) -> bool {
        self.hiscores.qualifies(score)
    }

    pub fn add_hiscore(&mut self, name: &str, score: u32) {
        self.hiscores.add_score(name, score);
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(CONFIG_FILE_NAME);
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));
    fs::write(&tmp_path, bytes)?;
    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}
