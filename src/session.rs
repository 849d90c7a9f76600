//! The user session: auth token, profile and theme, persisted to a local file.
//!
//! This is an explicit context object that callers own and pass down; nothing in this crate
//! keeps ambient global state.

use std::error::Error;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The UI color scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Light
    }
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// The signed-in user, as returned by the auth endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// A user session backed by a local file
#[derive(Debug, PartialEq)]
pub struct Session {
    backing_file: PathBuf,
    data: SessionData,
}

#[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
struct SessionData {
    token: Option<String>,
    user: Option<UserProfile>,
    #[serde(default)]
    theme: ThemeMode,
}

impl Session {
    /// Get the default path to the session file
    pub fn session_file() -> PathBuf {
        PathBuf::from(String::from("~/.config/corkboard/session.json"))
    }

    /// Load a session from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self {
            backing_file: PathBuf::from(path),
            data,
        })
    }

    /// Initialize a fresh, signed-out session
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: PathBuf::from(path),
            data: SessionData::default(),
        }
    }

    /// Store the current session to its backing file
    pub fn save_to_file(&self) {
        let path = &self.backing_file;
        let file = match std::fs::File::create(path) {
            Err(err) => {
                log::warn!("Unable to save file {:?}: {}", path, err);
                return;
            },
            Ok(f) => f,
        };

        if let Err(err) = serde_json::to_writer(file, &self.data) {
            log::warn!("Unable to serialize: {}", err);
            return;
        };
    }

    pub fn token(&self) -> Option<&str> {
        self.data.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.data.user.as_ref()
    }

    pub fn theme(&self) -> ThemeMode {
        self.data.theme
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.token.is_some()
    }

    /// Sign in: keep the token and profile for subsequent requests
    pub fn sign_in(&mut self, token: String, user: UserProfile) {
        self.data.token = Some(token);
        self.data.user = Some(user);
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.data.theme = theme;
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.data.theme = self.data.theme.toggled();
        self.data.theme
    }

    /// Sign out: drop the token and profile. The theme choice survives.
    pub fn clear(&mut self) {
        self.data.token = None;
        self.data.user = None;
    }
}
