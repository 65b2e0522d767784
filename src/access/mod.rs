//! Beta access gate.
//!
//! Guards the dashboard behind an access code configured in `[access] code`
//! (or `HELIOX_ACCESS_CODE`). Once a visitor enters the right code, an
//! authorization flag is persisted through an [`AccessStore`] and later
//! runs skip the prompt.
//!
//! This is a convenience screen, not a security boundary: the code lives in
//! local configuration and anyone with the config can read it.
//!
//! # States
//!
//! ```text
//! Checking ──(store read)──► Authorized
//!     │
//!     └──────────────────► Unauthorized ──(correct code)──► Authorized
//! ```
//!
//! With no configured code the gate resolves straight to `Authorized` and
//! never asks for input.
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::schema::AccessConfig;

/// Message shown after a wrong code.
pub const INVALID_CODE_MESSAGE: &str = "Invalid access code. Please try again.";

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Where the authorization flag lives.
pub trait AccessStore: Send + Sync {
    fn get(&self) -> bool;
    fn set(&self) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-memory store, used by tests and the web server.
#[derive(Debug, Default)]
pub struct MemoryAccessStore {
    granted: Mutex<bool>,
}

impl MemoryAccessStore {
    pub fn granted() -> Self {
        Self {
            granted: Mutex::new(true),
        }
    }
}

impl AccessStore for MemoryAccessStore {
    fn get(&self) -> bool {
        self.granted.lock().map(|g| *g).unwrap_or(false)
    }

    fn set(&self) -> Result<()> {
        if let Ok(mut g) = self.granted.lock() {
            *g = true;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut g) = self.granted.lock() {
            *g = false;
        }
        Ok(())
    }
}

/// File-backed store at `~/.heliox/access.json`.
///
/// An unreadable or malformed file counts as "not authorized".
#[derive(Debug, Clone)]
pub struct FileAccessStore {
    path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct AccessFile {
    authorized: bool,
    granted_at: String,
}

impl FileAccessStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under the user's heliox state directory.
    pub fn default_location() -> Option<Self> {
        crate::config::state_dir().map(|dir| Self::new(dir.join("access.json")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl AccessStore for FileAccessStore {
    fn get(&self) -> bool {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| serde_json::from_str::<AccessFile>(&s).ok())
            .is_some_and(|f| f.authorized)
    }

    fn set(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("failed to create access state directory")?;
        }
        let file = AccessFile {
            authorized: true,
            granted_at: chrono::Utc::now().to_rfc3339(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, json).context("failed to persist access flag")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("failed to remove access flag"),
        }
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Authorized,
    Unauthorized,
}

/// Access gate state machine over an injected store.
pub struct AccessGate<'a> {
    code: Option<String>,
    store: &'a dyn AccessStore,
    state: GateState,
    input: String,
    error: Option<&'static str>,
}

impl<'a> AccessGate<'a> {
    /// Create a gate in the `Checking` state.
    pub fn new(config: &AccessConfig, store: &'a dyn AccessStore) -> Self {
        let code = config
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Self {
            code,
            store,
            state: GateState::Checking,
            input: String::new(),
            error: None,
        }
    }

    /// Create a gate and resolve it immediately.
    pub fn resolved(config: &AccessConfig, store: &'a dyn AccessStore) -> Self {
        let mut gate = Self::new(config, store);
        gate.check();
        gate
    }

    /// Resolve `Checking` from configuration and the store.
    pub fn check(&mut self) -> GateState {
        self.state = if self.code.is_none() || self.store.get() {
            GateState::Authorized
        } else {
            GateState::Unauthorized
        };
        self.state
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_authorized(&self) -> bool {
        self.state == GateState::Authorized
    }

    /// Whether the code-entry form is shown.
    pub fn shows_form(&self) -> bool {
        self.state == GateState::Unauthorized
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: &str) {
        self.input = value.to_string();
    }

    /// Inline error from the last failed attempt.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    /// Submit the current input.
    ///
    /// On match the gate authorizes and persists the flag. Otherwise it
    /// stays unauthorized, records [`INVALID_CODE_MESSAGE`], and clears the
    /// input.
    pub fn submit(&mut self) -> Result<GateState> {
        let Some(expected) = self.code.as_deref() else {
            self.state = GateState::Authorized;
            return Ok(self.state);
        };

        if self.input.trim() == expected {
            self.store.set()?;
            self.state = GateState::Authorized;
            self.error = None;
        } else {
            self.state = GateState::Unauthorized;
            self.error = Some(INVALID_CODE_MESSAGE);
        }
        self.input.clear();
        Ok(self.state)
    }

    /// Convenience: set the input and submit it.
    pub fn submit_code(&mut self, code: &str) -> Result<GateState> {
        self.set_input(code);
        self.submit()
    }

    /// Forget the persisted authorization.
    pub fn lock(&mut self) -> Result<()> {
        self.store.clear()?;
        self.check();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
