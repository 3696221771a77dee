use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use mingle_types::{LoginResponse, User};

use crate::api::ApiClient;
use crate::form::{AuthForm, Submission};
use crate::logging::LogConfig;
use crate::session::{AuthSession, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Auth,
    Home,
}

/// Result of one submission round-trip. Produced by the network layer and
/// applied to the application afterwards, so the form itself never touches
/// session or screen state.
#[derive(Debug)]
pub enum SubmitOutcome {
    LoggedIn(LoginResponse),
    Registered(User),
    Failed(String),
}

/// File extensions the picture picker offers, matching what the upload
/// endpoint accepts.
pub const ACCEPTED_PICTURE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub fn is_accepted_picture(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ACCEPTED_PICTURE_EXTENSIONS
            .iter()
            .any(|accepted| ext.eq_ignore_ascii_case(accepted)),
        None => false,
    }
}

/// One row in the picture picker listing.
#[derive(Debug, Clone)]
pub struct PickerEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Picture picker modal state
pub struct PickerState {
    pub open: bool,
    pub dir: PathBuf,
    pub entries: Vec<PickerEntry>,
    pub selected: usize,
    pub error: Option<String>,
}

impl PickerState {
    pub fn new() -> Self {
        Self {
            open: false,
            dir: PathBuf::new(),
            entries: Vec::new(),
            selected: 0,
            error: None,
        }
    }

    /// Populate the listing from `dir`: directories first, then accepted
    /// image files, both alphabetical. Hidden entries are skipped.
    pub fn read_dir(&mut self, dir: PathBuf) {
        self.error = None;
        self.selected = 0;
        self.entries.clear();

        let listing = match fs::read_dir(&dir) {
            Ok(listing) => listing,
            Err(e) => {
                self.error = Some(format!("Cannot read {}: {}", dir.display(), e));
                self.dir = dir;
                return;
            }
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for entry in listing.flatten() {
            let path = entry.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            if name.starts_with('.') {
                continue;
            }

            if path.is_dir() {
                dirs.push(PickerEntry {
                    name,
                    path,
                    is_dir: true,
                });
            } else if is_accepted_picture(&path) {
                files.push(PickerEntry {
                    name,
                    path,
                    is_dir: false,
                });
            }
        }

        dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        self.entries = dirs;
        self.entries.extend(files);
        self.dir = dir;
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + self.entries.len() - 1) % self.entries.len();
        }
    }

    pub fn selected_entry(&self) -> Option<&PickerEntry> {
        self.entries.get(self.selected)
    }
}

impl Default for PickerState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct App {
    pub running: bool,
    pub current_screen: Screen,
    pub api_client: ApiClient,
    pub form: AuthForm,
    pub picker: PickerState,
    pub session: Option<AuthSession>,
    /// A validated submission waiting for the event loop to send it. Set by
    /// the Enter handler so the submitting state renders before the request
    /// is awaited.
    pub pending_submission: Option<Submission>,
    pub notice: Option<(String, Instant)>, // (message, timestamp) - auto-clears
    /// Persistence for the session; absent in tests so applying outcomes
    /// never touches the filesystem.
    pub session_store: Option<SessionStore>,
    pub log_config: LogConfig,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            current_screen: Screen::Auth,
            api_client: ApiClient::default(),
            form: AuthForm::new(),
            picker: PickerState::new(),
            session: None,
            pending_submission: None,
            notice: None,
            session_store: None,
            log_config: LogConfig::default(),
        }
    }

    /// Create an app wired to a specific server
    pub fn with_server_url(server_url: String) -> Self {
        let mut app = Self::new();
        app.api_client = ApiClient::new(server_url);
        app
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
