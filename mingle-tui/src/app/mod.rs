mod handlers;
mod state;

pub use state::{
    is_accepted_picture, App, PickerEntry, PickerState, Screen, SubmitOutcome,
    ACCEPTED_PICTURE_EXTENSIONS,
};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::KeyEvent;

use crate::api::ApiError;
use crate::form::{Field, FormMode, Submission};
use crate::session::AuthSession;
use crate::{log_api_call, log_form_event};

impl App {
    /// Handle keyboard events with priority-based Escape handling
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        handlers::handle_key_event(self, key)
    }

    /// Queue a submission if the form validates. The request itself runs
    /// from the event loop once the submitting state has rendered.
    pub fn request_submit(&mut self) {
        if self.form.submitting {
            return;
        }

        self.form.error = None;
        match self.form.submission() {
            Some(submission) => {
                log_form_event!(
                    self.log_config,
                    "Submission queued in {:?} mode",
                    self.form.mode
                );
                self.form.submitting = true;
                self.pending_submission = Some(submission);
            }
            None => {
                log_form_event!(
                    self.log_config,
                    "Submission blocked: {} invalid field(s)",
                    self.form.errors().len()
                );
            }
        }
    }

    /// Send the queued submission, if any, and apply its outcome.
    pub async fn process_pending_submission(&mut self) -> Result<()> {
        let submission = match self.pending_submission.take() {
            Some(submission) => submission,
            None => return Ok(()),
        };

        let outcome = self.perform_submission(submission).await;
        self.apply_submit_outcome(outcome);
        Ok(())
    }

    async fn perform_submission(&self, submission: Submission) -> SubmitOutcome {
        match submission {
            Submission::Login(request) => {
                log_api_call!(self.log_config, "POST /auth/login for {}", request.email);
                match self.api_client.login(&request).await {
                    Ok(response) => SubmitOutcome::LoggedIn(response),
                    Err(e) => SubmitOutcome::Failed(categorize_error(&e)),
                }
            }
            Submission::Register(request) => {
                log_api_call!(self.log_config, "POST /auth/register for {}", request.email);
                match self.api_client.register(request).await {
                    Ok(user) => SubmitOutcome::Registered(user),
                    Err(e) => SubmitOutcome::Failed(categorize_error(&e)),
                }
            }
        }
    }

    /// Apply a finished submission round-trip: session plus home screen for
    /// a login, a reset form back in login mode for a registration, an
    /// error line for a failure. Mode and field values stay untouched on
    /// failure.
    pub fn apply_submit_outcome(&mut self, outcome: SubmitOutcome) {
        self.form.submitting = false;

        match outcome {
            SubmitOutcome::LoggedIn(response) => {
                log_form_event!(self.log_config, "Login succeeded for {}", response.user.email);
                let session = AuthSession {
                    token: response.token,
                    user: response.user,
                };
                if let Some(store) = &self.session_store {
                    if let Err(e) = store.save(&session) {
                        log::warn!("Failed to persist session: {}", e);
                    }
                }
                self.session = Some(session);
                self.form.reset_to(FormMode::Login);
                self.current_screen = Screen::Home;
            }
            SubmitOutcome::Registered(user) => {
                log_form_event!(
                    self.log_config,
                    "Registration succeeded for {}",
                    user.email
                );
                self.form.reset_to(FormMode::Login);
                self.notice = Some((
                    format!("Account created for {}. Log in to continue.", user.email),
                    Instant::now(),
                ));
            }
            SubmitOutcome::Failed(message) => {
                log_form_event!(self.log_config, "Submission failed: {}", message);
                self.form.error = Some(message);
            }
        }
    }

    /// Adopt a previously persisted session and skip straight to the home
    /// screen.
    pub fn restore_session(&mut self, session: AuthSession) {
        log_form_event!(
            self.log_config,
            "Restored session for {}",
            session.user.email
        );
        self.session = Some(session);
        self.current_screen = Screen::Home;
    }

    /// Drop the session, delete its persisted copy, and return to a fresh
    /// login form.
    pub fn logout(&mut self) {
        log_form_event!(self.log_config, "Logging out");
        if let Some(store) = &self.session_store {
            if let Err(e) = store.delete() {
                log::warn!("Failed to delete persisted session: {}", e);
            }
        }
        self.session = None;
        self.form.reset_to(FormMode::Login);
        self.notice = None;
        self.current_screen = Screen::Auth;
    }

    pub fn toggle_form_mode(&mut self) {
        if self.form.submitting {
            return;
        }
        self.form.toggle_mode();
        log_form_event!(self.log_config, "Form mode toggled to {:?}", self.form.mode);
    }

    // Picture picker actions

    /// Open the picker rooted at the current selection's directory, falling
    /// back to the home directory.
    pub fn open_picture_picker(&mut self) {
        let start_dir = self
            .form
            .values
            .picture
            .as_ref()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        self.picker.open = true;
        self.picker.read_dir(start_dir);
    }

    pub fn close_picture_picker(&mut self) {
        self.picker.open = false;
        self.picker.error = None;
    }

    /// Enter the selected picker row: descend into a directory, or take a
    /// file as the picture.
    pub fn confirm_picker_selection(&mut self) {
        let entry = match self.picker.selected_entry() {
            Some(entry) => entry.clone(),
            None => return,
        };

        if entry.is_dir {
            self.picker.read_dir(entry.path);
        } else {
            log_form_event!(self.log_config, "Picture selected: {}", entry.name);
            self.form.set_picture(entry.path);
            self.close_picture_picker();
        }
    }

    /// Move the picker listing to the parent directory.
    pub fn picker_ascend(&mut self) {
        if let Some(parent) = self.picker.dir.parent().map(Path::to_path_buf) {
            self.picker.read_dir(parent);
        }
    }

    /// Clear the notice line once it has been on screen long enough.
    pub fn clear_expired_notice(&mut self) {
        if let Some((_, timestamp)) = &self.notice {
            if Instant::now().duration_since(*timestamp) > Duration::from_secs(5) {
                self.notice = None;
            }
        }
    }
}

/// Convert API errors into messages worth showing on the form.
fn categorize_error(error: &ApiError) -> String {
    match error {
        ApiError::Network(e) if e.is_timeout() => {
            "Network error: the server took too long to respond. Try again.".to_string()
        }
        ApiError::Network(_) => {
            "Network error: could not reach the server. Check the server URL and your connection."
                .to_string()
        }
        // Auth rejections carry a message from the backend worth relaying,
        // e.g. "Invalid credentials. " or "User does not exist. "
        ApiError::Unauthorized(msg) | ApiError::BadRequest(msg) => msg.trim().to_string(),
        ApiError::NotFound(_) => {
            "The server did not recognize the request. Check the server URL.".to_string()
        }
        ApiError::File(e) => format!("Could not read the selected picture: {}", e),
        ApiError::Serialization(_) | ApiError::Api(_) => format!("Server error: {}", error),
    }
}
