mod schema;

pub use schema::{
    fields_for, is_valid_email, validate, Field, FormValues, Rule, MSG_INVALID_EMAIL, MSG_REQUIRED,
};

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use mingle_types::LoginRequest;

use crate::api::RegisterRequest;

/// Which of the two form variants is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormMode {
    Login,
    Register,
}

impl FormMode {
    pub fn toggled(self) -> Self {
        match self {
            FormMode::Login => FormMode::Register,
            FormMode::Register => FormMode::Login,
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            FormMode::Login => "LOGIN",
            FormMode::Register => "REGISTER",
        }
    }

    /// The line inviting the user to switch to the other mode.
    pub fn toggle_hint(self) -> &'static str {
        match self {
            FormMode::Login => "Don't have an account? Sign up here.",
            FormMode::Register => "Already have an account? Login here.",
        }
    }
}

/// A validated, ready-to-send request built from the form.
#[derive(Debug, Clone)]
pub enum Submission {
    Login(LoginRequest),
    Register(RegisterRequest),
}

/// The login/registration form: active mode, field values, focus, touched
/// flags, and submission status.
///
/// Validation is recomputed from the current values on demand, and a
/// field's error renders only once the field has been touched (blurred, or
/// included in a submission attempt). The form never talks to the network
/// itself; a valid submit attempt yields a [`Submission`] for the caller
/// to dispatch.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: FormMode,
    pub values: FormValues,
    touched: BTreeSet<Field>,
    focus: usize,
    pub submitting: bool,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn new() -> Self {
        Self {
            mode: FormMode::Login,
            values: FormValues::default(),
            touched: BTreeSet::new(),
            focus: 0,
            submitting: false,
            error: None,
        }
    }

    /// Fields active for the current mode, in display order.
    pub fn fields(&self) -> &'static [Field] {
        schema::fields_for(self.mode)
    }

    pub fn focused_field(&self) -> Field {
        self.fields()[self.focus]
    }

    /// Move focus to the next field. Leaving a field counts as a blur and
    /// marks it touched.
    pub fn focus_next(&mut self) {
        self.touched.insert(self.focused_field());
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn focus_prev(&mut self) {
        self.touched.insert(self.focused_field());
        let len = self.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    /// Type a character into the focused field. The picture field is set
    /// through file selection, not typing.
    pub fn insert_char(&mut self, c: char) {
        let field = self.focused_field();
        if let Some(text) = self.values.text_mut(field) {
            text.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        let field = self.focused_field();
        if let Some(text) = self.values.text_mut(field) {
            text.pop();
        }
    }

    /// Record the picked file for the picture field.
    pub fn set_picture(&mut self, path: PathBuf) {
        self.values.picture = Some(path);
        self.touched.insert(Field::Picture);
    }

    /// Switch between login and register, discarding in-progress edits.
    pub fn toggle_mode(&mut self) {
        self.reset_to(self.mode.toggled());
    }

    /// Reset to the given mode with pristine values, touched flags, and
    /// errors.
    pub fn reset_to(&mut self, mode: FormMode) {
        self.mode = mode;
        self.values = FormValues::default();
        self.touched.clear();
        self.focus = 0;
        self.submitting = false;
        self.error = None;
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Current validation errors for the active schema.
    pub fn errors(&self) -> BTreeMap<Field, &'static str> {
        schema::validate(&self.values, self.mode)
    }

    /// The error to display under a field, gated on touched state.
    pub fn visible_error(&self, field: Field) -> Option<&'static str> {
        if self.is_touched(field) {
            self.errors().get(&field).copied()
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Attempt to build a submission. Marks every active field touched so
    /// outstanding errors become visible, and returns `None` while any
    /// rule fails.
    pub fn submission(&mut self) -> Option<Submission> {
        for field in self.fields() {
            self.touched.insert(*field);
        }
        if !self.is_valid() {
            return None;
        }

        match self.mode {
            FormMode::Login => Some(Submission::Login(LoginRequest {
                email: self.values.email.clone(),
                password: self.values.password.clone(),
            })),
            FormMode::Register => {
                let picture = self.values.picture.clone()?;
                let picture_path = picture
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();

                Some(Submission::Register(RegisterRequest {
                    first_name: self.values.first_name.clone(),
                    last_name: self.values.last_name.clone(),
                    email: self.values.email.clone(),
                    password: self.values.password.clone(),
                    location: self.values.location.clone(),
                    occupation: self.values.occupation.clone(),
                    picture,
                    picture_path,
                }))
            }
        }
    }
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(form: &mut AuthForm, text: &str) {
        for c in text.chars() {
            form.insert_char(c);
        }
    }

    fn fill_login(form: &mut AuthForm) {
        type_text(form, "jane@example.com");
        form.focus_next();
        type_text(form, "hunter2");
    }

    fn fill_register(form: &mut AuthForm) {
        type_text(form, "Jane");
        form.focus_next();
        type_text(form, "Doe");
        form.focus_next();
        type_text(form, "San Francisco, CA");
        form.focus_next();
        type_text(form, "Engineer");
        form.focus_next();
        form.set_picture(PathBuf::from("/tmp/photos/avatar.png"));
        form.focus_next();
        type_text(form, "jane@example.com");
        form.focus_next();
        type_text(form, "hunter2");
    }

    #[test]
    fn starts_in_login_mode_with_pristine_fields() {
        let form = AuthForm::new();

        assert_eq!(form.mode, FormMode::Login);
        assert_eq!(form.fields(), &[Field::Email, Field::Password]);
        assert_eq!(form.focused_field(), Field::Email);
        assert!(!form.is_touched(Field::Email));
        assert!(form.visible_error(Field::Email).is_none());
    }

    #[test]
    fn errors_appear_only_after_a_field_is_touched() {
        let mut form = AuthForm::new();

        // Email is empty and therefore invalid, but untouched fields stay
        // quiet.
        assert_eq!(form.errors().get(&Field::Email), Some(&MSG_REQUIRED));
        assert!(form.visible_error(Field::Email).is_none());

        // Moving focus away blurs the email field.
        form.focus_next();
        assert_eq!(form.visible_error(Field::Email), Some(MSG_REQUIRED));
        assert!(form.visible_error(Field::Password).is_none());
    }

    #[test]
    fn typing_recomputes_validation() {
        let mut form = AuthForm::new();
        form.focus_next();
        form.focus_prev();
        assert_eq!(form.visible_error(Field::Email), Some(MSG_REQUIRED));

        type_text(&mut form, "jane-at-example.com");
        assert_eq!(form.visible_error(Field::Email), Some(MSG_INVALID_EMAIL));

        for _ in 0.."jane-at-example.com".len() {
            form.delete_char();
        }
        type_text(&mut form, "jane@example.com");
        assert!(form.visible_error(Field::Email).is_none());
    }

    #[test]
    fn typing_into_the_picture_field_is_ignored() {
        let mut form = AuthForm::new();
        form.toggle_mode();
        while form.focused_field() != Field::Picture {
            form.focus_next();
        }

        form.insert_char('x');
        form.delete_char();
        assert_eq!(form.values.picture, None);
    }

    #[test]
    fn focus_wraps_around_the_active_field_list() {
        let mut form = AuthForm::new();

        form.focus_next();
        assert_eq!(form.focused_field(), Field::Password);
        form.focus_next();
        assert_eq!(form.focused_field(), Field::Email);
        form.focus_prev();
        assert_eq!(form.focused_field(), Field::Password);
    }

    #[test]
    fn toggling_mode_resets_values_touched_and_errors() {
        let mut form = AuthForm::new();
        fill_login(&mut form);
        form.error = Some("Invalid credentials.".to_string());

        form.toggle_mode();

        assert_eq!(form.mode, FormMode::Register);
        assert_eq!(form.values, FormValues::default());
        assert_eq!(form.focused_field(), Field::FirstName);
        assert!(form.error.is_none());
        for field in form.fields() {
            assert!(!form.is_touched(*field), "{:?} should be untouched", field);
        }

        // And back again.
        form.toggle_mode();
        assert_eq!(form.mode, FormMode::Login);
        assert_eq!(form.values, FormValues::default());
    }

    #[test]
    fn submission_is_blocked_and_touches_every_field_while_invalid() {
        let mut form = AuthForm::new();
        form.toggle_mode();

        assert!(form.submission().is_none());
        for field in form.fields() {
            assert!(
                form.is_touched(*field),
                "{:?} should be touched after a submit attempt",
                field
            );
        }
        assert_eq!(form.visible_error(Field::Picture), Some(MSG_REQUIRED));
    }

    #[test]
    fn submission_is_blocked_by_a_malformed_email() {
        let mut form = AuthForm::new();
        type_text(&mut form, "jane-at-example.com");
        form.focus_next();
        type_text(&mut form, "hunter2");

        assert!(form.submission().is_none());
        assert_eq!(form.visible_error(Field::Email), Some(MSG_INVALID_EMAIL));
    }

    #[test]
    fn valid_login_submission_carries_the_typed_values() {
        let mut form = AuthForm::new();
        fill_login(&mut form);

        match form.submission() {
            Some(Submission::Login(request)) => {
                assert_eq!(request.email, "jane@example.com");
                assert_eq!(request.password, "hunter2");
            }
            other => panic!("expected a login submission, got {:?}", other),
        }
    }

    #[test]
    fn valid_register_submission_derives_picture_path_from_the_file_name() {
        let mut form = AuthForm::new();
        form.toggle_mode();
        fill_register(&mut form);

        match form.submission() {
            Some(Submission::Register(request)) => {
                assert_eq!(request.first_name, "Jane");
                assert_eq!(request.last_name, "Doe");
                assert_eq!(request.location, "San Francisco, CA");
                assert_eq!(request.occupation, "Engineer");
                assert_eq!(request.email, "jane@example.com");
                assert_eq!(request.password, "hunter2");
                assert_eq!(request.picture, PathBuf::from("/tmp/photos/avatar.png"));
                assert_eq!(request.picture_path, "avatar.png");
            }
            other => panic!("expected a register submission, got {:?}", other),
        }
    }
}
