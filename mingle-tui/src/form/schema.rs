use std::collections::BTreeMap;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use super::FormMode;

/// WHATWG HTML5 email pattern, the same shape browsers apply to
/// `<input type="email">`.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("Failed to compile email regex")
});

pub const MSG_REQUIRED: &str = "required";
pub const MSG_INVALID_EMAIL: &str = "invalid email";

/// A single form field. Registration uses all of them; login uses only
/// email and password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    FirstName,
    LastName,
    Location,
    Occupation,
    Picture,
    Email,
    Password,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Location => "Location",
            Field::Occupation => "Occupation",
            Field::Picture => "Picture",
            Field::Email => "Email",
            Field::Password => "Password",
        }
    }

    /// Whether the rendered value must be masked.
    pub fn is_secret(self) -> bool {
        matches!(self, Field::Password)
    }
}

const REGISTER_FIELDS: &[Field] = &[
    Field::FirstName,
    Field::LastName,
    Field::Location,
    Field::Occupation,
    Field::Picture,
    Field::Email,
    Field::Password,
];

const LOGIN_FIELDS: &[Field] = &[Field::Email, Field::Password];

/// Fields active in the given mode, in display order.
pub fn fields_for(mode: FormMode) -> &'static [Field] {
    match mode {
        FormMode::Login => LOGIN_FIELDS,
        FormMode::Register => REGISTER_FIELDS,
    }
}

/// A declarative validation rule. Rules run in order per field; the first
/// failure produces the field's error message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Text value must be non-empty.
    Required,
    /// Non-empty text value must look like an email address.
    Email,
    /// A file must have been selected.
    Attachment,
}

struct FieldRules {
    field: Field,
    rules: &'static [Rule],
}

const REGISTER_SCHEMA: &[FieldRules] = &[
    FieldRules {
        field: Field::FirstName,
        rules: &[Rule::Required],
    },
    FieldRules {
        field: Field::LastName,
        rules: &[Rule::Required],
    },
    FieldRules {
        field: Field::Location,
        rules: &[Rule::Required],
    },
    FieldRules {
        field: Field::Occupation,
        rules: &[Rule::Required],
    },
    FieldRules {
        field: Field::Picture,
        rules: &[Rule::Attachment],
    },
    FieldRules {
        field: Field::Email,
        rules: &[Rule::Required, Rule::Email],
    },
    FieldRules {
        field: Field::Password,
        rules: &[Rule::Required],
    },
];

const LOGIN_SCHEMA: &[FieldRules] = &[
    FieldRules {
        field: Field::Email,
        rules: &[Rule::Required, Rule::Email],
    },
    FieldRules {
        field: Field::Password,
        rules: &[Rule::Required],
    },
];

fn schema_for(mode: FormMode) -> &'static [FieldRules] {
    match mode {
        FormMode::Login => LOGIN_SCHEMA,
        FormMode::Register => REGISTER_SCHEMA,
    }
}

/// Current values for every field. Text fields hold what has been typed;
/// the picture holds the selected file's path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub location: String,
    pub occupation: String,
    pub picture: Option<PathBuf>,
}

impl FormValues {
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Location => &self.location,
            Field::Occupation => &self.occupation,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::Picture => "",
        }
    }

    /// Mutable access to a text field. `None` for the picture field, which
    /// is set through file selection rather than typing.
    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::FirstName => Some(&mut self.first_name),
            Field::LastName => Some(&mut self.last_name),
            Field::Location => Some(&mut self.location),
            Field::Occupation => Some(&mut self.occupation),
            Field::Email => Some(&mut self.email),
            Field::Password => Some(&mut self.password),
            Field::Picture => None,
        }
    }
}

/// Evaluate the active schema against the given values. Valid fields are
/// absent from the returned map.
pub fn validate(values: &FormValues, mode: FormMode) -> BTreeMap<Field, &'static str> {
    let mut errors = BTreeMap::new();

    for entry in schema_for(mode) {
        for rule in entry.rules {
            let failure = match rule {
                Rule::Required => {
                    if values.text(entry.field).is_empty() {
                        Some(MSG_REQUIRED)
                    } else {
                        None
                    }
                }
                Rule::Email => {
                    let text = values.text(entry.field);
                    if !text.is_empty() && !is_valid_email(text) {
                        Some(MSG_INVALID_EMAIL)
                    } else {
                        None
                    }
                }
                Rule::Attachment => {
                    if values.picture.is_none() {
                        Some(MSG_REQUIRED)
                    } else {
                        None
                    }
                }
            };

            if let Some(message) = failure {
                errors.insert(entry.field, message);
                break;
            }
        }
    }

    errors
}

pub fn is_valid_email(text: &str) -> bool {
    EMAIL_REGEX.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn filled_register_values() -> FormValues {
        FormValues {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "hunter2".to_string(),
            location: "San Francisco, CA".to_string(),
            occupation: "Engineer".to_string(),
            picture: Some(PathBuf::from("/tmp/avatar.png")),
        }
    }

    #[test]
    fn empty_register_values_fail_every_field() {
        let errors = validate(&FormValues::default(), FormMode::Register);

        assert_eq!(errors.len(), REGISTER_FIELDS.len());
        for field in REGISTER_FIELDS {
            assert_eq!(
                errors.get(field),
                Some(&MSG_REQUIRED),
                "{:?} should be required",
                field
            );
        }
    }

    #[test]
    fn empty_login_values_fail_both_fields() {
        let errors = validate(&FormValues::default(), FormMode::Login);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(&Field::Email), Some(&MSG_REQUIRED));
        assert_eq!(errors.get(&Field::Password), Some(&MSG_REQUIRED));
    }

    #[test]
    fn filled_register_values_validate() {
        let errors = validate(&filled_register_values(), FormMode::Register);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn malformed_email_reports_invalid_in_both_modes() {
        for mode in [FormMode::Login, FormMode::Register] {
            let mut values = filled_register_values();
            values.email = "jane-at-example.com".to_string();

            let errors = validate(&values, mode);
            assert_eq!(errors.get(&Field::Email), Some(&MSG_INVALID_EMAIL));
        }
    }

    #[test]
    fn empty_email_reports_required_not_invalid() {
        let mut values = filled_register_values();
        values.email = String::new();

        let errors = validate(&values, FormMode::Register);
        assert_eq!(errors.get(&Field::Email), Some(&MSG_REQUIRED));
    }

    #[test]
    fn missing_picture_reports_required() {
        let mut values = filled_register_values();
        values.picture = None;

        let errors = validate(&values, FormMode::Register);
        assert_eq!(errors.get(&Field::Picture), Some(&MSG_REQUIRED));
    }

    #[test]
    fn picture_is_ignored_by_the_login_schema() {
        let values = FormValues {
            email: "jane@example.com".to_string(),
            password: "hunter2".to_string(),
            ..FormValues::default()
        };

        let errors = validate(&values, FormMode::Login);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn email_format_accepts_common_shapes() {
        for email in [
            "jane@example.com",
            "jane.doe+tag@sub.example.com",
            "j@e.co",
            "UPPER.case@EXAMPLE.COM",
        ] {
            assert!(is_valid_email(email), "{} should be valid", email);
        }
    }

    #[test]
    fn email_format_rejects_malformed_shapes() {
        for email in [
            "jane",
            "jane@",
            "@example.com",
            "jane@@example.com",
            "jane doe@example.com",
            "jane@-example.com",
        ] {
            assert!(!is_valid_email(email), "{} should be invalid", email);
        }
    }

    proptest! {
        #[test]
        fn text_without_an_at_sign_is_never_a_valid_email(text in "[^@]{0,40}") {
            prop_assert!(!is_valid_email(&text));
        }
    }
}
