//! Form validation for the enrollment, contact and auth pages.
//!
//! Every text input is trimmed before it is checked. A validated form carries
//! sanitized values that are safe to hand to the hosted backend.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static SCRIPT_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Latin or Arabic letters, whitespace, apostrophes and hyphens.
fn name_regex() -> &'static Regex {
    NAME_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z\x{0600}-\x{06FF}\s'-]+$").unwrap())
}

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_%+'.-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap()
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_REGEX.get_or_init(|| Regex::new(r"^[+\d\s()-]+$").unwrap())
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every rule a submission failed, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "invalid form: {}", messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// Collects failures while reading fields.
#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Trim `value`, then enforce `required` and a maximum length in characters.
    fn text(
        &mut self,
        field: &'static str,
        label: &str,
        value: &str,
        required: bool,
        max: usize,
    ) -> String {
        let trimmed = value.trim();
        if required && trimmed.is_empty() {
            self.fail(field, format!("{} is required", label));
        }
        if trimmed.chars().count() > max {
            self.fail(field, format!("{} must be less than {} characters", label, max));
        }
        trimmed.to_string()
    }

    fn pattern(&mut self, field: &'static str, message: &str, value: &str, regex: &Regex) {
        if !value.is_empty() && !regex.is_match(value) {
            self.fail(field, message);
        }
    }

    fn email(&mut self, value: &str, max: Option<usize>) -> String {
        let email = self.text("email", "Email", value, true, max.unwrap_or(usize::MAX));
        if !email.is_empty() && (!email_regex().is_match(&email) || email.contains("..")) {
            self.fail("email", "Invalid email address");
        }
        email
    }

    fn finish<T>(self, value: T) -> Result<T, FormErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(FormErrors(self.errors))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Raw enrollment submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrollmentForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub ai_experience: String,
    pub goals: Option<String>,
}

/// Enrollment that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub ai_experience: ExperienceLevel,
    pub goals: Option<String>,
}

impl EnrollmentForm {
    pub fn validate(&self) -> Result<Enrollment, FormErrors> {
        let mut check = Checker::default();

        let first_name = check.text("firstName", "First name", &self.first_name, true, 50);
        check.pattern("firstName", "First name contains invalid characters", &first_name, name_regex());

        let last_name = check.text("lastName", "Last name", &self.last_name, true, 50);
        check.pattern("lastName", "Last name contains invalid characters", &last_name, name_regex());

        let email = check.email(&self.email, Some(255));

        let phone = check.text("phone", "Phone", &self.phone, true, 20);
        check.pattern("phone", "Phone contains invalid characters", &phone, phone_regex());

        let company = check.text("company", "Company", self.company.as_deref().unwrap_or(""), false, 100);
        let goals = check.text("goals", "Goals", self.goals.as_deref().unwrap_or(""), false, 1000);

        let ai_experience = ExperienceLevel::parse(self.ai_experience.trim());
        if ai_experience.is_none() {
            check.fail("aiExperience", "Experience level is required");
        }

        match ai_experience {
            Some(ai_experience) => check.finish(Enrollment {
                first_name: sanitize_text(&first_name),
                last_name: sanitize_text(&last_name),
                email,
                phone,
                company: non_empty(sanitize_text(&company)),
                ai_experience,
                goals: non_empty(sanitize_text(&goals)),
            }),
            None => Err(FormErrors(check.errors)),
        }
    }
}

/// Raw contact submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<ContactMessage, FormErrors> {
        let mut check = Checker::default();

        let name = check.text("name", "Name", &self.name, true, 100);
        check.pattern("name", "Name contains invalid characters", &name, name_regex());
        let email = check.email(&self.email, Some(255));
        let subject = check.text("subject", "Subject", &self.subject, true, 200);
        let message = check.text("message", "Message", &self.message, true, 5000);

        check.finish(ContactMessage {
            name: sanitize_text(&name),
            email,
            subject: sanitize_text(&subject),
            message: sanitize_text(&message),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Returns the trimmed e-mail; the password is passed through untouched.
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut check = Checker::default();
        let email = check.email(&self.email, None);
        if self.password.is_empty() {
            check.fail("password", "Password is required");
        }
        check.finish(email)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut check = Checker::default();
        check.text("firstName", "First name", &self.first_name, true, 50);
        check.text("lastName", "Last name", &self.last_name, true, 50);
        check.email(&self.email, None);

        let password = &self.password;
        if password.chars().count() < 8 {
            check.fail("password", "Password must be at least 8 characters");
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            check.fail("password", "Password must contain at least one uppercase letter");
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            check.fail("password", "Password must contain at least one lowercase letter");
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            check.fail("password", "Password must contain at least one number");
        }

        if self.confirm_password.is_empty() {
            check.fail("confirmPassword", "Please confirm your password");
        } else if self.confirm_password != *password {
            check.fail("confirmPassword", "Passwords don't match");
        }

        check.finish(())
    }
}

/// Remove all markup, dropping script and style bodies entirely.
pub fn sanitize_text(text: &str) -> String {
    let scripts = SCRIPT_REGEX.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap()
    });
    let tags = TAG_REGEX.get_or_init(|| Regex::new(r"(?s)<[^>]*>").unwrap());

    let without_scripts = scripts.replace_all(text, "");
    tags.replace_all(&without_scripts, "").into_owned()
}

/// Trim and strip markup from free-form user input before storage.
pub fn sanitize_user_input(input: &str) -> String {
    sanitize_text(input.trim())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment() -> EnrollmentForm {
        EnrollmentForm {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john.doe@example.com".into(),
            phone: "+1234567890".into(),
            company: Some("Acme Inc".into()),
            ai_experience: "intermediate".into(),
            goals: Some("Learn AI prompting".into()),
        }
    }

    #[test]
    fn test_valid_enrollment() {
        let valid = enrollment().validate().unwrap();
        assert_eq!(valid.ai_experience, ExperienceLevel::Intermediate);
        assert_eq!(valid.company.as_deref(), Some("Acme Inc"));
    }

    #[test]
    fn test_enrollment_without_optional_fields() {
        let form = EnrollmentForm {
            company: None,
            goals: Some("   ".into()),
            ai_experience: "beginner".into(),
            phone: "555-1234".into(),
            ..enrollment()
        };
        let valid = form.validate().unwrap();
        assert_eq!(valid.company, None);
        assert_eq!(valid.goals, None);
    }

    #[test]
    fn test_enrollment_accepts_arabic_names() {
        let form = EnrollmentForm {
            first_name: "محمد".into(),
            last_name: "عبد الله".into(),
            ..enrollment()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_enrollment_rejects_invalid_email() {
        let form = EnrollmentForm {
            email: "not-an-email".into(),
            ..enrollment()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.for_field("email"), vec!["Invalid email address"]);
    }

    #[test]
    fn test_enrollment_rejects_empty_first_name() {
        let form = EnrollmentForm {
            first_name: "  ".into(),
            ..enrollment()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.for_field("firstName"), vec!["First name is required"]);
    }

    #[test]
    fn test_enrollment_rejects_digits_in_name_and_letters_in_phone() {
        let form = EnrollmentForm {
            last_name: "Doe3".into(),
            phone: "call me".into(),
            ..enrollment()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.0.len(), 2);
        assert!(errors.to_string().contains("Phone contains invalid characters"));
    }

    #[test]
    fn test_enrollment_rejects_unknown_experience() {
        let form = EnrollmentForm {
            ai_experience: "expert".into(),
            ..enrollment()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.for_field("aiExperience").len(), 1);
    }

    #[test]
    fn test_enrollment_length_limits() {
        let form = EnrollmentForm {
            first_name: "a".repeat(51),
            goals: Some("g".repeat(1001)),
            ..enrollment()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.for_field("firstName"),
            vec!["First name must be less than 50 characters"]
        );
        assert_eq!(errors.for_field("goals").len(), 1);
    }

    #[test]
    fn test_enrollment_deserializes_camel_case() {
        let form: EnrollmentForm = serde_json::from_str(
            r#"{"firstName":"Jane","lastName":"Smith","email":"jane@test.com","phone":"555-1234","aiExperience":"beginner"}"#,
        )
        .unwrap();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_contact_form() {
        let form = ContactForm {
            name: "Sarah Chen".into(),
            email: "sarah@example.com".into(),
            subject: "Group pricing".into(),
            message: "Hello <b>team</b><script>alert(1)</script>".into(),
        };
        let valid = form.validate().unwrap();
        assert_eq!(valid.message, "Hello team");
    }

    #[test]
    fn test_contact_form_missing_fields() {
        let errors = ContactForm::default().validate().unwrap_err();
        for field in ["name", "email", "subject", "message"] {
            assert_eq!(errors.for_field(field).len(), 1, "field {field}");
        }
    }

    #[test]
    fn test_sign_in() {
        let form = SignInForm {
            email: " user@example.com ".into(),
            password: "x".into(),
        };
        assert_eq!(form.validate().unwrap(), "user@example.com");

        let errors = SignInForm::default().validate().unwrap_err();
        assert_eq!(errors.0.len(), 2);
    }

    #[test]
    fn test_sign_up_password_rules() {
        let form = SignUpForm {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            email: "jane@test.com".into(),
            password: "Passw0rd".into(),
            confirm_password: "Passw0rd".into(),
        };
        assert!(form.validate().is_ok());

        let weak = SignUpForm {
            password: "password".into(),
            confirm_password: "different".into(),
            ..form
        };
        let errors = weak.validate().unwrap_err();
        assert_eq!(errors.for_field("password").len(), 2);
        assert_eq!(errors.for_field("confirmPassword"), vec!["Passwords don't match"]);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_text("<p>Hi <em>there</em></p>"), "Hi there");
        assert_eq!(sanitize_text("<style>p{}</style>plain"), "plain");
        assert_eq!(sanitize_user_input("  <i>x</i>  "), "x");
    }
}
