//! Client-side form validation
//!
//! Validation runs before any request is sent; a failed form never reaches
//! the network. Field errors are keyed by the Rust field name.

use crate::error::{AppError, ErrorCode};
use crate::models::{
    CurrencyFormValues, LoginRequest, PlanFormFeature, PlanFormValues, PlanFrequency,
    RegisterRequest, UserCreate, UserRole, UserUpdate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

static CURRENCY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("static regex"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn password_complexity(value: &str) -> Result<(), ValidationError> {
    let upper = value.chars().any(|c| c.is_ascii_uppercase());
    let lower = value.chars().any(|c| c.is_ascii_lowercase());
    let digit = value.chars().any(|c| c.is_ascii_digit());
    if upper && lower && digit {
        Ok(())
    } else {
        Err(error(
            "password_complexity",
            "Include upper, lower case letters and a number",
        ))
    }
}

fn currency_code(value: &str) -> Result<(), ValidationError> {
    if CURRENCY_CODE.is_match(value) {
        Ok(())
    } else {
        Err(error(
            "currency_code",
            "Use an uppercase ISO 4217 code (e.g., USD)",
        ))
    }
}

fn price(value: f64) -> Result<(), ValidationError> {
    match value {
        v if v.is_nan() => Err(error("number", "Price must be a number")),
        v if v < 0.0 => Err(error("range", "Price must be at least 0")),
        _ => Ok(()),
    }
}

fn vcard_count(value: f64) -> Result<(), ValidationError> {
    match value {
        v if v.is_nan() => Err(error("number", "Number of vCards must be a number")),
        v if v.fract() != 0.0 => Err(error("integer", "Number of vCards must be a whole number")),
        v if v < 1.0 => Err(error("range", "Allow at least 1 vCard")),
        _ => Ok(()),
    }
}

fn storage_limit(value: f64) -> Result<(), ValidationError> {
    match value {
        v if v.is_nan() => Err(error("number", "Storage limit must be a number")),
        v if v < 0.0 => Err(error("range", "Storage limit must be at least 0")),
        _ => Ok(()),
    }
}

fn trial_days(value: f64) -> Result<(), ValidationError> {
    match value {
        v if v.is_nan() => Err(error("number", "Trial days must be a number")),
        v if v < 0.0 => Err(error("range", "Trial days cannot be negative")),
        _ => Ok(()),
    }
}

/// Blank limits (NaN) are allowed and mean "no limit"
fn feature_limit(value: f64) -> Result<(), ValidationError> {
    if !value.is_nan() && value < 0.0 {
        Err(error("range", "Limit cannot be negative"))
    } else {
        Ok(())
    }
}

// ========== Login ==========

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl From<LoginForm> for LoginRequest {
    fn from(form: LoginForm) -> Self {
        Self {
            email: form.email,
            password: form.password,
        }
    }
}

// ========== Register ==========

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_complexity")
    )]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

fn validate_password_complexity(value: &String) -> Result<(), ValidationError> {
    password_complexity(value)
}

impl From<RegisterForm> for RegisterRequest {
    fn from(form: RegisterForm) -> Self {
        Self {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email,
            password: form.password,
        }
    }
}

// ========== User ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UserForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    pub role: UserRole,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub is_email_verified: bool,
}

impl UserForm {
    /// Blank passwords are treated as absent
    fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// Schema validation plus the create-only password requirement
    pub fn validate_for(&self, mode: FormMode) -> Result<(), ValidationErrors> {
        let normalized = Self {
            password: self.password().map(str::to_string),
            ..self.clone()
        };
        let mut errors = match normalized.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if mode == FormMode::Create && normalized.password.is_none() {
            errors.add(
                "password",
                error("required", "Password is required when creating a user"),
            );
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn into_create(self) -> Option<UserCreate> {
        let password = self.password()?.to_string();
        Some(UserCreate {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.clone(),
            role: self.role,
            password,
            is_email_verified: self.is_email_verified,
        })
    }

    pub fn into_update(self) -> UserUpdate {
        let password = self.password().map(str::to_string);
        UserUpdate {
            first_name: Some(self.first_name.trim().to_string()),
            last_name: Some(self.last_name.trim().to_string()),
            email: Some(self.email),
            role: Some(self.role),
            password,
            is_email_verified: Some(self.is_email_verified),
        }
    }
}

// ========== Currency ==========

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CurrencyForm {
    #[validate(
        length(equal = 3, message = "Currency code must be three characters"),
        custom(function = "validate_currency_code")
    )]
    pub code: String,
    #[validate(length(min = 1, max = 80, message = "Currency name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 8, message = "Symbol is required"))]
    pub symbol: String,
    pub is_active: bool,
}

fn validate_currency_code(value: &String) -> Result<(), ValidationError> {
    currency_code(value)
}

impl From<CurrencyForm> for CurrencyFormValues {
    fn from(form: CurrencyForm) -> Self {
        Self {
            code: form.code,
            name: form.name.trim().to_string(),
            symbol: form.symbol.trim().to_string(),
            is_active: form.is_active,
        }
    }
}

// ========== Plan ==========

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PlanFeatureForm {
    #[validate(length(min = 1, message = "Feature name is required"))]
    pub feature: String,
    pub enabled: bool,
    #[validate(custom(function = "feature_limit"))]
    pub limit: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlanForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(custom(function = "price"))]
    pub price: f64,
    #[validate(length(min = 1, message = "Currency is required"))]
    pub currency_id: String,
    pub frequency: PlanFrequency,
    #[validate(custom(function = "vcard_count"))]
    pub no_of_vcards: f64,
    #[validate(custom(function = "storage_limit"))]
    pub storage_limit: f64,
    #[validate(custom(function = "trial_days"))]
    pub trial_days: f64,
    pub is_default: bool,
    pub status: bool,
    #[validate(nested)]
    pub features: Vec<PlanFeatureForm>,
    pub template_ids: Vec<i64>,
}

impl From<PlanFormValues> for PlanForm {
    fn from(values: PlanFormValues) -> Self {
        Self {
            name: values.name,
            price: values.price,
            currency_id: values.currency_id,
            frequency: values.frequency,
            no_of_vcards: values.no_of_vcards,
            storage_limit: values.storage_limit,
            trial_days: values.trial_days,
            is_default: values.is_default,
            status: values.status,
            features: values
                .features
                .into_iter()
                .map(|f| PlanFeatureForm {
                    feature: f.feature,
                    enabled: f.enabled,
                    limit: f.limit,
                })
                .collect(),
            template_ids: values.template_ids,
        }
    }
}

impl From<PlanForm> for PlanFormValues {
    fn from(form: PlanForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            price: form.price,
            currency_id: form.currency_id,
            frequency: form.frequency,
            no_of_vcards: form.no_of_vcards,
            storage_limit: form.storage_limit,
            trial_days: form.trial_days,
            is_default: form.is_default,
            status: form.status,
            features: form
                .features
                .into_iter()
                .map(|f| PlanFormFeature {
                    feature: f.feature,
                    enabled: f.enabled,
                    limit: f.limit.filter(|l| !l.is_nan()),
                })
                .collect(),
            template_ids: form.template_ids,
        }
    }
}

// ========== Error flattening ==========

/// First message per field, nested list fields as `features[0].feature`
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    collect(errors, "", &mut out);
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut BTreeMap<String, String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| first.code.to_string());
                    out.entry(path).or_insert(message);
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

/// Convert validation failures into an [`AppError`] carrying per-field details
pub fn into_app_error(errors: &ValidationErrors) -> AppError {
    let fields = field_errors(errors);
    let mut err = AppError::new(ErrorCode::ValidationFailed);
    for (field, message) in fields {
        err = err.with_detail(field, message);
    }
    err
}

/// Validate any form, mapping failures to [`AppError`]
pub fn validate_form<T: Validate>(form: &T) -> Result<(), AppError> {
    form.validate().map_err(|e| into_app_error(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form() -> RegisterForm {
        RegisterForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            password: "Secret123".into(),
            confirm_password: "Secret123".into(),
        }
    }

    #[test]
    fn register_valid() {
        assert!(register_form().validate().is_ok());
    }

    #[test]
    fn register_mismatch_only_flags_confirmation() {
        let form = RegisterForm {
            confirm_password: "Secret124".into(),
            ..register_form()
        };
        let errors = form.validate().unwrap_err();
        let fields = field_errors(&errors);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["confirm_password"], "Passwords must match");
    }

    #[test]
    fn register_weak_password() {
        let form = RegisterForm {
            password: "alllowercase1".into(),
            confirm_password: "alllowercase1".into(),
            ..register_form()
        };
        let fields = field_errors(&form.validate().unwrap_err());
        assert_eq!(
            fields["password"],
            "Include upper, lower case letters and a number"
        );
    }

    #[test]
    fn login_rules() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let fields = field_errors(&form.validate().unwrap_err());
        assert_eq!(fields["email"], "Enter a valid email address");
        assert_eq!(fields["password"], "Password must be at least 8 characters");

        let padded = LoginForm {
            email: " jane@example.com ".into(),
            password: "password1".into(),
        };
        let fields = field_errors(&padded.validate().unwrap_err());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["email"], "Enter a valid email address");

        let request = LoginRequest::from(LoginForm {
            email: "jane@example.com".into(),
            password: "password1".into(),
        });
        assert_eq!(request.email, "jane@example.com");
    }

    #[test]
    fn user_password_required_on_create_only() {
        let form = UserForm {
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@b.co".into(),
            password: Some(String::new()),
            ..Default::default()
        };
        let fields = field_errors(&form.validate_for(FormMode::Create).unwrap_err());
        assert_eq!(fields["password"], "Password is required when creating a user");
        assert!(form.validate_for(FormMode::Edit).is_ok());
        assert!(form.clone().into_create().is_none());
        assert!(form.into_update().password.is_none());
    }

    #[test]
    fn currency_code_must_be_uppercase_iso() {
        let form = CurrencyForm {
            code: "usd".into(),
            name: "US Dollar".into(),
            symbol: "$".into(),
            is_active: true,
        };
        let fields = field_errors(&form.validate().unwrap_err());
        assert_eq!(fields["code"], "Use an uppercase ISO 4217 code (e.g., USD)");

        let ok = CurrencyForm {
            code: "USD".into(),
            ..form
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn currency_limits() {
        let form = CurrencyForm {
            code: "EUR".into(),
            name: "x".repeat(81),
            symbol: "123456789".into(),
            is_active: true,
        };
        let fields = field_errors(&form.validate().unwrap_err());
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("symbol"));
    }

    #[test]
    fn plan_rules() {
        let mut values = PlanFormValues {
            name: "Pro".into(),
            currency_id: "USD".into(),
            ..PlanFormValues::default()
        };
        values.price = -1.0;
        values.no_of_vcards = 1.5;
        values.features.push(PlanFormFeature {
            feature: String::new(),
            enabled: true,
            limit: Some(-2.0),
        });
        let form = PlanForm::from(values);
        let fields = field_errors(&form.validate().unwrap_err());
        assert_eq!(fields["price"], "Price must be at least 0");
        assert_eq!(fields["no_of_vcards"], "Number of vCards must be a whole number");
        assert_eq!(fields["features[0].feature"], "Feature name is required");
        assert_eq!(fields["features[0].limit"], "Limit cannot be negative");
    }

    #[test]
    fn plan_defaults_need_name_and_currency() {
        let form = PlanForm::from(PlanFormValues::default());
        let fields = field_errors(&form.validate().unwrap_err());
        assert_eq!(fields["name"], "Name is required");
        assert_eq!(fields["currency_id"], "Currency is required");
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn app_error_carries_field_details() {
        let form = LoginForm::default();
        let err = validate_form(&form).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert!(details.contains_key("email"));
        assert!(details.contains_key("password"));
    }
}
