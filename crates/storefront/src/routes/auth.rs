//! Authentication route handlers.
//!
//! Failed submissions re-render their form directly so backend-provided
//! messages survive; only successes and logout travel through a
//! redirect. Sign-in state itself lives in the cookie session and is
//! mutated solely through [`CustomerSession`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use bookstore_core::{Address, Email};
use serde::Deserialize;
use tracing::instrument;

use crate::api::ApiError;
use crate::api::types::Registration;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::CustomerSession;
use crate::models::CurrentCustomer;
use crate::state::AppState;

use super::{MessageQuery, Nav};

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub message: Option<String>,
    /// Email repopulated after a failed attempt; never the password.
    pub email: String,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub message: Option<String>,
    pub form: RegisterForm,
}

/// Form body for the login page.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Form body for the registration page. Also feeds the template, so a
/// failed submission keeps what the visitor typed; the password fields
/// are blanked before rendering.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub building_no: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub apartment_unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    fn address(&self) -> Address {
        Address {
            description: self.description.clone(),
            neighborhood: self.neighborhood.clone(),
            building: self.building.clone(),
            building_no: self.building_no.clone(),
            floor: self.floor.clone(),
            apartment_unit: self.apartment_unit.clone(),
            district: self.district.clone(),
            province: self.province.clone(),
        }
    }

    fn blank_passwords(mut self) -> Self {
        self.password.clear();
        self.confirm_password.clear();
        self
    }
}

/// Check the registration input before the backend sees it.
fn validate_registration(form: &RegisterForm) -> Result<Email, &'static str> {
    let email = Email::parse(form.email.trim()).map_err(|_| "Enter a valid email address.")?;
    if form.password.chars().count() < 6 {
        return Err("Password must be at least 6 characters.");
    }
    if form.password != form.confirm_password {
        return Err("Passwords do not match.");
    }
    Ok(email)
}

/// Message for a failed login, preferring what the backend said.
fn login_error_message(error: &ApiError) -> String {
    if let Some(message) = error.user_message() {
        return message.to_string();
    }
    match error {
        ApiError::Http(_) | ApiError::Parse(_) => "Could Not Connect With the Server!".to_string(),
        _ => "Incorrect email or password!!".to_string(),
    }
}

/// Message for a failed registration, preferring what the backend said.
fn register_error_message(error: &ApiError) -> String {
    if let Some(message) = error.user_message() {
        return message.to_string();
    }
    match error {
        ApiError::Http(_) | ApiError::Parse(_) => "Cannot reach server".to_string(),
        _ => "Could not register".to_string(),
    }
}

/// Map login-page flash codes to their banner text.
fn flash_message(messages: &MessageQuery) -> Option<String> {
    if messages.error.is_some() {
        return Some("Something went wrong. Please try again.".to_string());
    }
    messages.success.as_deref().map(|code| {
        match code {
            "registered" => "Account created. You can log in now.",
            _ => "Done.",
        }
        .to_string()
    })
}

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(
    session: CustomerSession,
    Query(messages): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        nav: Nav::for_visitor(&session),
        message: flash_message(&messages),
        email: String::new(),
    }
}

/// Handle a login submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    mut session: CustomerSession,
    Form(form): Form<LoginForm>,
) -> Response {
    let nav = Nav::for_visitor(&session);
    let email = form.email.trim().to_string();

    match state.api().login(&email, &form.password).await {
        Ok(auth) => {
            let Some(customer_id) = auth.customer_id() else {
                tracing::error!("Login response carried no customer id");
                return LoginTemplate {
                    nav,
                    message: Some("Could Not Connect With the Server!".to_string()),
                    email,
                }
                .into_response();
            };

            let customer = CurrentCustomer::new(customer_id, auth.token.clone());
            if let Err(e) = session.sign_in(state.auth_events(), customer).await {
                return e.into_response();
            }

            set_sentry_user(&customer_id, Some(&email));
            Redirect::to("/profile").into_response()
        }
        Err(e) => {
            tracing::warn!("Login rejected: {e}");
            LoginTemplate {
                nav,
                message: Some(login_error_message(&e)),
                email,
            }
            .into_response()
        }
    }
}

/// Display the registration page.
#[instrument(skip_all)]
pub async fn register_page(session: CustomerSession) -> impl IntoResponse {
    RegisterTemplate {
        nav: Nav::for_visitor(&session),
        message: None,
        form: RegisterForm::default(),
    }
}

/// Handle a registration submission.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    mut session: CustomerSession,
    Form(form): Form<RegisterForm>,
) -> Response {
    let nav = Nav::for_visitor(&session);

    let email = match validate_registration(&form) {
        Ok(email) => email,
        Err(message) => {
            return RegisterTemplate {
                nav,
                message: Some(message.to_string()),
                form: form.blank_passwords(),
            }
            .into_response();
        }
    };

    let registration = Registration {
        email: email.as_str().to_string(),
        password: form.password.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        phone: form.phone.clone(),
        address: form.address().to_string(),
        birth_date: form.birth_date.clone(),
    };

    match state.api().register(&registration).await {
        Ok(auth) => {
            let Some(customer_id) = auth.customer_id() else {
                // Account exists but the reply had no id; the visitor can
                // sign in normally.
                return Redirect::to("/auth/login?success=registered").into_response();
            };

            let customer = CurrentCustomer::new(customer_id, auth.token.clone());
            if let Err(e) = session.sign_in(state.auth_events(), customer).await {
                return e.into_response();
            }

            set_sentry_user(&customer_id, Some(email.as_str()));
            Redirect::to("/profile").into_response()
        }
        Err(e) => {
            tracing::warn!("Registration rejected: {e}");
            RegisterTemplate {
                nav,
                message: Some(register_error_message(&e)),
                form: form.blank_passwords(),
            }
            .into_response()
        }
    }
}

/// Clear the session and return to the login page.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    mut session: CustomerSession,
) -> Result<Redirect, AppError> {
    session.sign_out(state.auth_events()).await?;
    clear_sentry_user();
    Ok(Redirect::to("/auth/login"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            ..RegisterForm::default()
        }
    }

    #[test]
    fn test_validate_registration_accepts_good_input() {
        let checked = validate_registration(&form("ada@example.com", "hunter22", "hunter22"));
        assert_eq!(checked.unwrap().as_str(), "ada@example.com");
    }

    #[test]
    fn test_validate_registration_rejects_bad_email() {
        let checked = validate_registration(&form("not-an-email", "hunter22", "hunter22"));
        assert_eq!(checked.unwrap_err(), "Enter a valid email address.");
    }

    #[test]
    fn test_validate_registration_rejects_short_password() {
        let checked = validate_registration(&form("ada@example.com", "tiny", "tiny"));
        assert_eq!(checked.unwrap_err(), "Password must be at least 6 characters.");
    }

    #[test]
    fn test_validate_registration_rejects_mismatch() {
        let checked = validate_registration(&form("ada@example.com", "hunter22", "hunter23"));
        assert_eq!(checked.unwrap_err(), "Passwords do not match.");
    }

    #[test]
    fn test_login_error_prefers_backend_message() {
        let error = ApiError::Api {
            status: 403,
            message: "Account locked".to_string(),
        };
        assert_eq!(login_error_message(&error), "Account locked");
    }

    #[test]
    fn test_login_error_default_is_bad_credentials() {
        assert_eq!(
            login_error_message(&ApiError::Unauthorized),
            "Incorrect email or password!!"
        );
    }

    #[test]
    fn test_login_error_unreadable_reply_reads_as_connection_trouble() {
        let parse = serde_json::from_str::<serde_json::Value>("oops").unwrap_err();
        assert_eq!(
            login_error_message(&ApiError::Parse(parse)),
            "Could Not Connect With the Server!"
        );
    }

    #[test]
    fn test_register_error_default() {
        let error = ApiError::Api {
            status: 409,
            message: String::new(),
        };
        assert_eq!(register_error_message(&error), "Could not register");
    }

    #[test]
    fn test_blank_passwords_keeps_the_rest() {
        let blanked = form("ada@example.com", "hunter22", "hunter22").blank_passwords();
        assert_eq!(blanked.email, "ada@example.com");
        assert_eq!(blanked.password, "");
        assert_eq!(blanked.confirm_password, "");
    }

    #[test]
    fn test_registered_flash_reads_as_account_created() {
        let messages = MessageQuery {
            error: None,
            success: Some("registered".to_string()),
        };
        assert_eq!(
            flash_message(&messages).as_deref(),
            Some("Account created. You can log in now.")
        );
    }
}
