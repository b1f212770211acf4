//! Profile route handlers.
//!
//! The profile page edits structured address fields while the backend
//! stores one flat string; [`Address`] carries the conversion in both
//! directions. Password changes are validated here before the backend
//! sees them.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use bookstore_core::Address;
use serde::Deserialize;
use tracing::instrument;

use crate::api::ApiError;
use crate::api::types::{CustomerProfile, CustomerUpdate};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::{MessageQuery, Nav};

/// Profile data prepared for the form.
#[derive(Clone)]
pub struct ProfileView {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub birth_date: String,
    pub address: Address,
}

impl From<&CustomerProfile> for ProfileView {
    fn from(profile: &CustomerProfile) -> Self {
        let raw_address = profile.address.as_deref().unwrap_or("");
        Self {
            name: profile.first_name.clone(),
            surname: profile.last_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone().unwrap_or_default(),
            birth_date: date_only(profile.birth_date.as_deref().unwrap_or("")).to_string(),
            address: Address::parse(raw_address),
        }
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub profile: ProfileView,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Fallback page when the profile cannot be shown.
#[derive(Template, WebTemplate)]
#[template(path = "profile/error.html")]
pub struct ProfileErrorTemplate {
    pub nav: Nav,
    pub message: &'static str,
}

/// Form body for the profile editor.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birth_date: String,
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
}

impl ProfileForm {
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
}

/// Form body for the password change box.
#[derive(Deserialize)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Keep the date part of a backend timestamp, `YYYY-MM-DD`.
///
/// The backend sometimes appends a time suffix to stored birth dates;
/// anything shorter than a full date passes through untouched.
fn date_only(raw: &str) -> &str {
    raw.get(..10).unwrap_or(raw)
}

/// Check a new password before sending it to the backend. Returns the
/// error flash code when the input is unacceptable.
fn validate_new_password(new: &str, confirm: &str) -> Result<(), &'static str> {
    if new.chars().count() < 6 {
        return Err("password_short");
    }
    if new != confirm {
        return Err("password_mismatch");
    }
    Ok(())
}

/// Map an error flash code to the message shown on the profile page.
fn error_message(code: &str) -> &'static str {
    match code {
        "update" => "Could not update profile",
        "password" => "Could not update password",
        "password_short" => "New password must be at least 6 characters.",
        "password_mismatch" => "Passwords do not match.",
        _ => "Something went wrong.",
    }
}

/// Map a success flash code to its message.
fn success_message(code: &str) -> &'static str {
    match code {
        "profile" => "Profile updated \u{2705}",
        "password" => "Password updated \u{2705}",
        _ => "Done.",
    }
}

/// Display the signed-in customer's profile.
#[instrument(skip(state, customer))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Query(messages): Query<MessageQuery>,
) -> Response {
    let nav = Nav { signed_in: true };

    match state.api().profile(customer.id, customer.bearer()).await {
        Ok(profile) => ProfileTemplate {
            nav,
            profile: ProfileView::from(&profile),
            error: messages.error.as_deref().map(error_message),
            success: messages.success.as_deref().map(success_message),
        }
        .into_response(),
        Err(ApiError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            ProfileErrorTemplate {
                nav,
                message: "Profile not found.",
            },
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch profile: {e}");
            (
                StatusCode::BAD_GATEWAY,
                ProfileErrorTemplate {
                    nav,
                    message: "Could not load profile",
                },
            )
                .into_response()
        }
    }
}

/// Save the profile form, re-encoding the address fields into the
/// single string the backend stores.
#[instrument(skip(state, customer, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Redirect {
    let update = CustomerUpdate {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        phone: form.phone.clone(),
        address: form.address().to_string(),
        birth_date: form.birth_date.clone(),
    };

    match state
        .api()
        .update_profile(customer.id, &update, customer.bearer())
        .await
    {
        Ok(()) => Redirect::to("/profile?success=profile"),
        Err(e) => {
            tracing::error!("Failed to update profile: {e}");
            Redirect::to("/profile?error=update")
        }
    }
}

/// Change the customer's password.
#[instrument(skip(state, customer, form))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Form(form): Form<PasswordForm>,
) -> Redirect {
    if let Err(code) = validate_new_password(&form.new_password, &form.confirm_password) {
        return Redirect::to(&format!("/profile?error={code}"));
    }

    match state
        .api()
        .change_password(
            customer.id,
            &form.current_password,
            &form.new_password,
            customer.bearer(),
        )
        .await
    {
        Ok(()) => Redirect::to("/profile?success=password"),
        Err(e) => {
            tracing::warn!("Password change rejected: {e}");
            Redirect::to("/profile?error=password")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_core::CustomerId;

    #[test]
    fn test_date_only_strips_time_suffix() {
        assert_eq!(date_only("1990-05-04T00:00:00"), "1990-05-04");
        assert_eq!(date_only("1990-05-04"), "1990-05-04");
        assert_eq!(date_only("1990"), "1990");
        assert_eq!(date_only(""), "");
    }

    #[test]
    fn test_validate_new_password() {
        assert_eq!(validate_new_password("short", "short"), Err("password_short"));
        assert_eq!(
            validate_new_password("longenough", "different"),
            Err("password_mismatch")
        );
        assert_eq!(validate_new_password("longenough", "longenough"), Ok(()));
    }

    #[test]
    fn test_profile_view_splits_stored_address() {
        let profile = CustomerProfile {
            id: CustomerId::new(9),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: Some("5551112233".to_string()),
            address: Some(
                "Blue door, Neighborhood: Moda, No: 14, District: Kadikoy, Province: Istanbul"
                    .to_string(),
            ),
            birth_date: Some("1815-12-10T00:00:00".to_string()),
        };

        let view = ProfileView::from(&profile);
        assert_eq!(view.birth_date, "1815-12-10");
        assert_eq!(view.address.description, "Blue door");
        assert_eq!(view.address.neighborhood, "Moda");
        assert_eq!(view.address.building_no, "14");
        assert_eq!(view.address.district, "Kadikoy");
        assert_eq!(view.address.province, "Istanbul");
        assert_eq!(view.address.building, "");
    }

    #[test]
    fn test_profile_form_reencodes_address() {
        let form = ProfileForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: String::new(),
            birth_date: String::new(),
            province: "Istanbul".to_string(),
            district: "Kadikoy".to_string(),
            neighborhood: String::new(),
            building: String::new(),
            building_no: "14".to_string(),
            floor: String::new(),
            apartment_unit: String::new(),
            description: "Blue door".to_string(),
        };

        assert_eq!(
            form.address().to_string(),
            "Blue door, No: 14, District: Kadikoy, Province: Istanbul"
        );
    }
}
