//! Coupon wallet route handler.
//!
//! The page renders each coupon with a server-computed countdown, then
//! a small inline script (carrying the request's CSP nonce) keeps the
//! timers ticking client-side off `data-expires-at` attributes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::api::types::Coupon;
use crate::filters;
use crate::middleware::{CspNonce, RequireAuth};
use crate::state::AppState;

use super::Nav;

/// Remaining time until expiry, split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Decompose the span from `now` to `expiry`, clamped at zero.
fn time_left(expiry: DateTime<Utc>, now: DateTime<Utc>) -> TimeLeft {
    let diff = (expiry - now).num_seconds().max(0);
    TimeLeft {
        days: diff / 86_400,
        hours: (diff / 3_600) % 24,
        minutes: (diff / 60) % 60,
        seconds: diff % 60,
    }
}

/// One coupon prepared for display.
#[derive(Clone)]
pub struct CouponView {
    pub code: String,
    pub rate: u32,
    pub title: String,
    pub description: Option<String>,
    pub expired: bool,
    pub remaining: TimeLeft,
    /// Expiry as Unix milliseconds for the countdown script. `None`
    /// when the backend timestamp cannot be read; the card then shows
    /// as expired and the ticker skips it.
    pub expires_at_ms: Option<i64>,
}

impl CouponView {
    fn from_coupon(coupon: &Coupon, now: DateTime<Utc>) -> Self {
        let expiry = coupon.expiry();
        let expired = expiry.is_none_or(|end| end <= now);
        let remaining = expiry.map_or(
            TimeLeft {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 0,
            },
            |end| time_left(end, now),
        );

        Self {
            code: coupon.code.clone(),
            rate: coupon.discount_rate,
            title: coupon
                .title
                .clone()
                .unwrap_or_else(|| "Limited Offer".to_string()),
            description: coupon.description.clone().filter(|d| !d.is_empty()),
            expired,
            remaining,
            expires_at_ms: expiry.map(|end| end.timestamp_millis()),
        }
    }
}

/// Coupon wallet page template.
#[derive(Template, WebTemplate)]
#[template(path = "coupons/index.html")]
pub struct CouponsTemplate {
    pub nav: Nav,
    pub coupons: Vec<CouponView>,
    pub load_error: bool,
    pub nonce: String,
}

/// Display the signed-in customer's coupons.
#[instrument(skip(state, customer, nonce))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    nonce: CspNonce,
) -> Response {
    let nav = Nav { signed_in: true };
    let now = Utc::now();

    let (coupons, load_error) = match state.api().coupons(customer.id, customer.bearer()).await {
        Ok(list) => {
            let views = list
                .iter()
                .map(|coupon| CouponView::from_coupon(coupon, now))
                .collect();
            (views, false)
        }
        Err(e) => {
            tracing::error!("Failed to fetch coupons: {e}");
            (Vec::new(), true)
        }
    };

    CouponsTemplate {
        nav,
        coupons,
        load_error,
        nonce: nonce.0,
    }
    .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn coupon(expires_at: &str) -> Coupon {
        serde_json::from_str(&format!(
            r#"{{
                "code": "SAVE20",
                "discountRate": 20,
                "expiresAt": "{expires_at}",
                "title": "Back to School",
                "description": "20% off all textbooks!"
            }}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_time_left_decomposition() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let expiry = Utc.with_ymd_and_hms(2025, 9, 3, 5, 7, 9).unwrap();
        let left = time_left(expiry, now);
        assert_eq!(left.days, 2);
        assert_eq!(left.hours, 5);
        assert_eq!(left.minutes, 7);
        assert_eq!(left.seconds, 9);
    }

    #[test]
    fn test_time_left_clamps_at_zero() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let expiry = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let left = time_left(expiry, now);
        assert_eq!(left.days, 0);
        assert_eq!(left.hours, 0);
        assert_eq!(left.minutes, 0);
        assert_eq!(left.seconds, 0);
    }

    #[test]
    fn test_future_coupon_is_live() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let view = CouponView::from_coupon(&coupon("2025-09-10T23:59:59"), now);
        assert!(!view.expired);
        assert_eq!(view.rate, 20);
        assert_eq!(view.remaining.days, 9);
        assert!(view.expires_at_ms.is_some());
    }

    #[test]
    fn test_past_coupon_is_expired() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let view = CouponView::from_coupon(&coupon("2025-08-10T00:00:00"), now);
        assert!(view.expired);
        assert_eq!(view.remaining.days, 0);
    }

    #[test]
    fn test_unreadable_expiry_counts_as_expired() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let view = CouponView::from_coupon(&coupon("soon"), now);
        assert!(view.expired);
        assert_eq!(view.expires_at_ms, None);
    }

    #[test]
    fn test_missing_title_falls_back() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let raw: Coupon = serde_json::from_str(
            r#"{"code": "HALFOFF", "discountRate": 50, "expiresAt": "2025-09-15T23:59:59"}"#,
        )
        .unwrap();
        let view = CouponView::from_coupon(&raw, now);
        assert_eq!(view.title, "Limited Offer");
        assert_eq!(view.description, None);
    }

    #[test]
    fn test_wallet_page_renders_countdown_and_expired_card() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let live = CouponView::from_coupon(&coupon("2025-09-03T05:07:09"), now);
        let dead = CouponView::from_coupon(&coupon("2025-08-01T00:00:00"), now);

        let page = CouponsTemplate {
            nav: Nav { signed_in: true },
            coupons: vec![live, dead],
            load_error: false,
            nonce: "test-nonce".to_string(),
        }
        .render()
        .unwrap();

        assert!(page.contains("Expires in: <strong>2d 5h 7m 9s</strong>"));
        assert!(page.contains("coupon-card coupon-expired"));
        assert!(page.contains("SAVE20"));
        assert!(page.contains(r#"<script nonce="test-nonce">"#));
    }
}
