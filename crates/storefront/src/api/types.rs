//! Records the backend exchanges with the storefront.
//!
//! Field names mirror the backend's camelCase JSON via serde renames.
//! Nothing here is persisted locally; every value is just the most
//! recent response.

use bookstore_core::{AuthorId, BookId, CartItemId, CouponId, CustomerId, Price, PublisherId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book as the catalog returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author_id: AuthorId,
    pub publisher_id: PublisherId,
    pub price: Price,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub genre: String,
    /// Publication date, passed through as the backend formats it.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub book_image_url: String,
}

/// Author record from the JSON fallback endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: AuthorId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Author {
    /// `first last`, trimmed; empty when the record has no names.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A customer's account record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub id: CustomerId,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address in the single-string wire form.
    #[serde(default)]
    pub address: Option<String>,
    /// `YYYY-MM-DD`, sometimes with a time suffix the backend appends.
    #[serde(default)]
    pub birth_date: Option<String>,
}

/// Profile fields the customer may change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub birth_date: String,
}

/// New-account payload for the register endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub birth_date: String,
}

/// Success payload from login and register.
///
/// The backend is inconsistent about the id field name, so both
/// `customerId` and `id` are accepted, preferring the former.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    customer_id: Option<CustomerId>,
    #[serde(default)]
    id: Option<CustomerId>,
    #[serde(default)]
    pub token: Option<String>,
}

impl AuthResponse {
    /// The signed-in customer's id, whichever field carried it.
    #[must_use]
    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id.or(self.id)
    }
}

/// A line in the customer's cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    #[serde(default)]
    pub book_id: Option<BookId>,
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub price: Price,
    /// Quantity of this line; the backend calls it `amount`.
    #[serde(rename = "amount")]
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.line_total(self.quantity)
    }
}

/// A discount coupon granted to the customer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(default)]
    pub id: Option<CouponId>,
    pub code: String,
    pub discount_rate: u32,
    pub expires_at: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Coupon {
    /// Parse the expiry timestamp.
    ///
    /// The backend is loose about formats: RFC 3339 first, then a bare
    /// datetime, then a bare date (treated as end of that day), all read
    /// as UTC. `None` when nothing matches.
    #[must_use]
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        let raw = self.expires_at.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.and_hms_opt(23, 59, 59).map(|end| end.and_utc());
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_book_deserializes_backend_field_names() {
        let json = r#"{
            "id": 12,
            "title": "Dune",
            "authorId": 3,
            "publisherId": 7,
            "price": 129.5,
            "format": "PAPERBACK",
            "language": "ENGLISH",
            "genre": "SCIENCE_FICTION",
            "date": "1965-08-01",
            "pageNumber": 412,
            "isbn": "9780441013593",
            "stock": 14,
            "bookImageUrl": "https://cdn.example.com/dune.jpg"
        }"#;

        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.id, BookId::new(12));
        assert_eq!(book.author_id, AuthorId::new(3));
        assert_eq!(book.page_number, 412);
        assert_eq!(book.price.to_string(), "129.50 TL");
    }

    #[test]
    fn test_book_tolerates_sparse_listing_payloads() {
        let json = r#"{"id": 1, "title": "Dune", "authorId": 3, "publisherId": 7, "price": 10}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.genre, "");
        assert_eq!(book.stock, 0);
    }

    #[test]
    fn test_author_display_name_trims_missing_parts() {
        let author: Author = serde_json::from_str(r#"{"id": 1, "lastName": "Herbert"}"#).unwrap();
        assert_eq!(author.display_name(), "Herbert");

        let author: Author =
            serde_json::from_str(r#"{"id": 1, "firstName": "Frank", "lastName": "Herbert"}"#)
                .unwrap();
        assert_eq!(author.display_name(), "Frank Herbert");

        let author: Author = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(author.display_name(), "");
    }

    #[test]
    fn test_auth_response_prefers_customer_id_field() {
        let both: AuthResponse =
            serde_json::from_str(r#"{"customerId": 7, "id": 99, "token": "abc"}"#).unwrap();
        assert_eq!(both.customer_id(), Some(CustomerId::new(7)));
        assert_eq!(both.token.as_deref(), Some("abc"));

        let id_only: AuthResponse = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        assert_eq!(id_only.customer_id(), Some(CustomerId::new(9)));
        assert!(id_only.token.is_none());

        let neither: AuthResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(neither.customer_id(), None);
    }

    #[test]
    fn test_cart_item_amount_field_and_line_total() {
        let json = r#"{"id": 4, "bookId": 12, "title": "Dune", "author": "Frank Herbert", "price": 12.5, "amount": 3}"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.line_total().to_string(), "37.50 TL");
    }

    #[test]
    fn test_coupon_expiry_accepts_backend_formats() {
        let mut coupon: Coupon = serde_json::from_str(
            r#"{"code": "SAVE20", "discountRate": 20, "expiresAt": "2025-09-10T23:59:59"}"#,
        )
        .unwrap();
        let expiry = coupon.expiry().unwrap();
        assert_eq!(expiry.hour(), 23);

        coupon.expires_at = "2025-09-10T23:59:59Z".to_string();
        assert!(coupon.expiry().is_some());

        coupon.expires_at = "2025-09-10".to_string();
        let expiry = coupon.expiry().unwrap();
        assert_eq!((expiry.hour(), expiry.minute()), (23, 59));

        coupon.expires_at = "whenever".to_string();
        assert!(coupon.expiry().is_none());
    }

    #[test]
    fn test_customer_profile_optional_fields_default() {
        let json = r#"{"id": 5, "email": "ada@example.com", "firstName": "Ada", "lastName": "Lovelace"}"#;
        let profile: CustomerProfile = serde_json::from_str(json).unwrap();
        assert!(profile.address.is_none());
        assert!(profile.birth_date.is_none());
    }
}
