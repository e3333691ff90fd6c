//! Write payloads sent to the backend.
//!
//! Each form-backed payload has a `validate` method mirroring the
//! required-field checks done before submission. Everything else is left to
//! the server, which answers with a validation error when it disagrees.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::email::Email;
use super::id::{CategoryId, ProductId};
use super::status::{OrderStatus, Role};

fn require(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{field} is required"));
    }
}

fn finish(errors: Vec<String>) -> Result<(), String> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

/// Login form.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration form.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub password_confirmation: String,
}

impl Registration {
    /// Minimum password length accepted by the form.
    pub const MIN_PASSWORD_LENGTH: usize = 8;

    /// # Errors
    ///
    /// Returns the joined list of field problems.
    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        if self.password.len() < Self::MIN_PASSWORD_LENGTH {
            errors.push(format!(
                "password must be at least {} characters",
                Self::MIN_PASSWORD_LENGTH
            ));
        }
        if self.password != self.password_confirmation {
            errors.push("password confirmation does not match".to_owned());
        }
        finish(errors)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Admin product form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub category_id: CategoryId,
}

impl ProductInput {
    /// # Errors
    ///
    /// Returns the joined list of field problems.
    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        if self.price.is_sign_negative() {
            errors.push("price must not be negative".to_owned());
        }
        if self.stock < 0 {
            errors.push("stock must not be negative".to_owned());
        }
        finish(errors)
    }

    /// Text fields of a multipart submission, in a stable order.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("price", self.price.to_string()),
            ("stock", self.stock.to_string()),
            ("category_id", self.category_id.to_string()),
        ];
        if let Some(description) = &self.description {
            fields.push(("description", description.clone()));
        }
        fields
    }
}

/// Admin category form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
}

impl CategoryInput {
    /// Build a category input, deriving the slug from the name when blank.
    #[must_use]
    pub fn new(name: &str, slug: Option<&str>) -> Self {
        let slug = slug
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| Self::slug_from_name(name), str::to_owned);
        Self {
            name: name.trim().to_owned(),
            slug,
        }
    }

    /// Lowercase the name and collapse runs of other characters into `-`.
    #[must_use]
    pub fn slug_from_name(name: &str) -> String {
        let mut slug = String::with_capacity(name.len());
        for c in name.trim().chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        slug
    }

    /// # Errors
    ///
    /// Returns the joined list of field problems.
    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "slug", &self.slug);
        finish(errors)
    }
}

/// Admin user form. `password` is only sent when set.
#[derive(Clone, Serialize)]
pub struct UserInput {
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl UserInput {
    /// # Errors
    ///
    /// Returns the joined list of field problems.
    pub fn validate(&self, creating: bool) -> Result<(), String> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        if creating && self.password.as_deref().is_none_or(str::is_empty) {
            errors.push("password is required".to_owned());
        }
        finish(errors)
    }
}

impl fmt::Debug for UserInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Profile edit form for the signed-in user.
#[derive(Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProfileUpdate {
    /// True when no field would be sent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.password.is_none()
    }
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Add-to-cart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartLineInput {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Cart line quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantityUpdate {
    pub quantity: i64,
}

/// Admin order status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}
