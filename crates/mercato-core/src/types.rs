//! # Domain Types
//!
//! Core domain types for the Mercato retail-sales dataset.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │     Product     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (serial)    │   │  id (serial)    │   │  id (serial)    │       │
//! │  │  email (uniq)   │   │  name (uniq)    │   │  branch, city   │       │
//! │  │  phone (uniq)   │   │  unit_price     │   │  customer_id?   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   SaleDetail    │   │      User       │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  (sale_id,      │   │  id (serial)    │                             │
//! │  │   product_id)   │   │  role flags ×5  │                             │
//! │  │  quantity       │   │  password hash  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity carries `created_at`/`updated_at` assigned by the store:
//! `created_at` is immutable, `updated_at` refreshes on every write.
//!
//! Each entity has a `New*` add-shape: the payload accepted by the `add`
//! and `bulk_insert` endpoints (no id, no timestamps), with a `validate`
//! method enforcing the business rules before anything touches the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::roles::RoleSet;
use crate::validation::{
    validate_date_of_birth, validate_email, validate_password, validate_phone_number,
    validate_quantity, validate_text, validate_unit_price,
};

// =============================================================================
// Customer
// =============================================================================

/// A customer of the retail chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub phone_number: String,
    pub gender: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Add-shape for [`Customer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub phone_number: String,
    pub gender: String,
}

impl NewCustomer {
    /// Validates the payload against the customer business rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text("first_name", &self.first_name)?;
        validate_text("last_name", &self.last_name)?;
        validate_date_of_birth(self.date_of_birth)?;
        validate_email(&self.email)?;
        validate_phone_number(&self.phone_number)?;
        validate_text("gender", &self.gender)?;
        Ok(())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub product_name: String,
    pub product_description: Option<String>,
    pub product_category: String,
    pub unit_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Add-shape for [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    #[serde(default)]
    pub product_description: Option<String>,
    pub product_category: String,
    pub unit_price: f64,
}

impl NewProduct {
    /// Validates the payload against the product business rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text("product_name", &self.product_name)?;
        validate_text("product_category", &self.product_category)?;
        validate_unit_price(self.unit_price)?;
        Ok(())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One sale transaction header.
///
/// `customer_id` is nullable: deleting a customer record may orphan the
/// sale, which is allowed by the data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub branch: String,
    pub city: String,
    pub customer_type: String,
    pub customer_id: Option<i64>,
    pub sale_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Add-shape for [`Sale`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub branch: String,
    pub city: String,
    pub customer_type: String,
    #[serde(default)]
    pub customer_id: Option<i64>,
    pub sale_date: NaiveDate,
}

impl NewSale {
    /// Validates the payload against the sale business rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text("branch", &self.branch)?;
        validate_text("city", &self.city)?;
        validate_text("customer_type", &self.customer_type)?;
        Ok(())
    }
}

/// A sale joined with the total value of its line items.
///
/// `total_amount` is `SUM(unit_price * quantity)` over the sale's line
/// items, `0` when the sale has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleWithTotal {
    pub id: i64,
    pub branch: String,
    pub city: String,
    pub customer_type: String,
    pub customer_id: Option<i64>,
    pub sale_date: NaiveDate,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale line item
// =============================================================================

/// One line of a sale: a product and its quantity.
///
/// Identity is the composite `(sale_id, product_id)`; there is no surrogate
/// id column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleDetail {
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Add-shape for [`SaleDetail`]. A missing quantity defaults to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSaleDetail {
    pub sale_id: i64,
    pub product_id: i64,
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl NewSaleDetail {
    /// Validates the payload against the line-item business rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_quantity(self.quantity.unwrap_or(0))?;
        Ok(())
    }
}

/// One line of the "full bill" aggregate: the line item joined with its
/// product's name and price, plus the computed line total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BillLine {
    pub sale_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub line_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// A backend user account.
///
/// `password` holds the argon2 PHC hash, never the plain password. The five
/// role flags are independent; see [`crate::roles`] for how they combine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub phone_number: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub is_user: bool,
    pub is_vendor: bool,
    pub is_analyst: bool,
    pub is_admin: bool,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Folds the flag columns into a [`RoleSet`].
    pub fn roles(&self) -> RoleSet {
        RoleSet::from_flags(
            self.is_user,
            self.is_vendor,
            self.is_analyst,
            self.is_admin,
            self.is_super_admin,
        )
    }
}

/// Add-shape for [`User`]: the register/add payload.
///
/// `password` is the plain password here; the HTTP layer hashes it before
/// the row is written. Role flags take their column defaults
/// (`is_user = true`, everything else false).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub phone_number: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl NewUser {
    /// Validates the payload against the user business rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_phone_number(&self.phone_number)?;
        validate_email(&self.email)?;
        validate_text("first_name", &self.first_name)?;
        validate_text("last_name", &self.last_name)?;
        validate_password(&self.password)?;
        Ok(())
    }
}

/// Public projection of a [`User`]: what `/users/me` returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        UserPublic {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone(),
            email: user.email.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_customer() -> NewCustomer {
        NewCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: Utc::now().date_naive() - Duration::days(365 * 30),
            email: "ada@example.com".to_string(),
            phone_number: "+15551234567".to_string(),
            gender: "Female".to_string(),
        }
    }

    #[test]
    fn test_new_customer_validate() {
        assert!(new_customer().validate().is_ok());

        let mut future_birth = new_customer();
        future_birth.date_of_birth = Utc::now().date_naive() + Duration::days(1);
        assert!(future_birth.validate().is_err());

        let mut bad_email = new_customer();
        bad_email.email = "nope".to_string();
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_new_product_validate() {
        let product = NewProduct {
            product_name: "Espresso Beans 1kg".to_string(),
            product_description: None,
            product_category: "Groceries".to_string(),
            unit_price: 12.50,
        };
        assert!(product.validate().is_ok());

        let negative = NewProduct {
            unit_price: -1.0,
            ..product
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_new_sale_detail_defaults_quantity() {
        let detail = NewSaleDetail {
            sale_id: 1,
            product_id: 1,
            quantity: None,
        };
        assert!(detail.validate().is_ok());

        let negative = NewSaleDetail {
            quantity: Some(-5),
            ..detail
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_user_roles_fold_flags() {
        use crate::roles::Capability;

        let user = User {
            id: 1,
            phone_number: "+15551234567".to_string(),
            email: "ops@example.com".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            password: "$argon2id$fake".to_string(),
            is_user: true,
            is_vendor: false,
            is_analyst: true,
            is_admin: false,
            is_super_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(user.roles().grants(Capability::ViewAnalytics));
        assert!(!user.roles().grants(Capability::Administer));
    }

    #[test]
    fn test_user_public_projection_drops_hash() {
        let user = User {
            id: 7,
            phone_number: "+15551234567".to_string(),
            email: "ops@example.com".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            password: "$argon2id$fake".to_string(),
            is_user: true,
            is_vendor: false,
            is_analyst: false,
            is_admin: false,
            is_super_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let public = UserPublic::from(&user);
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("ops@example.com"));
    }
}
