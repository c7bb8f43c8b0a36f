use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default role assigned at registration.
pub const ROLE_CUSTOMER: &str = "customer";
/// Elevated role recognized by role checks. The role set is open-ended.
pub const ROLE_ADMIN: &str = "admin";

/// User entity - a storefront account.
///
/// `password_hash` is the Argon2 PHC string and must never leave the backend;
/// wire types carry only the public fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new customer account with generated ID and timestamps.
    pub fn register(
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            first_name,
            last_name,
            phone: String::new(),
            role: ROLE_CUSTOMER.to_string(),
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}
