use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::RepresentativeId;
use crate::utils::validation::{DNI_PATTERN, NAME_PATTERN, PHONE_PATTERN};

/// Legal guardian linked to one or more minor athletes
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Representative {
    pub id: RepresentativeId,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Nested representative block of a minor-athlete registration.
/// Every field is mandatory; a failing field rejects the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RepresentativeInput {
    #[validate(
        length(min = 2, max = 100, message = "First name must be between 2 and 100 characters"),
        regex(path = *NAME_PATTERN, message = "First name may only contain letters and spaces")
    )]
    pub first_name: String,

    #[validate(
        length(min = 2, max = 100, message = "Last name must be between 2 and 100 characters"),
        regex(path = *NAME_PATTERN, message = "Last name may only contain letters and spaces")
    )]
    pub last_name: String,

    #[validate(
        length(min = 8, max = 20, message = "DNI must be between 8 and 20 characters"),
        regex(path = *DNI_PATTERN, message = "DNI may only contain letters, digits and hyphens")
    )]
    pub dni: String,

    #[validate(length(min = 5, max = 255, message = "Address must be between 5 and 255 characters"))]
    pub address: String,

    #[validate(
        length(min = 7, max = 20, message = "Phone must be between 7 and 20 characters"),
        regex(path = *PHONE_PATTERN, message = "Phone may only contain digits, spaces, hyphens, parentheses and plus")
    )]
    pub phone: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Representative for database insertion
#[derive(Debug, Clone)]
pub struct NewRepresentative {
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl From<RepresentativeInput> for NewRepresentative {
    fn from(input: RepresentativeInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            dni: input.dni,
            address: input.address,
            phone: input.phone,
            email: input.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> RepresentativeInput {
        RepresentativeInput {
            first_name: "María José".to_string(),
            last_name: "Pérez".to_string(),
            dni: "87654321".to_string(),
            address: "Av. Universitaria 123".to_string(),
            phone: "+593 99 123 4567".to_string(),
            email: "maria.perez@example.com".to_string(),
        }
    }

    #[test]
    fn valid_representative_passes() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn short_address_fails() {
        let mut input = valid_input();
        input.address = "x".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn bad_email_fails() {
        let mut input = valid_input();
        input.email = "not-an-email".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn phone_with_letters_fails() {
        let mut input = valid_input();
        input.phone = "09912call34".to_string();
        assert!(input.validate().is_err());
    }
}
