//! User model and related types.
//!
//! User rows are owned by the identity collaborator; this server reads them
//! for authentication and loan attribution but never creates or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use crate::error::AppError;

/// Rights levels for a resource class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rights {
    None = 0,
    Read = 1,
    Write = 2,
}

/// User account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Reader,
    Librarian,
    Admin,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Reader => "reader",
            AccountType::Librarian => "librarian",
            AccountType::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reader" => Ok(AccountType::Reader),
            "librarian" => Ok(AccountType::Librarian),
            "admin" => Ok(AccountType::Admin),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

// SQLx conversion for AccountType (stored as text)
impl sqlx::Type<Postgres> for AccountType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AccountType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AccountType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
}

/// Per-resource rights derived from the account type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRights {
    pub catalog_rights: Rights,
    pub loans_rights: Rights,
}

impl UserRights {
    /// Every authenticated caller may edit catalog records; only librarians
    /// and admins hold the mark-returned capability over loans.
    pub fn for_account_type(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Reader => Self {
                catalog_rights: Rights::Write,
                loans_rights: Rights::None,
            },
            AccountType::Librarian | AccountType::Admin => Self {
                catalog_rights: Rights::Write,
                loans_rights: Rights::Write,
            },
        }
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub account_type: AccountType,
    pub rights: UserRights,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks
    pub fn require_write_catalog(&self) -> Result<(), AppError> {
        if self.rights.catalog_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to edit the catalog".to_string()))
        }
    }

    pub fn require_read_loans(&self) -> Result<(), AppError> {
        if self.rights.loans_rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to view loans".to_string()))
        }
    }

    pub fn require_write_loans(&self) -> Result<(), AppError> {
        if self.rights.loans_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to manage loans".to_string()))
        }
    }

    /// Check if user is admin
    pub fn is_admin(&self) -> bool {
        self.account_type == AccountType::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_for(account_type: AccountType) -> UserClaims {
        UserClaims {
            sub: "test".to_string(),
            user_id: 1,
            account_type,
            rights: UserRights::for_account_type(account_type),
            exp: 4_102_444_800,
            iat: 0,
        }
    }

    #[test]
    fn reader_cannot_manage_loans() {
        let claims = claims_for(AccountType::Reader);
        assert!(claims.require_write_catalog().is_ok());
        assert!(claims.require_read_loans().is_err());
        assert!(claims.require_write_loans().is_err());
    }

    #[test]
    fn librarian_can_manage_loans() {
        let claims = claims_for(AccountType::Librarian);
        assert!(claims.require_write_loans().is_ok());
        assert!(!claims.is_admin());
    }

    #[test]
    fn token_round_trip() {
        let claims = claims_for(AccountType::Admin);
        let token = claims.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, claims.user_id);
        assert_eq!(parsed.account_type, AccountType::Admin);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let claims = claims_for(AccountType::Reader);
        let token = claims.create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }
}
