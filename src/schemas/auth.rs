use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Account;
use crate::db::types::AccountRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AccountResponse {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) role: AccountRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
}

impl AccountResponse {
    pub(crate) fn from_db(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            role: account.role,
            is_active: account.is_active,
            created_at: format_primitive(account.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) account: AccountResponse,
}
