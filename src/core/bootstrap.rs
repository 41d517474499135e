use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::AccountRole;
use crate::repositories;

pub(crate) async fn ensure_admin_account(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD not configured; skipping admin bootstrap");
        return Ok(());
    }

    let email = &admin.first_superuser_email;
    let existing = repositories::accounts::find_by_email(state.db(), email).await?;
    let now = primitive_now_utc();

    if let Some(account) = existing {
        let password_ok =
            security::verify_password(&admin.first_superuser_password, &account.hashed_password)
                .unwrap_or(false);

        if password_ok && account.role == AccountRole::Admin && account.is_active {
            tracing::info!("Default admin account already up to date");
            return Ok(());
        }

        let hashed_password = if password_ok {
            account.hashed_password.clone()
        } else {
            security::hash_password(&admin.first_superuser_password)?
        };

        sqlx::query(
            "UPDATE accounts
             SET hashed_password = $1, role = $2, is_active = TRUE, updated_at = $3
             WHERE id = $4",
        )
        .bind(hashed_password)
        .bind(AccountRole::Admin)
        .bind(now)
        .bind(&account.id)
        .execute(state.db())
        .await?;

        tracing::info!("Updated default admin account {email}");
        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_superuser_password)?;

    repositories::accounts::create(
        state.db(),
        repositories::accounts::CreateAccount {
            id: &Uuid::new_v4().to_string(),
            email,
            hashed_password,
            role: AccountRole::Admin,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    tracing::info!("Created default admin account {email}");
    Ok(())
}
