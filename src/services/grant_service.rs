//! Entitlement grants - recording and listing purchases.

use crate::error::AppError;

/// Record that an identity holds an entitlement.
///
/// A conflict-tolerant upsert, not check-then-insert: the UNIQUE
/// (email, entitlement_id) constraint absorbs duplicates, so concurrent
/// duplicate purchases or repeated payment callbacks leave exactly one row
/// and every call reports success.
///
/// Takes any executor so it can run standalone (manual flow) or inside the
/// payment callback's transaction.
pub async fn grant<'a, E>(executor: E, email: &str, entitlement_id: &str) -> Result<(), AppError>
where
    E: sqlx::PgExecutor<'a>,
{
    sqlx::query(
        r#"
        INSERT INTO purchases (email, entitlement_id)
        VALUES ($1, $2)
        ON CONFLICT (email, entitlement_id) DO NOTHING
        "#,
    )
    .bind(email)
    .bind(entitlement_id)
    .execute(executor)
    .await?;

    Ok(())
}

/// All entitlement ids granted to an identity.
///
/// Pure read, used by the authorizer on every request.
pub async fn list_entitlements<'a, E>(executor: E, email: &str) -> Result<Vec<String>, AppError>
where
    E: sqlx::PgExecutor<'a>,
{
    let ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT entitlement_id
        FROM purchases
        WHERE email = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(email)
    .fetch_all(executor)
    .await?;

    Ok(ids)
}
