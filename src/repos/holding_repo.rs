/*
 * Responsibility
 * - holdings/portfolios テーブル向け SQLx 操作
 * - PgPool と認証済み user_id を受け取り、その利用者の保有資産を返す
 * - DB エラーは RepoError に変換して返す
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct AssetRow {
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub value: f64,
    pub change_24h: f64,
    pub allocation: f64,
}

/// Fetch every holding across the user's portfolios.
///
/// `user_id` comes from the verified token, never from request input, so a
/// caller can only ever read their own rows.
pub async fn list_for_user(db: &PgPool, user_id: &str) -> Result<Vec<AssetRow>, RepoError> {
    // TODO: change_24h / allocation are served as 0.0 until the price-history
    // table lands; change_24h needs the previous close per symbol and
    // allocation needs the portfolio's total value in the same query.
    let rows = sqlx::query_as::<_, AssetRow>(
        r#"
        SELECT
            h.symbol,
            h.name,
            h.quantity::float8 AS quantity,
            h.value::float8 AS value,
            0.0::float8 AS change_24h,
            0.0::float8 AS allocation
        FROM holdings h
        JOIN portfolios p ON h.portfolio_id = p.id
        WHERE p.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
