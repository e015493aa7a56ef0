/*
 * Responsibility
 * - GET /holdings handler
 * - AuthCtx extractor で認証済み user_id を受け、repo 呼び出し → DTO 変換
 * - DB エラーの詳細はクライアントに出さない (500 のみ)
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{dto::holdings::AssetResponse, extractors::AuthCtxExtractor},
    error::AppError,
    repos::holding_repo,
    state::AppState,
};

pub async fn list_holdings(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<AssetResponse>>, AppError> {
    let rows = holding_repo::list_for_user(&state.db, &ctx.user_id).await?;

    let res = rows
        .into_iter()
        .map(|row| AssetResponse {
            symbol: row.symbol,
            name: row.name,
            quantity: row.quantity,
            value: row.value,
            change_24h: row.change_24h,
            allocation: row.allocation,
        })
        .collect();

    Ok(Json(res))
}
