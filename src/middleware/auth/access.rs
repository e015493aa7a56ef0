//! access token (JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を検証し、sub を user_id として AuthCtx に入れる
//! - ヘッダが無い / `Bearer ` で始まらない場合は、検証器に渡す前に 401 で打ち切る
//! - 失敗したリクエストには AuthCtx を一切入れない (handler 側は extractor で 401 になる)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// 認証を掛けたい Router に middleware を適用する。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/holdings", get(list_holdings));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Header shape is checked here; everything about the token itself is the
    // verifier's job.
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    // 署名・alg・exp・sub の検証は AuthService 側で実施
    let verified = match state.auth.verify_subject(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(
                error = ?err,
                "access token verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(verified.user_id));

    Ok(next.run(req).await)
}
