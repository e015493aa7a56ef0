/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開、/holdings は Bearer 必須
 * - Bearer が必要な範囲だけに auth middleware を適用する
 */
use axum::{Router, routing::get};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{health::health, holdings::list_holdings};

pub fn routes(state: AppState) -> Router<AppState> {
    // Failed auth never reaches a handler: the middleware short-circuits
    // inside this sub-router.
    let protected = middleware::auth::access::apply(
        Router::new().route("/holdings", get(list_holdings)),
        state,
    );

    Router::new().route("/health", get(health)).merge(protected)
}
