/**
 * Responsibility
 *  - extractor 群の公開ポイント
 *  - handlers からは AuthCtx / AuthCtxExtractor だけ見えれば良い
 */
pub mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
