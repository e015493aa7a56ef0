/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - ここは「型（契約）」として固定化する
 */

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` はトークンの `sub` をそのまま保持する（opaque な識別子）
/// - この型が extensions に存在すること自体が「検証に成功した」ことの証
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: String,
}

impl AuthCtx {
    pub fn new(user_id: String) -> Self {
        Self { user_id }
    }
}
