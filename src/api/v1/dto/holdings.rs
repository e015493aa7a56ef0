/*
 * Responsibility
 * - Holdings の response DTO
 * - JSON のフィールド名はダッシュボード側の契約 (change24h) に合わせる
 */
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub value: f64,
    #[serde(rename = "change24h")]
    pub change_24h: f64,
    pub allocation: f64,
}
