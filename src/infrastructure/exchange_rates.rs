// Open Exchange Rates APIクライアント
//
// USDを基軸とした為替レートスナップショットをHTTP GETで取得する。
// 再試行は行わず、失敗はそのまま呼び出し元へ返す（次回のスケジュール
// 実行が唯一のリトライ機構）。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::domain::{CurrencyCode, ExchangeRateSnapshot};

/// Open Exchange Rates APIのベースURL
const BASE_URL: &str = "https://openexchangerates.org/api";

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// 為替レート取得のエラー型
#[derive(Debug, Error)]
pub enum ExchangeRatesError {
    /// 基軸通貨が無効（USD以外は指定不可）
    #[error("無効な基軸通貨です: {0}")]
    InvalidBaseCurrency(String),
    /// HTTPエラーレスポンス（200以外）
    #[error("為替レートの取得に失敗しました: status={0}")]
    HttpStatus(u16),
    /// ネットワークエラー
    #[error("為替レートAPIへの接続に失敗しました: {0}")]
    Network(String),
    /// レスポンス解析エラー
    #[error("為替レートAPIレスポンスの解析に失敗しました: {0}")]
    Decode(String),
}

/// Open Exchange Rates APIのレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRatesResponse {
    #[serde(default)]
    pub disclaimer: String,
    #[serde(default)]
    pub license: String,
    pub timestamp: i64,
    pub base: String,
    pub rates: HashMap<String, f64>,
}

impl ExchangeRatesResponse {
    /// ドメイン層のスナップショットへ変換する
    pub fn into_snapshot(self) -> ExchangeRateSnapshot {
        ExchangeRateSnapshot::new(self.rates)
    }
}

/// 為替レート取得のトレイト（テスト用の抽象化）
#[async_trait]
pub trait ExchangeRatesFetcher: Send + Sync {
    /// USDを基軸としたレートスナップショットを取得する
    async fn fetch_usd_rates(&self) -> Result<ExchangeRateSnapshot, ExchangeRatesError>;
}

/// Open Exchange Rates APIを使用した実装
pub struct ExchangeRatesClient {
    client: Client,
    base_url: String,
    app_id: String,
    base_currency: CurrencyCode,
}

impl std::fmt::Debug for ExchangeRatesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRatesClient")
            .field("base_url", &self.base_url)
            .field("base_currency", &self.base_currency)
            .finish_non_exhaustive()
    }
}

impl ExchangeRatesClient {
    /// 新しいExchangeRatesClientを作成
    pub fn new(app_id: impl Into<String>, base_currency: CurrencyCode) -> Self {
        Self::with_base_url(BASE_URL, app_id, base_currency)
    }

    /// ベースURLを指定して作成（テスト用）
    pub fn with_base_url(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        base_currency: CurrencyCode,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("HTTPクライアントの構築に失敗");

        Self {
            client,
            base_url: base_url.into(),
            app_id: app_id.into(),
            base_currency,
        }
    }

    /// レート取得エンドポイントURLを構築
    fn latest_url(&self) -> String {
        format!(
            "{}/latest.json?app_id={}&base={}&symbols={}",
            self.base_url.trim_end_matches('/'),
            self.app_id,
            self.base_currency.as_str(),
            CurrencyCode::Jpy.as_str(),
        )
    }
}

#[async_trait]
impl ExchangeRatesFetcher for ExchangeRatesClient {
    /// 為替レートを取得する
    ///
    /// 基軸通貨はUSD固定、取得対象はJPYのみ。200以外のステータスはエラー。
    async fn fetch_usd_rates(&self) -> Result<ExchangeRateSnapshot, ExchangeRatesError> {
        // 設定読み込み時にも検証しているが、ここでも基軸通貨を強制する
        if !self.base_currency.is_valid_base() {
            return Err(ExchangeRatesError::InvalidBaseCurrency(
                self.base_currency.as_str().to_string(),
            ));
        }

        let response = self
            .client
            .get(self.latest_url())
            .send()
            .await
            .map_err(|e| ExchangeRatesError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ExchangeRatesError::HttpStatus(status.as_u16()));
        }

        let body: ExchangeRatesResponse = response
            .json()
            .await
            .map_err(|e| ExchangeRatesError::Decode(e.to_string()))?;

        debug!(base = %body.base, timestamp = body.timestamp, "為替レートを取得");

        Ok(body.into_snapshot())
    }
}
