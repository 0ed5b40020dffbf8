// Slack通知モジュール
//
// Incoming Webhookへ整形済みレポートを送信する。送信は1回のみで、
// 失敗した場合はそのまま呼び出し元へエラーを返す。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::domain::ReportPayload;

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Slack通知のエラー型
#[derive(Debug, Error)]
pub enum SlackError {
    /// ネットワークエラー
    #[error("Slackへの送信に失敗しました: {0}")]
    Network(String),
    /// HTTPエラーレスポンス
    #[error("Slack Webhookエラー: status={0}")]
    HttpStatus(u16),
}

/// Webhookメッセージ本体
#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    username: &'a str,
    text: &'a str,
    attachments: Vec<Attachment<'a>>,
}

/// メッセージ添付（本文はpretextとして表示）
#[derive(Debug, Serialize)]
struct Attachment<'a> {
    pretext: &'a str,
}

/// レポート通知のトレイト（テスト用の抽象化）
#[async_trait]
pub trait ReportNotifier: Send + Sync {
    /// レポートを通知する
    async fn notify(&self, payload: &ReportPayload) -> Result<(), SlackError>;
}

/// Slack Incoming Webhookを使用した実装
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
    username: String,
}

impl std::fmt::Debug for SlackNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Webhook URLは秘匿情報のため出力しない
        f.debug_struct("SlackNotifier")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl SlackNotifier {
    /// 新しいSlackNotifierを作成
    ///
    /// usernameは通知メッセージの送信者名として表示される（サービス名を渡す）。
    pub fn new(webhook_url: impl Into<String>, username: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("HTTPクライアントの構築に失敗");

        Self {
            client,
            webhook_url: webhook_url.into(),
            username: username.into(),
        }
    }
}

#[async_trait]
impl ReportNotifier for SlackNotifier {
    async fn notify(&self, payload: &ReportPayload) -> Result<(), SlackError> {
        let message = WebhookMessage {
            username: &self.username,
            text: &payload.title,
            attachments: vec![Attachment {
                pretext: &payload.body,
            }],
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| SlackError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SlackError::HttpStatus(status.as_u16()));
        }

        info!(title = %payload.title, "Slackへレポートを送信");
        Ok(())
    }
}
