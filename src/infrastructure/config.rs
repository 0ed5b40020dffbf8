// 設定モジュール
//
// 環境変数とAWS Secrets Managerからプロセス起動時に一度だけ設定を読み込み、
// 不変の構造体としてハンドラへ受け渡す（グローバル状態は持たない）。
// ウォームスタート時は同じプロセスの設定が再利用されるが、実行環境は
// いつ破棄されてもよいため、正しさはこのキャッシュに依存しない。

use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use serde::Deserialize;
use thiserror::Error;
use tokio::time::timeout;
use tracing::warn;

use crate::domain::CurrencyCode;

/// AWSリージョン（東京固定）
const AWS_REGION: &str = "ap-northeast-1";

/// 設定読み込み全体のタイムアウト（秒）
const LOAD_TIMEOUT_SECS: u64 = 5;

/// Open Exchange Rates APIキーのシークレット名
const EXCHANGE_RATES_SECRET: &str = "exchange-rates/app-id";

/// Slack Webhook設定のシークレット名
const SLACK_CONFIG_SECRET: &str = "slack/config";

/// 設定読み込みのエラー型
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須のシークレットが取得できない
    #[error("シークレットが取得できません: {0}")]
    MissingSecret(String),
    /// Slack設定JSONの解析エラー
    #[error("Slack設定の解析に失敗しました: {0}")]
    MalformedSlackConfig(String),
    /// 基軸通貨が無効（USDのみ指定可）
    #[error("無効な基軸通貨です: {0}")]
    InvalidBaseCurrency(String),
    /// AWS SDK エラー
    #[error("AWS Secrets Manager APIエラー: {0}")]
    AwsSdkError(String),
    /// 読み込みタイムアウト
    #[error("設定読み込みがタイムアウトしました")]
    Timeout,
}

/// Slack Webhook設定（Secrets ManagerにJSONで登録）
#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    /// 日次レポート用Webhook URL
    pub daily_webhook_url: String,
    /// 週次レポート用Webhook URL
    pub weekly_webhook_url: String,
}

/// アプリケーション設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 環境名 (ENV環境変数、デフォルト: dev)
    pub env: String,
    /// サービス名 (SERVICE_NAME環境変数、デフォルト: cost-report)
    pub service_name: String,
    /// 詳細ログ出力フラグ (LOGGING環境変数、on|off)
    pub logging: bool,
    /// 為替レートAPIの基軸通貨（USDのみ有効）
    pub base_currency: CurrencyCode,
    /// Slack Webhook設定
    pub slack: SlackConfig,
    /// Open Exchange Rates APIキー
    pub exchange_rates_app_id: String,
}

impl AppConfig {
    /// 環境変数とSecrets Managerから設定を読み込む
    ///
    /// 5秒のタイムアウト内に完了しない場合はエラー。
    pub async fn load() -> Result<Self, ConfigError> {
        timeout(Duration::from_secs(LOAD_TIMEOUT_SECS), Self::load_inner())
            .await
            .map_err(|_| ConfigError::Timeout)?
    }

    async fn load_inner() -> Result<Self, ConfigError> {
        let env = env_or("ENV", "dev");
        let service_name = env_or("SERVICE_NAME", "cost-report");
        let logging = env_or("LOGGING", "off") == "on";
        let base_currency = parse_base_currency(&env_or("BASE_CURRENCY", "USD"))?;

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(AWS_REGION))
            .load()
            .await;
        let client = SecretsManagerClient::new(&aws_config);

        let secrets = Secrets::fetch(&client, &service_name, &env).await?;

        Ok(Self {
            env,
            service_name,
            logging,
            base_currency,
            slack: secrets.slack,
            exchange_rates_app_id: secrets.exchange_rates_app_id,
        })
    }

    /// 明示的な値で設定を作成（テスト用）
    pub fn new(
        env: impl Into<String>,
        service_name: impl Into<String>,
        logging: bool,
        slack: SlackConfig,
        exchange_rates_app_id: impl Into<String>,
    ) -> Self {
        Self {
            env: env.into(),
            service_name: service_name.into(),
            logging,
            base_currency: CurrencyCode::Usd,
            slack,
            exchange_rates_app_id: exchange_rates_app_id.into(),
        }
    }
}

/// 環境変数を読み込む（未設定・空文字はデフォルト値）
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// 基軸通貨を検証付きで解釈する（USD以外は起動時エラー）
fn parse_base_currency(value: &str) -> Result<CurrencyCode, ConfigError> {
    CurrencyCode::parse(value)
        .filter(CurrencyCode::is_valid_base)
        .ok_or_else(|| ConfigError::InvalidBaseCurrency(value.to_string()))
}

/// シークレットID: {service}/{env}/{name}
fn secret_id(service: &str, env: &str, name: &str) -> String {
    format!("{}/{}/{}", service, env, name)
}

/// Secrets Managerから取得するシークレットの組
struct Secrets {
    slack: SlackConfig,
    exchange_rates_app_id: String,
}

impl Secrets {
    /// BatchGetSecretValueで2つのシークレットをまとめて取得する
    async fn fetch(
        client: &SecretsManagerClient,
        service: &str,
        env: &str,
    ) -> Result<Self, ConfigError> {
        let exchange_rates_id = secret_id(service, env, EXCHANGE_RATES_SECRET);
        let slack_id = secret_id(service, env, SLACK_CONFIG_SECRET);

        let output = client
            .batch_get_secret_value()
            .secret_id_list(&exchange_rates_id)
            .secret_id_list(&slack_id)
            .send()
            .await
            .map_err(|e| ConfigError::AwsSdkError(e.to_string()))?;

        let mut slack: Option<SlackConfig> = None;
        let mut app_id: Option<String> = None;

        for secret in output.secret_values() {
            let (Some(name), Some(value)) = (secret.name(), secret.secret_string()) else {
                continue;
            };

            if name == slack_id {
                slack = Some(parse_slack_config(value)?);
            } else if name == exchange_rates_id {
                app_id = Some(value.to_string());
            } else {
                warn!(env = env, secret_name = name, "未知のシークレット名");
            }
        }

        Ok(Self {
            slack: slack.ok_or(ConfigError::MissingSecret(slack_id))?,
            exchange_rates_app_id: app_id.ok_or(ConfigError::MissingSecret(exchange_rates_id))?,
        })
    }
}

/// Slack設定はJSONで登録されているため構造体へマッピングする
fn parse_slack_config(value: &str) -> Result<SlackConfig, ConfigError> {
    serde_json::from_str(value).map_err(|e| ConfigError::MalformedSlackConfig(e.to_string()))
}
