/// コストレポートLambda関数
///
/// EventBridgeスケジュールからトリガーされ、AWS Cost Explorerの利用コストを
/// USDからJPYへ変換してSlackに通知する。イベントの種別フィールドにより
/// 日次レポートと週次レポートを切り替え、未知の種別は何もせず正常終了する。
use chrono::Utc;
use cost_report::application::{DailyCostReport, JobEvent, ReportKind, WeeklyCostReport};
use cost_report::domain::jst;
use cost_report::infrastructure::{
    AppConfig, AwsCostExplorer, ExchangeRatesClient, SlackNotifier, init_logging,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // 設定はコールドスタート時に一度だけ読み込み、ウォームスタートでは再利用する
    let config = match AppConfig::load().await {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "設定読み込み失敗");
            return Err(err.into());
        }
    };

    let cost_explorer = AwsCostExplorer::from_config().await;

    // Lambda関数を初期化して実行
    let func = service_fn(|event: LambdaEvent<JobEvent>| handler(event, &config, &cost_explorer));
    lambda_runtime::run(func).await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. イベントのレポート種別を判定
/// 2. 実行日時をJSTで捕捉
/// 3. 種別に応じた通知先へレポートを実行
///
/// 失敗した場合はエラーを返し、プラットフォーム側に失敗として記録させる
/// （再試行はスケジュール実行に委ねる）。
async fn handler(
    event: LambdaEvent<JobEvent>,
    config: &AppConfig,
    cost_explorer: &AwsCostExplorer,
) -> Result<(), Error> {
    let kind = event.payload.kind;

    // 実行日時はハンドラ開始時に一度だけ捕捉し、以降の日付導出すべての起点とする
    let exec_time = Utc::now().with_timezone(&jst());

    let rates_client =
        ExchangeRatesClient::new(&config.exchange_rates_app_id, config.base_currency);

    match kind {
        ReportKind::Daily => {
            let notifier =
                SlackNotifier::new(&config.slack.daily_webhook_url, &config.service_name);
            let usecase =
                DailyCostReport::new(cost_explorer, &rates_client, &notifier, config.logging);

            if let Err(err) = usecase.run(exec_time).await {
                error!(error = %err, "日次コストレポートの実行に失敗");
                return Err(err.into());
            }
            info!("日次コストレポートを完了");
        }

        ReportKind::Weekly => {
            let notifier =
                SlackNotifier::new(&config.slack.weekly_webhook_url, &config.service_name);
            let usecase =
                WeeklyCostReport::new(cost_explorer, &rates_client, &notifier, config.logging);

            if let Err(err) = usecase.run(exec_time).await {
                error!(error = %err, "週次コストレポートの実行に失敗");
                return Err(err.into());
            }
            info!("週次コストレポートを完了");
        }

        ReportKind::Unknown => {
            debug!("未知のイベント種別のためスキップ");
        }
    }

    Ok(())
}
