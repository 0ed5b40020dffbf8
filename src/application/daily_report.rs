// 日次コストレポートユースケース
//
// 昨日の利用コスト・当月実績・月末予測を算出し、JPYに変換してSlackへ通知する。
// いずれかの段階で失敗した場合はレポート全体を中断し、部分的な通知は送らない。

use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{
    self, CostAggregationError, CurrencyError, DailyCostUsage, DailyReportDates, ForecastError,
};
use crate::infrastructure::{
    CostExplorerError, CostGranularity, CostUsageFetcher, ExchangeRatesError,
    ExchangeRatesFetcher, ReportNotifier, SlackError,
};

/// 日次レポートのエラー型
#[derive(Debug, Error)]
pub enum DailyReportError {
    #[error("利用コストの取得に失敗しました: {0}")]
    CostExplorer(#[from] CostExplorerError),
    #[error("利用コストの集計に失敗しました: {0}")]
    Aggregation(#[from] CostAggregationError),
    #[error("予測コストの算出に失敗しました: {0}")]
    Forecast(#[from] ForecastError),
    #[error("為替レートの取得に失敗しました: {0}")]
    ExchangeRates(#[from] ExchangeRatesError),
    #[error("JPYへの変換に失敗しました: {0}")]
    Currency(#[from] CurrencyError),
    #[error("Slack通知に失敗しました: {0}")]
    Notification(#[from] SlackError),
}

/// 日次レポートの実行結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyReportOutcome {
    /// レポートを送信した
    Sent,
    /// 月初のためスキップした
    SkippedFirstDayOfMonth,
}

/// 日次コストレポートユースケース
pub struct DailyCostReport<'a> {
    cost_fetcher: &'a dyn CostUsageFetcher,
    rates_fetcher: &'a dyn ExchangeRatesFetcher,
    notifier: &'a dyn ReportNotifier,
    verbose_logging: bool,
}

impl<'a> DailyCostReport<'a> {
    /// 新しいDailyCostReportを作成
    pub fn new(
        cost_fetcher: &'a dyn CostUsageFetcher,
        rates_fetcher: &'a dyn ExchangeRatesFetcher,
        notifier: &'a dyn ReportNotifier,
        verbose_logging: bool,
    ) -> Self {
        Self {
            cost_fetcher,
            rates_fetcher,
            notifier,
            verbose_logging,
        }
    }

    /// 日次レポートを実行する
    ///
    /// # 処理フロー
    /// 1. 実行日時(JST)から基準日を導出（月初はスキップ）
    /// 2. 昨日・当月のUSD利用コストを取得して集計
    /// 3. 月末コストを線形外挿で予測
    /// 4. 為替レートを取得してJPYへ変換
    /// 5. 整形してSlackへ送信
    pub async fn run(
        &self,
        exec_time: DateTime<FixedOffset>,
    ) -> Result<DailyReportOutcome, DailyReportError> {
        let dates = DailyReportDates::from_execution_time(exec_time);

        if dates.should_skip() {
            info!("月初のため日次レポートをスキップ");
            return Ok(DailyReportOutcome::SkippedFirstDayOfMonth);
        }

        if self.verbose_logging {
            debug!(
                yesterday = %dates.yesterday.start,
                month_start = %dates.month_to_date.start,
                current_day = dates.current_day,
                days_in_month = dates.days_in_month,
                "[1] 基準日を導出"
            );
        }

        let yesterday_amounts = self
            .cost_fetcher
            .fetch_unblended_costs(dates.yesterday, CostGranularity::Daily)
            .await?;
        let yesterday_cost = domain::sum_amounts(&yesterday_amounts)?;

        let actual_amounts = self
            .cost_fetcher
            .fetch_unblended_costs(dates.month_to_date, CostGranularity::Monthly)
            .await?;
        let actual_cost = domain::sum_amounts(&actual_amounts)?;

        let forecast_cost =
            domain::estimate_month_end_cost(actual_cost, dates.current_day, dates.days_in_month)?;

        if self.verbose_logging {
            debug!(
                yesterday_cost = yesterday_cost,
                actual_cost = actual_cost,
                forecast_cost = forecast_cost,
                "[2] USD利用コストを算出"
            );
        }

        let snapshot = self.rates_fetcher.fetch_usd_rates().await?;

        let usage = DailyCostUsage {
            yesterday_cost,
            actual_cost,
            forecast_cost,
        }
        .to_jpy(&snapshot)?;

        if self.verbose_logging {
            debug!(
                yesterday_cost = usage.yesterday_cost,
                actual_cost = usage.actual_cost,
                forecast_cost = usage.forecast_cost,
                "[3] JPYへ変換"
            );
        }

        let payload = domain::format_daily_report(&usage);
        self.notifier.notify(&payload).await?;

        Ok(DailyReportOutcome::Sent)
    }
}
