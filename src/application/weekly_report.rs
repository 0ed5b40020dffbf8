// 週次コストレポートユースケース
//
// 先週・先々週の利用コストと増減率を算出し、JPYに変換してSlackへ通知する。
// 増減率は為替変換前のUSD金額から計算する（変換後の計算とは浮動小数点の
// 丸めにより結果が一致しないため、この順序を維持する）。

use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use tracing::debug;

use crate::domain::{
    self, CostAggregationError, CurrencyError, WeeklyCostUsage, WeeklyReportDates,
};
use crate::infrastructure::{
    CostExplorerError, CostGranularity, CostUsageFetcher, ExchangeRatesError,
    ExchangeRatesFetcher, ReportNotifier, SlackError,
};

/// 週次レポートのエラー型
#[derive(Debug, Error)]
pub enum WeeklyReportError {
    #[error("利用コストの取得に失敗しました: {0}")]
    CostExplorer(#[from] CostExplorerError),
    #[error("利用コストの集計に失敗しました: {0}")]
    Aggregation(#[from] CostAggregationError),
    #[error("為替レートの取得に失敗しました: {0}")]
    ExchangeRates(#[from] ExchangeRatesError),
    #[error("JPYへの変換に失敗しました: {0}")]
    Currency(#[from] CurrencyError),
    #[error("Slack通知に失敗しました: {0}")]
    Notification(#[from] SlackError),
}

/// 週次コストレポートユースケース
pub struct WeeklyCostReport<'a> {
    cost_fetcher: &'a dyn CostUsageFetcher,
    rates_fetcher: &'a dyn ExchangeRatesFetcher,
    notifier: &'a dyn ReportNotifier,
    verbose_logging: bool,
}

impl<'a> WeeklyCostReport<'a> {
    /// 新しいWeeklyCostReportを作成
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

    /// 週次レポートを実行する
    ///
    /// # 処理フロー
    /// 1. 実行日時(JST)から先週・先々週のウィンドウを導出
    /// 2. 各ウィンドウのUSD利用コストを取得して集計
    /// 3. USD金額から増減率を算出
    /// 4. 為替レートを取得してコストをJPYへ変換
    /// 5. 整形してSlackへ送信
    pub async fn run(&self, exec_time: DateTime<FixedOffset>) -> Result<(), WeeklyReportError> {
        let dates = WeeklyReportDates::from_execution_time(exec_time);

        if self.verbose_logging {
            debug!(
                last_week_start = %dates.last_week.start,
                last_week_end = %dates.last_week.end,
                week_before_last_start = %dates.week_before_last.start,
                week_before_last_end = %dates.week_before_last.end,
                "[1] 基準日を導出"
            );
        }

        let last_week_amounts = self
            .cost_fetcher
            .fetch_unblended_costs(dates.last_week, CostGranularity::Daily)
            .await?;
        let last_week_cost = domain::sum_amounts(&last_week_amounts)?;

        let week_before_last_amounts = self
            .cost_fetcher
            .fetch_unblended_costs(dates.week_before_last, CostGranularity::Daily)
            .await?;
        let week_before_last_cost = domain::sum_amounts(&week_before_last_amounts)?;

        let percentage_change = domain::percentage_change(last_week_cost, week_before_last_cost);

        if self.verbose_logging {
            debug!(
                last_week_cost = last_week_cost,
                week_before_last_cost = week_before_last_cost,
                percentage_change = percentage_change,
                "[2] USD利用コストと増減率を算出"
            );
        }

        let snapshot = self.rates_fetcher.fetch_usd_rates().await?;

        let usage = WeeklyCostUsage {
            last_week_cost,
            week_before_last_cost,
            percentage_change,
        }
        .to_jpy(&snapshot)?;

        if self.verbose_logging {
            debug!(
                last_week_cost = usage.last_week_cost,
                week_before_last_cost = usage.week_before_last_cost,
                "[3] JPYへ変換"
            );
        }

        let payload = domain::format_weekly_report(&usage);
        self.notifier.notify(&payload).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        FakeCostExplorer, FakeNotifier, FakeRatesFetcher, jst_exec_time,
    };
    use crate::domain::round_up_two_decimals;

    #[tokio::test]
    async fn test_weekly_report_sends_converted_figures() {
        let rate = 157.35784932;
        let cost_fetcher = FakeCostExplorer::new(vec![
            vec!["0.01".to_string(), "0.01".to_string(), "0.01".to_string()],
            vec!["0.03".to_string()],
        ]);
        let rates_fetcher = FakeRatesFetcher::with_jpy(rate);
        let notifier = FakeNotifier::new();

        let usecase = WeeklyCostReport::new(&cost_fetcher, &rates_fetcher, &notifier, false);
        usecase.run(jst_exec_time(2024, 12, 29)).await.unwrap();

        // 両ウィンドウとも日次粒度で照会される
        let calls = cost_fetcher.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0.start_string(), "2024-12-16");
        assert_eq!(calls[0].0.end_string(), "2024-12-22");
        assert_eq!(calls[0].1, CostGranularity::Daily);
        assert_eq!(calls[1].0.start_string(), "2024-12-09");
        assert_eq!(calls[1].0.end_string(), "2024-12-15");
        assert_eq!(calls[1].1, CostGranularity::Daily);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "weekly-cost-report");

        let last_week_jpy = round_up_two_decimals(0.03 * rate).unwrap();
        assert!(sent[0].body.contains(&format!("先週の利用コスト: {:.2} 円", last_week_jpy)));
        // 0.01*3 と 0.03 は同額なので増減率は0
        assert!(sent[0].body.contains("コスト増減: 0.00 %"));
    }

    // 増減率はUSD金額から計算され、JPY変換の影響を受けない
    #[tokio::test]
    async fn test_percentage_change_computed_from_usd() {
        let cost_fetcher = FakeCostExplorer::new(vec![
            vec!["110.0".to_string()],
            vec!["100.0".to_string()],
        ]);
        let rates_fetcher = FakeRatesFetcher::with_jpy(157.35784932);
        let notifier = FakeNotifier::new();

        let usecase = WeeklyCostReport::new(&cost_fetcher, &rates_fetcher, &notifier, false);
        usecase.run(jst_exec_time(2024, 12, 29)).await.unwrap();

        let sent = notifier.sent();
        assert!(sent[0].body.contains("コスト増減: 10.00 %"));
    }

    // 先々週のコストが0でもエラーにならず増減率は0
    #[tokio::test]
    async fn test_zero_week_before_last_reports_zero_change() {
        let cost_fetcher =
            FakeCostExplorer::new(vec![vec!["5.0".to_string()], vec![]]);
        let rates_fetcher = FakeRatesFetcher::with_jpy(157.0);
        let notifier = FakeNotifier::new();

        let usecase = WeeklyCostReport::new(&cost_fetcher, &rates_fetcher, &notifier, false);
        usecase.run(jst_exec_time(2024, 12, 29)).await.unwrap();

        let sent = notifier.sent();
        assert!(sent[0].body.contains("先々週の利用コスト: 0.00 円"));
        assert!(sent[0].body.contains("コスト増減: 0.00 %"));
    }

    // Slack送信失敗はエラーとして呼び出し元へ返す
    #[tokio::test]
    async fn test_notification_failure_is_error() {
        let cost_fetcher = FakeCostExplorer::new(vec![
            vec!["1.0".to_string()],
            vec!["1.0".to_string()],
        ]);
        let rates_fetcher = FakeRatesFetcher::with_jpy(157.0);
        let notifier = FakeNotifier::failing();

        let usecase = WeeklyCostReport::new(&cost_fetcher, &rates_fetcher, &notifier, false);
        let result = usecase.run(jst_exec_time(2024, 12, 29)).await;

        assert!(matches!(result, Err(WeeklyReportError::Notification(_))));
    }

    // JPYレート欠如は中断（通知なし）
    #[tokio::test]
    async fn test_weekly_report_aborts_when_jpy_rate_missing() {
        let cost_fetcher = FakeCostExplorer::new(vec![
            vec!["1.0".to_string()],
            vec!["1.0".to_string()],
        ]);
        let rates_fetcher = FakeRatesFetcher::without_jpy();
        let notifier = FakeNotifier::new();

        let usecase = WeeklyCostReport::new(&cost_fetcher, &rates_fetcher, &notifier, false);
        let result = usecase.run(jst_exec_time(2024, 12, 29)).await;

        assert!(matches!(result, Err(WeeklyReportError::Currency(_))));
        assert!(notifier.sent().is_empty());
    }
}
