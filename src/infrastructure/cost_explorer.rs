// Cost Explorer操作モジュール
//
// AWS Cost Explorer GetCostAndUsage を呼び出し、期間ごとの
// UnblendedCost を10進文字列のまま取り出す。数値への変換は
// ドメイン層の集計境界で行う。

use async_trait::async_trait;
use aws_sdk_costexplorer::Client as CostExplorerClient;
use aws_sdk_costexplorer::types::{DateInterval, Granularity};
use thiserror::Error;
use tracing::debug;

use crate::domain::DateWindow;

/// 取得対象のコストメトリクス
const UNBLENDED_COST: &str = "UnblendedCost";

/// コストの集計粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostGranularity {
    /// 日単位
    Daily,
    /// 月単位
    Monthly,
}

impl CostGranularity {
    fn to_sdk(self) -> Granularity {
        match self {
            CostGranularity::Daily => Granularity::Daily,
            CostGranularity::Monthly => Granularity::Monthly,
        }
    }
}

/// Cost Explorer操作のエラー型
#[derive(Debug, Error)]
pub enum CostExplorerError {
    /// AWS SDK エラー
    #[error("AWS Cost Explorer APIエラー: {0}")]
    AwsSdkError(String),
}

/// 課金データ取得のトレイト（テスト用の抽象化）
#[async_trait]
pub trait CostUsageFetcher: Send + Sync {
    /// 指定ウィンドウの期間ごとの UnblendedCost（10進文字列）を取得する
    ///
    /// 合計が存在しない期間は結果に含まれない（欠損は0として扱われる）。
    async fn fetch_unblended_costs(
        &self,
        window: DateWindow,
        granularity: CostGranularity,
    ) -> Result<Vec<String>, CostExplorerError>;
}

/// AWS SDKを使用したCost Explorer実装
pub struct AwsCostExplorer {
    client: CostExplorerClient,
}

impl AwsCostExplorer {
    /// 新しいAwsCostExplorerを作成
    pub fn new(client: CostExplorerClient) -> Self {
        Self { client }
    }

    /// AWS設定からデフォルトのクライアントを作成
    pub async fn from_config() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(CostExplorerClient::new(&config))
    }
}

#[async_trait]
impl CostUsageFetcher for AwsCostExplorer {
    async fn fetch_unblended_costs(
        &self,
        window: DateWindow,
        granularity: CostGranularity,
    ) -> Result<Vec<String>, CostExplorerError> {
        let interval = DateInterval::builder()
            .start(window.start_string())
            .end(window.end_string())
            .build()
            .map_err(|e| CostExplorerError::AwsSdkError(e.to_string()))?;

        let output = self
            .client
            .get_cost_and_usage()
            .time_period(interval)
            .granularity(granularity.to_sdk())
            .metrics(UNBLENDED_COST)
            .send()
            .await
            .map_err(|e| CostExplorerError::AwsSdkError(e.to_string()))?;

        let mut amounts = Vec::new();
        for result in output.results_by_time() {
            let Some(total) = result.total() else {
                continue;
            };
            if let Some(amount) = total.get(UNBLENDED_COST).and_then(|cost| cost.amount()) {
                amounts.push(amount.to_string());
            }
        }

        debug!(
            start = %window.start,
            end = %window.end,
            period_count = amounts.len(),
            "Cost Explorerから利用コストを取得"
        );

        Ok(amounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_mapping() {
        assert_eq!(CostGranularity::Daily.to_sdk(), Granularity::Daily);
        assert_eq!(CostGranularity::Monthly.to_sdk(), Granularity::Monthly);
    }
}
