// ユースケーステスト用のフェイクコラボレーター
//
// 外部API呼び出しを伴わずにパイプライン全体を検証するための実装群。

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};

use crate::domain::{DateWindow, ExchangeRateSnapshot, ReportPayload, jst};
use crate::infrastructure::{
    CostExplorerError, CostGranularity, CostUsageFetcher, ExchangeRatesError,
    ExchangeRatesFetcher, ReportNotifier, SlackError,
};

/// JSTの実行日時を生成する（時刻は9:00固定）
pub fn jst_exec_time(year: i32, month: u32, day: u32) -> DateTime<FixedOffset> {
    jst().with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
}

/// 呼び出しごとに事前定義した金額リストを返すフェイクCost Explorer
pub struct FakeCostExplorer {
    responses: Mutex<Vec<Vec<String>>>,
    calls: Mutex<Vec<(DateWindow, CostGranularity)>>,
}

impl FakeCostExplorer {
    /// 呼び出し順に返すレスポンスを指定して作成
    pub fn new(responses: Vec<Vec<String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 記録された呼び出し（ウィンドウと粒度）を取得
    pub fn calls(&self) -> Vec<(DateWindow, CostGranularity)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CostUsageFetcher for FakeCostExplorer {
    async fn fetch_unblended_costs(
        &self,
        window: DateWindow,
        granularity: CostGranularity,
    ) -> Result<Vec<String>, CostExplorerError> {
        self.calls.lock().unwrap().push((window, granularity));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(CostExplorerError::AwsSdkError(
                "想定外の呼び出し".to_string(),
            ));
        }
        Ok(responses.remove(0))
    }
}

/// 固定のレートスナップショットを返すフェイク為替レートクライアント
pub struct FakeRatesFetcher {
    rates: HashMap<String, f64>,
    call_count: Mutex<u32>,
}

impl FakeRatesFetcher {
    /// JPYレートのみを持つスナップショットを返す
    pub fn with_jpy(rate: f64) -> Self {
        Self {
            rates: HashMap::from([("JPY".to_string(), rate)]),
            call_count: Mutex::new(0),
        }
    }

    /// JPYレートを含まないスナップショットを返す
    pub fn without_jpy() -> Self {
        Self {
            rates: HashMap::new(),
            call_count: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ExchangeRatesFetcher for FakeRatesFetcher {
    async fn fetch_usd_rates(&self) -> Result<ExchangeRateSnapshot, ExchangeRatesError> {
        *self.call_count.lock().unwrap() += 1;
        Ok(ExchangeRateSnapshot::new(self.rates.clone()))
    }
}

/// 送信されたペイロードを記録するフェイク通知先
pub struct FakeNotifier {
    sent: Mutex<Vec<ReportPayload>>,
    fail: bool,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// 常に送信失敗するフェイクを作成
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// 送信されたペイロードを取得
    pub fn sent(&self) -> Vec<ReportPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportNotifier for FakeNotifier {
    async fn notify(&self, payload: &ReportPayload) -> Result<(), SlackError> {
        if self.fail {
            return Err(SlackError::HttpStatus(500));
        }
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }
}
