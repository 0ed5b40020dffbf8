// インフラストラクチャ層モジュール
pub mod config;
pub mod cost_explorer;
pub mod exchange_rates;
pub mod logging;
pub mod slack;

// 再エクスポート
pub use config::{AppConfig, ConfigError, SlackConfig};
pub use cost_explorer::{AwsCostExplorer, CostExplorerError, CostGranularity, CostUsageFetcher};
pub use exchange_rates::{
    ExchangeRatesClient, ExchangeRatesError, ExchangeRatesFetcher, ExchangeRatesResponse,
};
pub use logging::init_logging;
pub use slack::{ReportNotifier, SlackError, SlackNotifier};
