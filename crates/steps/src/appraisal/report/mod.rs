//! Presentation helpers layered on top of computed results.

mod assumptions;
mod currency;
pub mod views;

pub use assumptions::assumption_log;
pub use currency::{
    format_count, format_percent, format_ratio, CurrencyMode, MoneyFormatter, UnknownCurrency,
};
pub use views::{CostBreakdownView, CostComponentView, NationalView, ResultsSummaryView};
