mod projection;
mod stats;
mod strategy;
mod types;

pub use projection::{PROJECTION_HORIZON_MONTHS, ProjectionResult, ProjectionSample, project_growth};
pub use stats::compute_snapshot;
pub use strategy::{STRATEGIES, Strategy, default_strategy, strategy_by_id};
pub use types::{
    AdviceSummary, AssetRecord, ExpenseRecord, FinancialSnapshot, GoalOverride, IncomeRecord,
    LiquidAssets, MonthlyExpenses, MonthlyIncome, NonLiquidAssets, Profile, YearlyExpenses,
};
