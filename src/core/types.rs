use serde::{Deserialize, Serialize};

use super::strategy::Strategy;

/// Monthly income sources. Salary recurs every month; the bonus is entered as
/// an annual lump and is never multiplied by 12.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonthlyIncome {
    pub salary: f64,
    pub bonus: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeRecord {
    pub monthly: MonthlyIncome,
}

impl IncomeRecord {
    pub fn annual_total(&self) -> f64 {
        self.monthly.salary * 12.0 + self.monthly.bonus
    }

    pub fn with_salary(self, salary: f64) -> Self {
        Self {
            monthly: MonthlyIncome {
                salary,
                ..self.monthly
            },
        }
    }

    pub fn with_bonus(self, bonus: f64) -> Self {
        Self {
            monthly: MonthlyIncome {
                bonus,
                ..self.monthly
            },
        }
    }
}

/// Recurring monthly spending by category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonthlyExpenses {
    pub housing: f64,
    pub living: f64,
    pub transport: f64,
    pub entertainment: f64,
}

impl MonthlyExpenses {
    pub fn total(&self) -> f64 {
        self.housing + self.living + self.transport + self.entertainment
    }
}

/// One-off annual spending by category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YearlyExpenses {
    pub insurance: f64,
    pub tax: f64,
    pub travel: f64,
    pub loan: f64,
}

impl YearlyExpenses {
    pub fn total(&self) -> f64 {
        self.insurance + self.tax + self.travel + self.loan
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseRecord {
    pub monthly: MonthlyExpenses,
    pub yearly: YearlyExpenses,
}

impl ExpenseRecord {
    pub fn monthly_total(&self) -> f64 {
        self.monthly.total()
    }

    pub fn yearly_one_off_total(&self) -> f64 {
        self.yearly.total()
    }

    pub fn total_annual(&self) -> f64 {
        self.monthly_total() * 12.0 + self.yearly_one_off_total()
    }

    pub fn with_monthly(self, monthly: MonthlyExpenses) -> Self {
        Self { monthly, ..self }
    }

    pub fn with_yearly(self, yearly: YearlyExpenses) -> Self {
        Self { yearly, ..self }
    }
}

/// Holdings counted as the compounding principal of the growth simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LiquidAssets {
    pub cash: f64,
    pub stock: f64,
    pub bond: f64,
}

impl LiquidAssets {
    pub fn total(&self) -> f64 {
        self.cash + self.stock + self.bond
    }
}

/// Holdings that count toward net worth but not toward the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NonLiquidAssets {
    pub real_estate: f64,
    pub car: f64,
    pub other: f64,
}

impl NonLiquidAssets {
    pub fn total(&self) -> f64 {
        self.real_estate + self.car + self.other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetRecord {
    pub liquid: LiquidAssets,
    pub non_liquid: NonLiquidAssets,
}

impl AssetRecord {
    pub fn liquid_total(&self) -> f64 {
        self.liquid.total()
    }

    pub fn non_liquid_total(&self) -> f64 {
        self.non_liquid.total()
    }

    pub fn total(&self) -> f64 {
        self.liquid_total() + self.non_liquid_total()
    }

    pub fn with_liquid(self, liquid: LiquidAssets) -> Self {
        Self { liquid, ..self }
    }

    pub fn with_non_liquid(self, non_liquid: NonLiquidAssets) -> Self {
        Self { non_liquid, ..self }
    }
}

/// Manual FIRE-goal override. `Override(0.0)` is a legitimate explicit goal
/// and is distinct from `Unset`, which means "use the strategy-computed
/// goal". Serializes as `number | null` to match the stored profile shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum GoalOverride {
    #[default]
    Unset,
    Override(f64),
}

impl GoalOverride {
    pub fn is_set(self) -> bool {
        matches!(self, Self::Override(_))
    }

    pub fn resolve(self, computed: f64) -> f64 {
        match self {
            Self::Unset => computed,
            Self::Override(amount) => amount,
        }
    }
}

impl From<Option<f64>> for GoalOverride {
    fn from(value: Option<f64>) -> Self {
        match value {
            None => Self::Unset,
            Some(amount) => Self::Override(amount),
        }
    }
}

impl From<GoalOverride> for Option<f64> {
    fn from(value: GoalOverride) -> Self {
        match value {
            GoalOverride::Unset => None,
            GoalOverride::Override(amount) => Some(amount),
        }
    }
}

/// Derived statistics over one set of input records. Recomputed on every
/// input change, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub annual_income: f64,
    pub monthly_expense_total: f64,
    pub total_annual_expense: f64,
    pub annual_savings: f64,
    pub monthly_savings: f64,
    pub total_liquid_assets: f64,
    pub total_non_liquid_assets: f64,
    pub total_assets: f64,
    pub savings_rate_percent: f64,
    pub selected_strategy: Strategy,
    pub strategy_calculated_goal: f64,
    pub effective_goal: f64,
    pub emergency_fund_target: f64,
    pub emergency_fund_met: bool,
}

impl FinancialSnapshot {
    /// The numeric fields handed to the external advice collaborator as
    /// prompt parameters. No advice text is built or parsed here.
    pub fn advice_summary(&self, annual_return_rate_percent: f64) -> AdviceSummary {
        AdviceSummary {
            annual_income: self.annual_income,
            total_liquid_assets: self.total_liquid_assets,
            total_annual_expense: self.total_annual_expense,
            savings_rate_percent: self.savings_rate_percent,
            effective_goal: self.effective_goal,
            annual_return_rate_percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceSummary {
    pub annual_income: f64,
    pub total_liquid_assets: f64,
    pub total_annual_expense: f64,
    pub savings_rate_percent: f64,
    pub effective_goal: f64,
    pub annual_return_rate_percent: f64,
}

/// The record shape exchanged with the persistence collaborator, keyed by
/// user identity outside this crate. Save timing and conflict resolution are
/// the sync layer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub incomes: IncomeRecord,
    pub assets: AssetRecord,
    pub expenses: ExpenseRecord,
    pub manual_goal: GoalOverride,
    pub return_rate: f64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            incomes: IncomeRecord::default(),
            assets: AssetRecord::default(),
            expenses: ExpenseRecord::default(),
            manual_goal: GoalOverride::Unset,
            return_rate: 6.0,
        }
    }
}
