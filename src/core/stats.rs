use super::strategy::strategy_by_id;
use super::types::{AssetRecord, ExpenseRecord, FinancialSnapshot, GoalOverride, IncomeRecord};

/// Aggregates one set of input records into a [`FinancialSnapshot`].
///
/// Total over any finite numeric input: no panics, no I/O, no state. The one
/// guarded operation is the savings rate, which is 0 when annual income is 0.
/// Negative savings is a valid, reportable state. NaN inputs propagate; the
/// caller owns sanitation.
pub fn compute_snapshot(
    incomes: &IncomeRecord,
    expenses: &ExpenseRecord,
    assets: &AssetRecord,
    manual_goal: GoalOverride,
    strategy_id: &str,
) -> FinancialSnapshot {
    let annual_income = incomes.annual_total();
    let monthly_expense_total = expenses.monthly_total();
    let total_annual_expense = expenses.total_annual();

    let annual_savings = annual_income - total_annual_expense;
    let monthly_savings = annual_savings / 12.0;

    let total_liquid_assets = assets.liquid_total();
    let total_non_liquid_assets = assets.non_liquid_total();
    let total_assets = total_liquid_assets + total_non_liquid_assets;

    let savings_rate_percent = if annual_income > 0.0 {
        (annual_savings / annual_income) * 100.0
    } else {
        0.0
    };

    let selected_strategy = *strategy_by_id(strategy_id);
    let strategy_calculated_goal = total_annual_expense * selected_strategy.multiplier;
    let effective_goal = manual_goal.resolve(strategy_calculated_goal);

    let emergency_fund_target = monthly_expense_total * 6.0;
    let emergency_fund_met = assets.liquid.cash >= emergency_fund_target;

    FinancialSnapshot {
        annual_income,
        monthly_expense_total,
        total_annual_expense,
        annual_savings,
        monthly_savings,
        total_liquid_assets,
        total_non_liquid_assets,
        total_assets,
        savings_rate_percent,
        selected_strategy,
        strategy_calculated_goal,
        effective_goal,
        emergency_fund_target,
        emergency_fund_met,
    }
}
