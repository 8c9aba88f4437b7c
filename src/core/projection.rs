use serde::Serialize;

/// Hard horizon for the growth loop: 50 years of monthly steps. Keeps the
/// simulation bounded when the goal is unreachable at the given rate and
/// contribution.
pub const PROJECTION_HORIZON_MONTHS: u32 = 600;

/// One point of the sampled growth curve. `amount` is floored at sampling
/// time; the running balance itself is never rounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSample {
    pub year: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub months: u32,
    /// Years until the goal, rounded to one decimal place. Reports ~50.0 when
    /// the horizon cap ends the run; check `goal_reached` to tell the cases
    /// apart.
    pub years_to_goal: f64,
    pub goal_reached: bool,
    pub samples: Vec<ProjectionSample>,
}

/// Simulates compounding growth of the liquid principal month by month until
/// `goal` is reached or [`PROJECTION_HORIZON_MONTHS`] elapse.
///
/// Negative monthly savings are clamped to a zero contribution: a spending
/// deficit is not drawn down from the principal. A goal at or below the
/// starting balance returns immediately with zero months and no samples.
pub fn project_growth(
    starting_liquid: f64,
    monthly_savings: f64,
    goal: f64,
    annual_return_rate_percent: f64,
) -> ProjectionResult {
    let monthly_rate = annual_return_rate_percent / 100.0 / 12.0;
    let contribution = monthly_savings.max(0.0);

    let mut current = starting_liquid;
    let mut months: u32 = 0;
    let mut samples = Vec::new();

    while current < goal && months < PROJECTION_HORIZON_MONTHS {
        current = current * (1.0 + monthly_rate) + contribution;
        months += 1;
        if months % 12 == 0 || current >= goal {
            samples.push(ProjectionSample {
                year: f64::from(months) / 12.0,
                amount: current.floor(),
            });
        }
    }

    let years_to_goal = (f64::from(months) / 12.0 * 10.0).round() / 10.0;

    ProjectionResult {
        months,
        years_to_goal,
        goal_reached: current >= goal,
        samples,
    }
}
