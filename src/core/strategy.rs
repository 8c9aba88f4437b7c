use serde::Serialize;

/// One entry of the fixed FIRE-strategy catalog. The multiplier is the number
/// of years of annual expense that defines "enough" (25x implements the
/// classic 4% rule).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: &'static str,
    pub display_name: &'static str,
    pub multiplier: f64,
    pub description: &'static str,
}

/// Process-wide immutable catalog. Order matters: the first entry is the
/// fallback for unknown ids.
pub const STRATEGIES: [Strategy; 5] = [
    Strategy {
        id: "lean",
        display_name: "Lean FIRE",
        multiplier: 20.0,
        description: "For frugal lifestyles with very low ongoing spending.",
    },
    Strategy {
        id: "standard",
        display_name: "Standard FIRE",
        multiplier: 25.0,
        description: "The classic 4% rule; the most balanced retirement plan.",
    },
    Strategy {
        id: "chubby",
        display_name: "Chubby FIRE",
        multiplier: 30.0,
        description: "A roomier travel and lifestyle budget without penny-pinching.",
    },
    Strategy {
        id: "fat",
        display_name: "Fat FIRE",
        multiplier: 33.0,
        description: "A very high safety margin supporting a premium lifestyle.",
    },
    Strategy {
        id: "barista",
        display_name: "Barista FIRE",
        multiplier: 15.0,
        description: "Save part of the target and cover the rest with relaxed part-time work.",
    },
];

pub fn default_strategy() -> &'static Strategy {
    &STRATEGIES[0]
}

/// Looks up a strategy by id. Unknown ids fall back to the catalog default
/// rather than failing.
pub fn strategy_by_id(id: &str) -> &'static Strategy {
    STRATEGIES
        .iter()
        .find(|s| s.id == id)
        .unwrap_or_else(default_strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_the_five_canonical_entries() {
        let multipliers: Vec<f64> = STRATEGIES.iter().map(|s| s.multiplier).collect();
        assert_eq!(multipliers, vec![20.0, 25.0, 30.0, 33.0, 15.0]);
    }

    #[test]
    fn known_ids_resolve_to_their_entries() {
        assert_eq!(strategy_by_id("standard").multiplier, 25.0);
        assert_eq!(strategy_by_id("barista").multiplier, 15.0);
        assert_eq!(strategy_by_id("fat").display_name, "Fat FIRE");
    }

    #[test]
    fn unknown_id_falls_back_to_the_default_entry() {
        let fallback = strategy_by_id("coast");
        assert_eq!(fallback, default_strategy());
        assert_eq!(fallback.id, "lean");
    }

    #[test]
    fn strategy_serializes_with_camel_case_keys() {
        let json = serde_json::to_string(default_strategy()).expect("strategy should serialize");
        assert!(json.contains("\"displayName\""));
        assert!(json.contains("\"multiplier\":20.0"));
    }
}
