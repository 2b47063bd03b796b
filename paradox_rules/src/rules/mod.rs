//! Pure rules: affordability, clamping, decision application, and termination.
//!
//! Every function here is stateless. Inputs are taken by value or shared reference
//! and results are fresh values, so the same arguments always give the same answer.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::{
    Decision, BUDGET_END_MESSAGE, DEFAULT_END_MESSAGE, DEFEAT_THRESHOLD, ECOLOGY_END_MESSAGE,
    ECONOMIC_END_MESSAGE, SOCIAL_END_MESSAGE, TURNS_END_MESSAGE,
};
use crate::error::RulesError;
use crate::metrics::{GameState, Metric, METRIC_MAX, METRIC_MIN};

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminationReason {
    Social,
    Economic,
    Ecology,
    Budget,
    Turns,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::Social => "social",
            TerminationReason::Economic => "economic",
            TerminationReason::Ecology => "ecology",
            TerminationReason::Budget => "budget",
            TerminationReason::Turns => "turns",
        }
    }

    /// The reason reported when `metric` collapses.
    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Social => TerminationReason::Social,
            Metric::Economic => TerminationReason::Economic,
            Metric::Ecology => TerminationReason::Ecology,
        }
    }
}

impl FromStr for TerminationReason {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "social" => Ok(TerminationReason::Social),
            "economic" => Ok(TerminationReason::Economic),
            "ecology" => Ok(TerminationReason::Ecology),
            "budget" => Ok(TerminationReason::Budget),
            "turns" => Ok(TerminationReason::Turns),
            other => Err(RulesError::UnknownReason(other.to_string())),
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a termination check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Continue,
    Over(TerminationReason),
}

impl Termination {
    pub fn is_over(&self) -> bool {
        matches!(self, Termination::Over(_))
    }

    pub fn reason(&self) -> Option<TerminationReason> {
        match self {
            Termination::Continue => None,
            Termination::Over(reason) => Some(*reason),
        }
    }
}

/// True iff `budget` covers `cost`.
pub fn can_afford(budget: i64, cost: i64) -> bool {
    budget >= cost
}

/// Clamp a metric value into [0, 100].
pub fn clamp_metric(value: i32) -> i32 {
    value.clamp(METRIC_MIN, METRIC_MAX)
}

/// Apply a decision to a state, returning the next state.
///
/// The budget is reduced by the decision's cost and each metric named in the
/// decision's effects is shifted and clamped. Metrics without an effect are copied.
///
/// # Panics
///
/// Panics if the decision is not affordable. Sessions check affordability before
/// calling this, so reaching the panic means a caller skipped that check.
/// Debug builds also panic on a negative cost or a delta outside [-100, 100].
pub fn apply_decision(state: &GameState, decision: &Decision) -> GameState {
    debug_assert!(
        decision.cost >= 0,
        "decision '{}' has negative cost {}",
        decision.label,
        decision.cost
    );
    debug_assert!(
        decision
            .effects
            .iter()
            .all(|e| (-METRIC_MAX..=METRIC_MAX).contains(&e.delta)),
        "decision '{}' has a delta outside [-100, 100]",
        decision.label
    );
    assert!(
        can_afford(state.budget, decision.cost),
        "apply_decision called with unaffordable decision '{}' (budget {}, cost {})",
        decision.label,
        state.budget,
        decision.cost
    );

    let mut next = *state;
    next.budget -= decision.cost;
    for effect in decision.effects {
        let value = clamp_metric(next.get(effect.metric) + effect.delta);
        next = next.with(effect.metric, value);
    }
    next
}

/// Decide whether the game is over after `turn - 1` completed turns.
///
/// Conditions are checked in a fixed order and the first hit wins: social,
/// ecology, economic, budget, then the turn cap.
pub fn check_termination(state: &GameState, turn: u32, max_turns: u32) -> Termination {
    const METRIC_ORDER: [Metric; 3] = [Metric::Social, Metric::Ecology, Metric::Economic];

    if let Some(metric) = METRIC_ORDER
        .into_iter()
        .find(|m| state.get(*m) <= DEFEAT_THRESHOLD)
    {
        return Termination::Over(TerminationReason::for_metric(metric));
    }
    if state.budget <= 0 {
        return Termination::Over(TerminationReason::Budget);
    }
    if turn > max_turns {
        return Termination::Over(TerminationReason::Turns);
    }
    Termination::Continue
}

/// Narration for an ending. `None` yields the default narration.
pub fn end_message(reason: Option<TerminationReason>) -> &'static str {
    match reason {
        Some(TerminationReason::Social) => SOCIAL_END_MESSAGE,
        Some(TerminationReason::Ecology) => ECOLOGY_END_MESSAGE,
        Some(TerminationReason::Economic) => ECONOMIC_END_MESSAGE,
        Some(TerminationReason::Budget) => BUDGET_END_MESSAGE,
        Some(TerminationReason::Turns) => TURNS_END_MESSAGE,
        None => DEFAULT_END_MESSAGE,
    }
}

/// Narration for a raw reason key; unknown keys map to the default narration.
pub fn end_message_for(key: &str) -> &'static str {
    end_message(key.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DECISIONS, INITIAL_STATE, MAX_TURNS};
    use crate::metrics::MetricDelta;
    use proptest::prelude::*;

    fn port() -> &'static Decision {
        &DECISIONS[0]
    }

    #[test]
    fn test_apply_deducts_cost() {
        let next = apply_decision(&INITIAL_STATE, port());
        assert_eq!(next.budget, 81_800 - 15_000);
    }

    #[test]
    fn test_apply_effects() {
        let next = apply_decision(&INITIAL_STATE, port());
        assert_eq!(next, GameState::new(80, 100, 70, 66_800));
    }

    #[test]
    fn test_apply_clamps_low() {
        let state = GameState {
            ecology: 10,
            ..INITIAL_STATE
        };
        assert_eq!(apply_decision(&state, port()).ecology, 0);
    }

    #[test]
    fn test_apply_clamps_high() {
        let state = GameState {
            economic: 90,
            ..INITIAL_STATE
        };
        assert_eq!(apply_decision(&state, port()).economic, 100);
    }

    #[test]
    fn test_apply_leaves_unmentioned_metrics() {
        const SURVEY_EFFECTS: &[MetricDelta] = &[MetricDelta::new(Metric::Ecology, -5)];
        let partial = Decision {
            label: "Survey",
            cost: 100,
            effects: SURVEY_EFFECTS,
            description: "",
            message: "",
        };
        let state = GameState::new(55, 44, 33, 1_000);
        let next = apply_decision(&state, &partial);
        assert_eq!(next, GameState::new(55, 44, 28, 900));
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let state = INITIAL_STATE;
        let first = apply_decision(&state, port());
        let second = apply_decision(&state, port());
        assert_eq!(state, INITIAL_STATE);
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "unaffordable")]
    fn test_apply_unaffordable_panics() {
        let broke = GameState {
            budget: 10_000,
            ..INITIAL_STATE
        };
        apply_decision(&broke, port());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "negative cost")]
    fn test_apply_negative_cost_panics() {
        let refund = Decision {
            label: "Refund",
            cost: -1_000,
            effects: &[],
            description: "",
            message: "",
        };
        apply_decision(&INITIAL_STATE, &refund);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside [-100, 100]")]
    fn test_apply_oversized_delta_panics() {
        const WIPEOUT: &[MetricDelta] = &[MetricDelta::new(Metric::Social, i32::MIN)];
        let wipeout = Decision {
            label: "Wipeout",
            cost: 0,
            effects: WIPEOUT,
            description: "",
            message: "",
        };
        apply_decision(&INITIAL_STATE, &wipeout);
    }

    #[test]
    fn test_healthy_state_continues() {
        let result = check_termination(&INITIAL_STATE, 1, MAX_TURNS);
        assert!(!result.is_over());
        assert_eq!(result.reason(), None);
    }

    #[test]
    fn test_each_reason_detected() {
        let cases = [
            (GameState { social: 30, ..INITIAL_STATE }, 1, TerminationReason::Social),
            (GameState { ecology: 25, ..INITIAL_STATE }, 1, TerminationReason::Ecology),
            (GameState { economic: 0, ..INITIAL_STATE }, 1, TerminationReason::Economic),
            (GameState { budget: 0, ..INITIAL_STATE }, 1, TerminationReason::Budget),
            (INITIAL_STATE, 11, TerminationReason::Turns),
        ];

        for (state, turn, expected) in cases {
            assert_eq!(
                check_termination(&state, turn, MAX_TURNS),
                Termination::Over(expected)
            );
        }
    }

    #[test]
    fn test_threshold_plus_one_continues() {
        let state = GameState::new(31, 31, 31, 1);
        assert_eq!(check_termination(&state, 10, 10), Termination::Continue);
    }

    #[test]
    fn test_negative_budget_ends() {
        let state = GameState {
            budget: -5,
            ..INITIAL_STATE
        };
        assert_eq!(
            check_termination(&state, 1, MAX_TURNS).reason(),
            Some(TerminationReason::Budget)
        );
    }

    #[test]
    fn test_termination_order() {
        let all = GameState::new(10, 10, 10, 0);
        assert_eq!(
            check_termination(&all, 99, 10).reason(),
            Some(TerminationReason::Social)
        );

        let eco_and_econ = GameState::new(90, 10, 10, 0);
        assert_eq!(
            check_termination(&eco_and_econ, 99, 10).reason(),
            Some(TerminationReason::Ecology)
        );

        let econ_and_budget = GameState::new(90, 10, 90, 0);
        assert_eq!(
            check_termination(&econ_and_budget, 99, 10).reason(),
            Some(TerminationReason::Economic)
        );

        let budget_and_turns = GameState::new(90, 90, 90, 0);
        assert_eq!(
            check_termination(&budget_and_turns, 99, 10).reason(),
            Some(TerminationReason::Budget)
        );
    }

    #[test]
    fn test_end_messages() {
        assert!(end_message(Some(TerminationReason::Social)).contains("whose land this is"));
        assert!(end_message(Some(TerminationReason::Ecology)).contains("primary rainforest"));
        assert!(end_message(Some(TerminationReason::Economic)).contains("add up"));
        assert!(end_message(Some(TerminationReason::Budget)).contains("underestimated"));
        assert!(end_message(Some(TerminationReason::Turns)).contains("public consultation"));
        assert_eq!(end_message(None), DEFAULT_END_MESSAGE);
    }

    #[test]
    fn test_end_message_for_unknown_key() {
        assert_eq!(end_message_for("budget"), BUDGET_END_MESSAGE);
        assert_eq!(end_message_for("unknown"), DEFAULT_END_MESSAGE);
    }

    #[test]
    fn test_can_afford() {
        assert!(can_afford(81_800, 15_000));
        assert!(can_afford(15_000, 15_000));
        assert!(!can_afford(10_000, 15_000));
    }

    #[test]
    fn test_clamp_metric() {
        assert_eq!(clamp_metric(-10), 0);
        assert_eq!(clamp_metric(150), 100);
        assert_eq!(clamp_metric(50), 50);
        assert_eq!(clamp_metric(0), 0);
        assert_eq!(clamp_metric(100), 100);
    }

    #[test]
    fn test_reason_keys() {
        for reason in [
            TerminationReason::Social,
            TerminationReason::Economic,
            TerminationReason::Ecology,
            TerminationReason::Budget,
            TerminationReason::Turns,
        ] {
            assert_eq!(reason.as_str().parse::<TerminationReason>().unwrap(), reason);
        }
        assert!("victory".parse::<TerminationReason>().is_err());
    }

    proptest! {
        #[test]
        fn prop_apply_matches_clamped_arithmetic(
            social in 0i32..=100,
            economic in 0i32..=100,
            ecology in 0i32..=100,
            budget in 15_000i64..=200_000,
            index in 0usize..4,
        ) {
            let state = GameState::new(social, economic, ecology, budget);
            let decision = &DECISIONS[index];
            let next = apply_decision(&state, decision);

            prop_assert_eq!(next.budget, budget - decision.cost);
            for metric in Metric::ALL {
                let expected = match decision.effect_on(metric) {
                    Some(delta) => (state.get(metric) + delta).clamp(0, 100),
                    None => state.get(metric),
                };
                prop_assert_eq!(next.get(metric), expected);
            }
            prop_assert!(next.metrics_in_bounds());
            prop_assert_eq!(apply_decision(&state, decision), next);
        }
    }
}
