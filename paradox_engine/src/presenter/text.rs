//! Plain-text rendering of board projections and live announcements.

use paradox_rules::{end_message, Decision, Metric, MetricLevel, TerminationReason};

use super::BoardView;
use crate::session::SessionSnapshot;

/// Renders the game as plain text, one block per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }

    /// The full board: status strip, metrics, and decision cards.
    pub fn render_board(&self, board: &BoardView) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Turn {} / {}    Budget: {}{}\n",
            board.turn.min(board.max_turns),
            board.max_turns,
            format_crores(board.budget.remaining),
            if board.budget.low { " (low)" } else { "" }
        ));
        out.push('\n');

        for m in &board.metrics {
            out.push_str(&format!(
                "{:<22} {:>3}% {}{}\n",
                m.label,
                m.value,
                bar(m.value),
                level_marker(m.level)
            ));
        }
        out.push('\n');

        for d in &board.decisions {
            let effects = d
                .effects
                .iter()
                .map(|e| format!("{} {:+}", e.metric, e.delta))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "[{}] {} - {}{}\n    {}\n    {}\n",
                d.index,
                d.label,
                format_crores(d.cost),
                if d.affordable { "" } else { " (unaffordable)" },
                effects,
                d.description
            ));
        }

        out
    }

    /// The screen-reader style summary spoken after each accepted decision.
    pub fn announce_turn(&self, snapshot: &SessionSnapshot, decision: &Decision) -> String {
        let state = &snapshot.state;
        format!(
            "Turn {} of {}. Decision: {}. Budget: {} crores. Social: {}%. Economic: {}%. Environmental: {}%.",
            snapshot.turn,
            snapshot.max_turns,
            decision.label,
            group_thousands(state.budget),
            state.get(Metric::Social),
            state.get(Metric::Economic),
            state.get(Metric::Ecology)
        )
    }

    pub fn announce_new_game(&self, max_turns: u32) -> String {
        format!("New game started. Turn 1 of {}. All metrics at 100%.", max_turns)
    }

    pub fn announce_game_over(&self, reason: TerminationReason) -> String {
        format!("Game over. {}", end_message(Some(reason)))
    }

    /// The end screen. Returns an empty string while the game is still running.
    pub fn render_final_results(&self, board: &BoardView) -> String {
        let Some(ending) = &board.ending else {
            return String::new();
        };

        let mut out = String::from("FINAL RESULTS\n\n");
        out.push_str(&format!(
            "{:<22} {}\n",
            "Final Budget",
            format_crores(board.budget.remaining)
        ));
        for m in &board.metrics {
            out.push_str(&format!("{:<22} {:>3}% {}\n", m.label, m.value, bar(m.value)));
        }
        out.push('\n');
        out.push_str(ending.message);
        out.push_str("\n\n");
        for line in ending.coda {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// `₹66,800 Cr`
pub fn format_crores(amount: i64) -> String {
    format!("\u{20B9}{} Cr", group_thousands(amount))
}

/// Insert comma separators every three digits.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn bar(value: i32) -> String {
    let filled = (value.clamp(0, 100) / 10) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(10 - filled))
}

fn level_marker(level: MetricLevel) -> &'static str {
    match level {
        MetricLevel::Healthy => "",
        MetricLevel::Warning => " !",
        MetricLevel::Critical => " !!",
    }
}
