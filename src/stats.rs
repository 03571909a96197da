//! Profit / win-rate aggregation over a player's session outcomes.

use chrono::NaiveDate;
use serde::Serialize;

/// One session a player took part in, paired with their first recorded
/// cash-out for it (None when no result row exists).
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub date: NaiveDate,
    pub buy_in_amount: Option<f64>,
    pub notes: Option<String>,
    pub final_amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RecentSession {
    pub date: NaiveDate,
    pub buy_in_amount: Option<f64>,
    pub profit_loss: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayerStats {
    pub total_sessions: usize,
    pub total_profit: f64,
    pub win_rate: f64,
    pub recent_sessions: Vec<RecentSession>,
}

/// Aggregate `outcomes` (in join order) into the stats payload.
///
/// Only the first 10 outcomes contribute to the totals, while the win-rate
/// denominator is the full session count; outcomes without a result are
/// counted there but add nothing to the totals.
pub fn summarize(outcomes: &[SessionOutcome]) -> PlayerStats {
    let total_sessions = outcomes.len();
    let mut total_profit = 0.0;
    let mut winning_sessions = 0usize;
    let mut recent_sessions = Vec::new();

    for outcome in outcomes.iter().take(10) {
        let Some(final_amount) = outcome.final_amount else {
            continue;
        };
        let profit_loss = final_amount - outcome.buy_in_amount.unwrap_or(0.0);
        total_profit += profit_loss;
        if profit_loss > 0.0 {
            winning_sessions += 1;
        }
        recent_sessions.push(RecentSession {
            date: outcome.date,
            buy_in_amount: outcome.buy_in_amount,
            profit_loss,
            notes: outcome.notes.clone(),
        });
    }

    let win_rate = if total_sessions > 0 {
        round1(winning_sessions as f64 / total_sessions as f64 * 100.0)
    } else {
        0.0
    };

    PlayerStats {
        total_sessions,
        total_profit,
        win_rate,
        recent_sessions,
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
