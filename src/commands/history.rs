//! Order color history commands.

use crate::colors::HistorySwatch;
use crate::core_state::CoreState;
use crate::models::HexColor;

/// Recent orders, newest first.
pub fn get_history(state: &CoreState) -> Result<Vec<HistorySwatch>, String> {
    let session = state.lock_session().map_err(|e| e.to_string())?;
    Ok(session.history_view())
}

/// Set an order's color from operator input (`RRGGBB`, optional `#`).
pub fn recolor(state: &CoreState, order_name: &str, color: &str) -> Result<HexColor, String> {
    let color: HexColor = color.parse().map_err(|e: crate::models::ModelError| e.to_string())?;
    let mut session = state.lock_session().map_err(|e| e.to_string())?;
    session
        .recolor(order_name, color)
        .map_err(|e| e.to_string())?;
    Ok(color)
}

/// Re-apply history colors to the session (the "refresh" button).
pub fn refresh_colors(state: &CoreState) -> Result<(), String> {
    let mut session = state.lock_session().map_err(|e| e.to_string())?;
    session.refresh_colors();
    Ok(())
}
