//! DTOs for the rounds SeaORM adapter.

use time::OffsetDateTime;

use crate::entities::game_rounds::RoundStatus;
use crate::entities::round_actions::ActionKind;

/// Optimistically-guarded update of a round row.
pub struct RoundPatch {
    pub round_id: i64,
    pub status: RoundStatus,
    pub finished_at: Option<OffsetDateTime>,
    /// Version the caller read; the patch applies only if it still matches.
    pub expected_version: i32,
}

/// New action row, appended when a round is saved.
pub struct NewActionRow {
    pub round_id: i64,
    pub player_id: i64,
    pub action_type: ActionKind,
    pub payload: serde_json::Value,
    pub action_order: i16,
    pub created_at: OffsetDateTime,
}
