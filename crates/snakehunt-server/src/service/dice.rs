//! The roll state machine.
//!
//! ```text
//!  can_roll ──roll──▶ checkpoint pending ──approve──▶ approved + question
//!     ▲                                                    │
//!     └────────────── mark correct / incorrect ────────────┘
//!
//!  roll reaching the last tile ──▶ finished (no checkpoint, never rolls again)
//! ```
//!
//! A roll releases the team's current room, moves it on its map's board and
//! sends it to a new room with a pending checkpoint. All of it commits or
//! none of it does.

use chrono::Utc;
use serde_json::json;

use snakehunt_core::board::{check_position, roll_die};
use snakehunt_core::model::DiceRoll;
use snakehunt_core::rooms::select_room;
use snakehunt_core::TeamId;
use snakehunt_storage::tables::checkpoints::{self, NewCheckpoint};
use snakehunt_storage::tables::teams::{self, MoveRecord};
use snakehunt_storage::tables::{rolls, rooms};

use super::{load_board, GameService};
use crate::audit;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schema::participant::RollResponse;

impl GameService {
    /// Rolls the die for a team.
    ///
    /// Fails with `Conflict` when the team has finished, still has an open
    /// checkpoint, or no room has space for it.
    pub fn roll_dice(&mut self, actor: &AuthUser, team_id: TeamId) -> Result<RollResponse, ApiError> {
        let now = Utc::now();
        let rng = &mut self.rng;

        let response = self.store.transaction(|tx| -> Result<RollResponse, ApiError> {
            let team = teams::get(tx, team_id)?;
            if team.is_finished() {
                return Err(ApiError::Conflict(format!("team {team_id} has finished")));
            }
            if let Some(open) = checkpoints::open_for_team(tx, team_id)? {
                return Err(ApiError::Conflict(format!(
                    "checkpoint {} is still {}",
                    open.id, open.status
                )));
            }
            if !team.can_roll {
                return Err(ApiError::Conflict(format!("team {team_id} may not roll yet")));
            }

            let board = load_board(tx, team.map_id)?;
            let from = check_position(team.position)?;
            let outcome = board.plan_move(from, roll_die(rng));

            if let Some(previous) = team.current_room_id {
                rooms::release(tx, previous)?;
            }

            let room = if outcome.finished {
                None
            } else {
                let candidates = rooms::list(tx)?;
                let room_id = select_room(&candidates, team.current_room_id, rng)
                    .ok_or_else(|| ApiError::Conflict("no room has space".to_string()))?;
                rooms::occupy(tx, room_id)?;
                Some(rooms::get(tx, room_id)?)
            };
            let room_id = room.as_ref().map(|r| r.id);

            teams::record_move(
                tx,
                team_id,
                &MoveRecord {
                    position: outcome.final_position,
                    room_id,
                    finished: outcome.finished,
                    at: now,
                },
            )?;
            let roll_id = rolls::insert(tx, team_id, &outcome, room_id, now)?;

            let checkpoint = match room_id {
                Some(room_id) => {
                    let id = checkpoints::insert(
                        tx,
                        &NewCheckpoint {
                            team_id,
                            roll_id,
                            room_id,
                            position: outcome.final_position,
                            is_snake: outcome.hit_snake(),
                        },
                        now,
                    )?;
                    Some(checkpoints::get(tx, id)?)
                }
                None => None,
            };

            Ok(RollResponse {
                roll: DiceRoll {
                    id: roll_id,
                    team_id,
                    value: outcome.dice,
                    from_position: outcome.from,
                    landed_position: outcome.landed,
                    final_position: outcome.final_position,
                    rule_kind: outcome.rule,
                    room_id,
                    created_at: now,
                },
                outcome,
                team: teams::get(tx, team_id)?,
                room,
                checkpoint,
            })
        })?;

        self.changed();
        let outcome = &response.outcome;
        audit::record(
            &actor.username,
            "roll_dice",
            json!({
                "team_id": team_id,
                "dice": outcome.dice,
                "from": outcome.from,
                "to": outcome.final_position,
                "rule": outcome.rule,
                "room_id": response.room.as_ref().map(|r| r.id),
                "finished": outcome.finished,
            }),
        );
        Ok(response)
    }
}
