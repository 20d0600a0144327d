//! Event setup: rooms, maps and their rules, teams, users, questions.

use chrono::Utc;
use serde_json::json;

use snakehunt_core::model::{BoardRule, Question, Room, Team, User};
use snakehunt_core::rooms::select_map;
use snakehunt_core::{MapId, QuestionId, Role, RoomId, RuleId, TeamId};
use snakehunt_storage::tables::{maps, questions, rooms, teams, users};
use snakehunt_storage::{NewQuestion, NewRule, NewUser, QuestionUpdate, RoomUpdate};

use super::{load_board, GameService};
use crate::audit;
use crate::auth::{hash_password, AuthUser};
use crate::error::ApiError;
use crate::schema::superadmin::{CreateUserRequest, ImportQuestionsResponse, MapView};

fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::BadRequest(format!("{field} must not be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}

fn check_question(question: &NewQuestion) -> Result<(), ApiError> {
    required("prompt", &question.prompt)?;
    required("answer", &question.answer)?;
    Ok(())
}

impl GameService {
    // -- Rooms --

    pub fn create_room(&mut self, actor: &AuthUser, name: &str, capacity: u32) -> Result<Room, ApiError> {
        let name = required("room name", name)?;
        let conn = self.store.conn();
        let id = rooms::insert(conn, &name, capacity)?;
        let room = rooms::get(conn, id)?;
        audit::record(
            &actor.username,
            "create_room",
            json!({ "room_id": id, "name": name, "capacity": capacity }),
        );
        Ok(room)
    }

    pub fn list_rooms(&self) -> Result<Vec<Room>, ApiError> {
        Ok(rooms::list(self.store.conn())?)
    }

    pub fn update_room(&mut self, actor: &AuthUser, id: RoomId, update: &RoomUpdate) -> Result<Room, ApiError> {
        if let Some(name) = &update.name {
            required("room name", name)?;
        }
        let room = self
            .store
            .transaction(|tx| -> Result<Room, ApiError> { Ok(rooms::update(tx, id, update)?) })?;
        audit::record(
            &actor.username,
            "update_room",
            json!({
                "room_id": id,
                "name": update.name,
                "capacity": update.capacity,
                "is_active": update.is_active,
            }),
        );
        Ok(room)
    }

    // -- Maps --

    pub fn create_map(&mut self, actor: &AuthUser, name: &str, max_teams: u32) -> Result<MapView, ApiError> {
        let name = required("map name", name)?;
        let conn = self.store.conn();
        let id = maps::insert(conn, &name, max_teams)?;
        let map = maps::get(conn, id)?;
        audit::record(
            &actor.username,
            "create_map",
            json!({ "map_id": id, "name": name, "max_teams": max_teams }),
        );
        Ok(MapView {
            map,
            rules: Vec::new(),
        })
    }

    pub fn list_maps(&self) -> Result<Vec<MapView>, ApiError> {
        let conn = self.store.conn();
        maps::list(conn)?
            .into_iter()
            .map(|map| -> Result<MapView, ApiError> {
                let rules = maps::rules(conn, map.id)?;
                Ok(MapView { map, rules })
            })
            .collect()
    }

    /// Adds a snake or ladder, validated against the map's existing rules.
    pub fn add_rule(&mut self, actor: &AuthUser, map_id: MapId, rule: NewRule) -> Result<BoardRule, ApiError> {
        let created = self.store.transaction(|tx| -> Result<BoardRule, ApiError> {
            maps::get(tx, map_id)?;
            let board = load_board(tx, Some(map_id))?;
            board.check_candidate(rule.kind, rule.start_tile, rule.end_tile)?;
            let id = maps::insert_rule(tx, map_id, &rule)?;
            Ok(maps::get_rule(tx, id)?)
        })?;

        self.changed();
        audit::record(
            &actor.username,
            "add_rule",
            json!({
                "map_id": map_id,
                "rule_id": created.id,
                "kind": created.kind,
                "start": created.start_tile,
                "end": created.end_tile,
            }),
        );
        Ok(created)
    }

    pub fn delete_rule(&mut self, actor: &AuthUser, id: RuleId) -> Result<(), ApiError> {
        maps::delete_rule(self.store.conn(), id)?;
        self.changed();
        audit::record(&actor.username, "delete_rule", json!({ "rule_id": id }));
        Ok(())
    }

    // -- Teams --

    /// Creates a team on the least-filled active map.
    ///
    /// With no maps configured at all the team plays a board without snakes
    /// or ladders. If maps exist but all are full, creation fails.
    pub fn create_team(&mut self, actor: &AuthUser, name: &str) -> Result<Team, ApiError> {
        let name = required("team name", name)?;
        let team = self.store.transaction(|tx| -> Result<Team, ApiError> {
            let all_maps = maps::list(tx)?;
            let map_id = if all_maps.is_empty() {
                None
            } else {
                let id = select_map(&all_maps)
                    .ok_or_else(|| ApiError::Conflict("every map is full".to_string()))?;
                maps::claim_slot(tx, id)?;
                Some(id)
            };
            let id = teams::insert(tx, &name, map_id)?;
            Ok(teams::get(tx, id)?)
        })?;

        self.changed();
        audit::record(
            &actor.username,
            "create_team",
            json!({ "team_id": team.id, "name": team.name, "map_id": team.map_id }),
        );
        Ok(team)
    }

    /// Puts a team back on the start tile and erases its history. The team
    /// keeps its map and members.
    pub fn reset_team(&mut self, actor: &AuthUser, id: TeamId) -> Result<Team, ApiError> {
        let team = self.store.transaction(|tx| -> Result<Team, ApiError> {
            let team = teams::get(tx, id)?;
            if let Some(room) = team.current_room_id {
                rooms::release(tx, room)?;
            }
            teams::reset(tx, id)?;
            Ok(teams::get(tx, id)?)
        })?;

        self.changed();
        audit::record(&actor.username, "reset_team", json!({ "team_id": id }));
        Ok(team)
    }

    /// Deletes a team with its members and history, freeing its room and
    /// map slot.
    pub fn delete_team(&mut self, actor: &AuthUser, id: TeamId) -> Result<(), ApiError> {
        self.store.transaction(|tx| -> Result<(), ApiError> {
            let team = teams::get(tx, id)?;
            if let Some(room) = team.current_room_id {
                rooms::release(tx, room)?;
            }
            if let Some(map) = team.map_id {
                maps::release_slot(tx, map)?;
            }
            teams::delete(tx, id)?;
            Ok(())
        })?;

        self.changed();
        audit::record(&actor.username, "delete_team", json!({ "team_id": id }));
        Ok(())
    }

    // -- Users --

    /// Creates an account. Participants must name a team; admins may be bound
    /// to a room; superadmins take neither.
    pub fn create_user(&mut self, actor: &AuthUser, req: &CreateUserRequest) -> Result<User, ApiError> {
        let username = required("username", &req.username)?;
        if req.password.chars().count() < 4 {
            return Err(ApiError::BadRequest(
                "password must be at least 4 characters".to_string(),
            ));
        }
        let (team_id, room_id) = match req.role {
            Role::Participant => {
                let team = req.team_id.ok_or_else(|| {
                    ApiError::BadRequest("participants must belong to a team".to_string())
                })?;
                if req.room_id.is_some() {
                    return Err(ApiError::BadRequest(
                        "participants cannot be bound to a room".to_string(),
                    ));
                }
                (Some(team), None)
            }
            Role::Admin => {
                if req.team_id.is_some() {
                    return Err(ApiError::BadRequest("admins cannot join a team".to_string()));
                }
                (None, req.room_id)
            }
            Role::SuperAdmin => {
                if req.team_id.is_some() || req.room_id.is_some() {
                    return Err(ApiError::BadRequest(
                        "superadmins take no team or room".to_string(),
                    ));
                }
                (None, None)
            }
        };

        let password_hash = hash_password(&req.password);
        let role = req.role;
        let user = self.store.transaction(|tx| -> Result<User, ApiError> {
            if let Some(team) = team_id {
                teams::get(tx, team)?;
            }
            if let Some(room) = room_id {
                rooms::get(tx, room)?;
            }
            let id = users::insert(
                tx,
                &NewUser {
                    username,
                    password_hash,
                    role,
                    team_id,
                    room_id,
                },
            )?;
            Ok(users::get(tx, id)?)
        })?;

        audit::record(
            &actor.username,
            "create_user",
            json!({
                "user_id": user.id,
                "username": user.username,
                "role": user.role,
                "team_id": user.team_id,
                "room_id": user.room_id,
            }),
        );
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(users::list(self.store.conn())?)
    }

    // -- Questions --

    pub fn create_question(&mut self, actor: &AuthUser, question: &NewQuestion) -> Result<Question, ApiError> {
        check_question(question)?;
        let conn = self.store.conn();
        let id = questions::insert(conn, question)?;
        audit::record(
            &actor.username,
            "create_question",
            json!({ "question_id": id, "kind": question.kind, "is_snake": question.is_snake }),
        );
        Ok(questions::get(conn, id)?)
    }

    pub fn list_questions(&self) -> Result<Vec<Question>, ApiError> {
        Ok(questions::list(self.store.conn())?)
    }

    pub fn update_question(
        &mut self,
        actor: &AuthUser,
        id: QuestionId,
        update: &QuestionUpdate,
    ) -> Result<Question, ApiError> {
        if let Some(prompt) = &update.prompt {
            required("prompt", prompt)?;
        }
        if let Some(answer) = &update.answer {
            required("answer", answer)?;
        }
        let question = self
            .store
            .transaction(|tx| -> Result<Question, ApiError> { Ok(questions::update(tx, id, update)?) })?;
        audit::record(
            &actor.username,
            "update_question",
            json!({ "question_id": id, "is_active": question.is_active }),
        );
        Ok(question)
    }

    /// Inserts a batch of questions. Either every question is stored or none.
    pub fn import_questions(
        &mut self,
        actor: &AuthUser,
        batch: &[NewQuestion],
    ) -> Result<ImportQuestionsResponse, ApiError> {
        for (i, question) in batch.iter().enumerate() {
            check_question(question)
                .map_err(|e| ApiError::BadRequest(format!("question #{}: {e}", i + 1)))?;
        }
        let ids = self.store.transaction(|tx| -> Result<Vec<QuestionId>, ApiError> {
            batch
                .iter()
                .map(|q| questions::insert(tx, q).map_err(ApiError::from))
                .collect()
        })?;

        audit::record(
            &actor.username,
            "import_questions",
            json!({ "count": ids.len(), "at": Utc::now() }),
        );
        Ok(ImportQuestionsResponse {
            imported: ids.len(),
            ids,
        })
    }
}
