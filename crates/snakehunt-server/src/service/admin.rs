//! Room admin operations: approving arrivals, marking answers, adjusting
//! team clocks.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::json;

use snakehunt_core::model::Team;
use snakehunt_core::{
    answers_match, AssignmentId, AssignmentStatus, CheckpointId, CheckpointStatus, RoomId, TeamId,
    TimeLogReason,
};
use snakehunt_storage::tables::time_logs::{self, NewTimeLog};
use snakehunt_storage::tables::{assignments, checkpoints, questions, rolls, rooms, teams, users};

use super::questions::assign_question;
use super::GameService;
use crate::audit;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schema::admin::{
    ApproveResponse, AssignmentReview, CheckpointView, MarkResponse, TeamDetail,
};

impl GameService {
    /// Checkpoints in the admin's room (or everywhere), oldest first.
    pub fn list_checkpoints(
        &self,
        actor: &AuthUser,
        status: Option<CheckpointStatus>,
    ) -> Result<Vec<CheckpointView>, ApiError> {
        let conn = self.store.conn();
        let team_names = team_names(&teams::list(conn)?);
        let room_names: HashMap<RoomId, String> = rooms::list(conn)?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        Ok(checkpoints::list(conn, status, actor.room_scope())?
            .into_iter()
            .map(|checkpoint| CheckpointView {
                team_name: team_names.get(&checkpoint.team_id).cloned().unwrap_or_default(),
                room_name: room_names.get(&checkpoint.room_id).cloned().unwrap_or_default(),
                checkpoint,
            })
            .collect())
    }

    /// Confirms a team has arrived and hands it a question.
    ///
    /// The checkpoint stays pending if no question can be assigned.
    pub fn approve_checkpoint(
        &mut self,
        actor: &AuthUser,
        id: CheckpointId,
    ) -> Result<ApproveResponse, ApiError> {
        let now = Utc::now();
        let rng = &mut self.rng;
        let weights = &self.config.question_weights;

        let response = self.store.transaction(|tx| -> Result<ApproveResponse, ApiError> {
            let checkpoint = checkpoints::get(tx, id)?;
            actor.check_room(checkpoint.room_id)?;
            if checkpoint.status != CheckpointStatus::Pending {
                return Err(ApiError::Conflict(format!(
                    "checkpoint {id} is {}, not pending",
                    checkpoint.status
                )));
            }
            checkpoints::approve(tx, id, actor.id, now)?;
            let checkpoint = checkpoints::get(tx, id)?;
            let assigned = assign_question(tx, &checkpoint, weights, rng, now)?;
            Ok(ApproveResponse {
                checkpoint,
                assignment: assigned.assignment,
                question: assigned.question,
                fell_back: assigned.fell_back,
            })
        })?;

        self.changed();
        audit::record(
            &actor.username,
            "approve_checkpoint",
            json!({
                "checkpoint_id": id,
                "team_id": response.checkpoint.team_id,
                "question_id": response.question.id,
                "fell_back": response.fell_back,
            }),
        );
        Ok(response)
    }

    /// Assignments for the admin's room with their expected answers.
    ///
    /// Without a status filter only unmarked assignments are returned.
    pub fn list_assignments(
        &self,
        actor: &AuthUser,
        status: Option<AssignmentStatus>,
    ) -> Result<Vec<AssignmentReview>, ApiError> {
        let conn = self.store.conn();
        let team_names = team_names(&teams::list(conn)?);
        let mut reviews = Vec::new();
        for assignment in assignments::list(conn, status, actor.room_scope())? {
            if status.is_none() && !assignment.status.is_unmarked() {
                continue;
            }
            let question = questions::get(conn, assignment.question_id)?;
            let auto_match = assignment
                .answer_text
                .as_deref()
                .is_some_and(|given| answers_match(&question.answer, given));
            reviews.push(AssignmentReview {
                team_name: team_names.get(&assignment.team_id).cloned().unwrap_or_default(),
                kind: question.kind,
                prompt: question.prompt,
                expected_answer: question.answer,
                auto_match,
                assignment,
            });
        }
        Ok(reviews)
    }

    /// Marks an answer, completes the checkpoint and lets the team roll.
    ///
    /// An incorrect answer costs the configured wrong-answer penalty.
    pub fn mark_answer(
        &mut self,
        actor: &AuthUser,
        id: AssignmentId,
        correct: bool,
    ) -> Result<MarkResponse, ApiError> {
        let now = Utc::now();
        let penalty = if correct {
            0
        } else {
            self.config.wrong_answer_penalty_secs
        };

        let response = self.store.transaction(|tx| -> Result<MarkResponse, ApiError> {
            let assignment = assignments::get(tx, id)?;
            let checkpoint = checkpoints::get(tx, assignment.checkpoint_id)?;
            actor.check_room(checkpoint.room_id)?;
            if !assignment.status.is_unmarked() {
                return Err(ApiError::Conflict(format!(
                    "assignment {id} is already marked {}",
                    assignment.status
                )));
            }

            assignments::mark(tx, id, correct, actor.id, now)?;
            checkpoints::complete(tx, checkpoint.id, now)?;
            teams::unlock_roll(tx, assignment.team_id)?;
            if penalty != 0 {
                time_logs::record(
                    tx,
                    &NewTimeLog {
                        team_id: assignment.team_id,
                        seconds: penalty,
                        reason: TimeLogReason::WrongAnswer,
                        note: Some(format!("assignment {id}")),
                        created_by: Some(actor.id),
                    },
                    now,
                )?;
            }

            Ok(MarkResponse {
                assignment: assignments::get(tx, id)?,
                checkpoint: checkpoints::get(tx, checkpoint.id)?,
                team: teams::get(tx, assignment.team_id)?,
                penalty_seconds: penalty,
            })
        })?;

        self.changed();
        audit::record(
            &actor.username,
            "mark_answer",
            json!({
                "assignment_id": id,
                "team_id": response.team.id,
                "correct": correct,
                "penalty_seconds": penalty,
            }),
        );
        Ok(response)
    }

    /// Adds (or with a negative value removes) time on a team's clock.
    pub fn adjust_time(
        &mut self,
        actor: &AuthUser,
        team_id: TeamId,
        seconds: i64,
        note: Option<String>,
    ) -> Result<Team, ApiError> {
        if seconds == 0 {
            return Err(ApiError::BadRequest("adjustment must not be zero".to_string()));
        }
        let now = Utc::now();
        let team = self.store.transaction(|tx| -> Result<Team, ApiError> {
            teams::get(tx, team_id)?;
            time_logs::record(
                tx,
                &NewTimeLog {
                    team_id,
                    seconds,
                    reason: TimeLogReason::AdminAdjustment,
                    note: note.clone(),
                    created_by: Some(actor.id),
                },
                now,
            )?;
            Ok(teams::get(tx, team_id)?)
        })?;

        self.changed();
        audit::record(
            &actor.username,
            "adjust_time",
            json!({ "team_id": team_id, "seconds": seconds, "note": note }),
        );
        Ok(team)
    }

    pub fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        Ok(teams::list(self.store.conn())?)
    }

    pub fn team_detail(&self, team_id: TeamId) -> Result<TeamDetail, ApiError> {
        let conn = self.store.conn();
        let team = teams::get(conn, team_id)?;
        let members = users::list(conn)?
            .into_iter()
            .filter(|u| u.team_id == Some(team_id))
            .collect();
        Ok(TeamDetail {
            team,
            members,
            rolls: rolls::list_for_team(conn, team_id)?,
            checkpoints: checkpoints::list_for_team(conn, team_id)?,
            time_logs: time_logs::list_for_team(conn, team_id)?,
        })
    }
}

fn team_names(teams: &[Team]) -> HashMap<TeamId, String> {
    teams.iter().map(|t| (t.id, t.name.clone())).collect()
}

#[cfg(test)]
mod tests {
    use snakehunt_core::RoomId;

    use super::*;
    use crate::service::testing::{self, conn, player, reload};

    struct Setup {
        service: GameService,
        team: TeamId,
        room: RoomId,
        checkpoint: CheckpointId,
    }

    /// One team that has rolled into the only room.
    fn rolled() -> Setup {
        let mut service = testing::service();
        let room = testing::room(&service, "lab", 3);
        let team = testing::team(&service, "alpha");
        testing::question(&service, "capital of France", false);
        testing::question(&service, "largest planet", false);
        let checkpoint = service
            .roll_dice(&player(team), team)
            .unwrap()
            .checkpoint
            .unwrap()
            .id;
        Setup {
            service,
            team,
            room,
            checkpoint,
        }
    }

    #[test]
    fn approve_assigns_an_unseen_question() {
        let mut s = rolled();
        let admin = testing::admin(&s.service, None);
        let approved = s.service.approve_checkpoint(&admin, s.checkpoint).unwrap();
        assert_eq!(approved.checkpoint.status, CheckpointStatus::Approved);
        assert_eq!(approved.checkpoint.approved_by, Some(admin.id));
        assert_eq!(approved.assignment.status, AssignmentStatus::Assigned);
        assert!(!approved.fell_back);

        let again = s.service.approve_checkpoint(&admin, s.checkpoint).unwrap_err();
        assert!(matches!(again, ApiError::Conflict(_)));
    }

    #[test]
    fn approve_without_questions_leaves_checkpoint_pending() {
        let mut service = testing::service();
        testing::room(&service, "lab", 3);
        let team = testing::team(&service, "alpha");
        let checkpoint = service.roll_dice(&player(team), team).unwrap().checkpoint.unwrap();
        let admin = testing::admin(&service, None);

        let err = service.approve_checkpoint(&admin, checkpoint.id).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        let reloaded = checkpoints::get(conn(&service), checkpoint.id).unwrap();
        assert_eq!(reloaded.status, CheckpointStatus::Pending);
    }

    #[test]
    fn snake_checkpoint_draws_from_snake_pool() {
        let mut service = testing::service();
        testing::room(&service, "lab", 3);
        let team = testing::snake_pit(&service);
        testing::question(&service, "regular", false);
        let snake = testing::question(&service, "venom", true);
        let checkpoint = service.roll_dice(&player(team), team).unwrap().checkpoint.unwrap();
        assert!(checkpoint.is_snake);

        let admin = testing::admin(&service, None);
        let approved = service.approve_checkpoint(&admin, checkpoint.id).unwrap();
        assert_eq!(approved.question.id, snake.id);
        assert_eq!(approved.assignment.question_id, snake.id);
        assert!(!approved.fell_back);
    }

    #[test]
    fn snake_checkpoint_falls_back_to_regular_questions() {
        let mut service = testing::service();
        testing::room(&service, "lab", 3);
        let team = testing::snake_pit(&service);
        let regular = testing::question(&service, "regular", false);
        let checkpoint = service.roll_dice(&player(team), team).unwrap().checkpoint.unwrap();

        let admin = testing::admin(&service, None);
        let approved = service.approve_checkpoint(&admin, checkpoint.id).unwrap();
        assert!(approved.fell_back);
        assert_eq!(approved.question.id, regular.id);
        assert!(!approved.question.is_snake);
    }

    #[test]
    fn regular_checkpoint_never_draws_snake_questions() {
        let mut service = testing::service();
        testing::room(&service, "lab", 3);
        let team = testing::team(&service, "alpha");
        testing::question(&service, "venom", true);
        let checkpoint = service.roll_dice(&player(team), team).unwrap().checkpoint.unwrap();
        assert!(!checkpoint.is_snake);

        let admin = testing::admin(&service, None);
        let err = service.approve_checkpoint(&admin, checkpoint.id).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn questions_never_repeat_for_a_team() {
        let mut s = rolled();
        let admin = testing::admin(&s.service, None);
        let first = s.service.approve_checkpoint(&admin, s.checkpoint).unwrap();
        s.service.mark_answer(&admin, first.assignment.id, true).unwrap();

        let second_checkpoint = s
            .service
            .roll_dice(&player(s.team), s.team)
            .unwrap()
            .checkpoint
            .unwrap();
        let second = s.service.approve_checkpoint(&admin, second_checkpoint.id).unwrap();
        assert_ne!(second.question.id, first.question.id);
        s.service.mark_answer(&admin, second.assignment.id, true).unwrap();

        // Both questions are used up.
        let third_checkpoint = s
            .service
            .roll_dice(&player(s.team), s.team)
            .unwrap()
            .checkpoint
            .unwrap();
        let err = s
            .service
            .approve_checkpoint(&admin, third_checkpoint.id)
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        let reloaded = checkpoints::get(conn(&s.service), third_checkpoint.id).unwrap();
        assert_eq!(reloaded.status, CheckpointStatus::Pending);
    }

    #[test]
    fn admin_of_another_room_is_forbidden() {
        let mut s = rolled();
        let elsewhere = testing::room(&s.service, "hall", 0);
        let admin = testing::admin(&s.service, Some(elsewhere));
        let err = s.service.approve_checkpoint(&admin, s.checkpoint).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert!(s.service.list_checkpoints(&admin, None).unwrap().is_empty());

        let local = testing::admin(&s.service, Some(s.room));
        assert_eq!(s.service.list_checkpoints(&local, None).unwrap().len(), 1);
    }

    #[test]
    fn correct_answer_unlocks_roll() {
        let mut s = rolled();
        let admin = testing::admin(&s.service, None);
        let approved = s.service.approve_checkpoint(&admin, s.checkpoint).unwrap();
        let expected = approved.question.answer.to_uppercase();
        s.service
            .submit_answer(&player(s.team), s.team, &expected)
            .unwrap();

        let reviews = s.service.list_assignments(&admin, None).unwrap();
        assert_eq!(reviews.len(), 1);
        assert!(reviews[0].auto_match);

        let marked = s.service.mark_answer(&admin, approved.assignment.id, true).unwrap();
        assert_eq!(marked.assignment.status, AssignmentStatus::Correct);
        assert_eq!(marked.checkpoint.status, CheckpointStatus::Completed);
        assert!(marked.team.can_roll);
        assert_eq!(marked.team.penalty_seconds, 0);
        assert!(s.service.list_assignments(&admin, None).unwrap().is_empty());
    }

    #[test]
    fn wrong_answer_costs_time_but_unlocks_roll() {
        let mut s = rolled();
        let admin = testing::admin(&s.service, None);
        let approved = s.service.approve_checkpoint(&admin, s.checkpoint).unwrap();

        // Marking straight from `assigned` is allowed.
        let marked = s.service.mark_answer(&admin, approved.assignment.id, false).unwrap();
        assert_eq!(marked.assignment.status, AssignmentStatus::Incorrect);
        assert_eq!(marked.penalty_seconds, 300);
        assert!(marked.team.can_roll);
        assert_eq!(reload(&s.service, s.team).penalty_seconds, 300);
        testing::assert_penalty_ledger(&s.service, s.team);

        let err = s.service.mark_answer(&admin, approved.assignment.id, true).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn time_adjustments_are_signed() {
        let mut s = rolled();
        let admin = testing::admin(&s.service, None);
        s.service.adjust_time(&admin, s.team, 90, Some("late".into())).unwrap();
        let team = s.service.adjust_time(&admin, s.team, -30, None).unwrap();
        assert_eq!(team.penalty_seconds, 60);
        testing::assert_penalty_ledger(&s.service, s.team);
        assert!(matches!(
            s.service.adjust_time(&admin, s.team, 0, None),
            Err(ApiError::BadRequest(_))
        ));

        let detail = s.service.team_detail(s.team).unwrap();
        assert_eq!(detail.time_logs.len(), 2);
        assert_eq!(detail.rolls.len(), 1);
        assert_eq!(detail.checkpoints.len(), 1);
    }
}
