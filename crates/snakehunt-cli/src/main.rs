//! Snakehunt operator CLI.
//!
//! Provides the `snakehunt` binary for event setup that is easier from a
//! shell than over HTTP: creating accounts, bulk-importing questions and
//! printing the standings. Every subcommand goes through the same
//! `GameService` the HTTP server uses, acting as a system superadmin.

use std::fs;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use snakehunt_core::{Role, RoomId, TeamId};
use snakehunt_server::auth::AuthUser;
use snakehunt_server::cache::TtlCache;
use snakehunt_server::config::{ConfigError, GameConfig, ServerConfig};
use snakehunt_server::schema::superadmin::CreateUserRequest;
use snakehunt_server::service::GameService;
use snakehunt_storage::NewQuestion;

/// Snake & Ladders event tools.
#[derive(Parser)]
#[command(name = "snakehunt", about = "Snake & Ladders event tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a login account.
    CreateUser {
        /// Path to the event database file.
        #[arg(short, long)]
        db: String,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        /// participant, admin or superadmin.
        #[arg(short, long)]
        role: String,

        /// Team for a participant.
        #[arg(long)]
        team: Option<i64>,

        /// Room an admin is bound to.
        #[arg(long)]
        room: Option<i64>,
    },
    /// Import questions from a JSON file.
    ImportQuestions {
        #[arg(short, long)]
        db: String,

        /// A JSON array of questions, or an object with a `questions` array.
        #[arg(short, long)]
        file: String,
    },
    /// Print the current standings as JSON.
    Leaderboard {
        #[arg(short, long)]
        db: String,
    },
}

/// Accepted layouts of a question file.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionFile {
    Bare(Vec<NewQuestion>),
    Wrapped { questions: Vec<NewQuestion> },
}

impl QuestionFile {
    fn into_questions(self) -> Vec<NewQuestion> {
        match self {
            QuestionFile::Bare(questions) | QuestionFile::Wrapped { questions } => questions,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::CreateUser {
            db,
            username,
            password,
            role,
            team,
            room,
        } => run_create_user(&db, username, password, &role, team, room),
        Commands::ImportQuestions { db, file } => run_import(&db, &file),
        Commands::Leaderboard { db } => run_leaderboard(&db),
    };
    process::exit(exit_code);
}

/// Game settings from the same `SNAKEHUNT_*` variables the server reads.
fn game_settings<F>(lookup: F) -> Result<GameConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    ServerConfig::from_lookup(lookup).map(|config| config.game)
}

/// Opens the service, or reports the failure and returns exit code 2 (bad
/// settings) or 3 (database).
fn open(db_path: &str) -> Result<GameService, i32> {
    let game = game_settings(|var| std::env::var(var).ok()).map_err(|e| {
        eprintln!("Error: {}", e);
        2
    })?;
    // The CLI is short-lived, so nothing is worth caching.
    let cache = Arc::new(TtlCache::new(Duration::ZERO));
    GameService::new(db_path, game, cache).map_err(|e| {
        eprintln!("Error: failed to open database '{}': {}", db_path, e);
        3
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to serialize result: {}", e);
            1
        }
    }
}

/// Exit codes: 0 = success, 1 = rejected by the game, 2 = bad arguments,
/// 3 = I/O error.
fn run_create_user(
    db_path: &str,
    username: String,
    password: String,
    role: &str,
    team: Option<i64>,
    room: Option<i64>,
) -> i32 {
    let role: Role = match role.parse() {
        Ok(role) => role,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };
    let mut service = match open(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let req = CreateUserRequest {
        username,
        password,
        role,
        team_id: team.map(TeamId),
        room_id: room.map(RoomId),
    };
    match service.create_user(&AuthUser::system("cli"), &req) {
        Ok(user) => print_json(&user),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn run_import(db_path: &str, file: &str) -> i32 {
    let raw = match fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", file, e);
            return 3;
        }
    };
    let questions = match serde_json::from_str::<QuestionFile>(&raw) {
        Ok(parsed) => parsed.into_questions(),
        Err(e) => {
            eprintln!("Error: '{}' is not a question list: {}", file, e);
            return 2;
        }
    };
    let mut service = match open(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match service.import_questions(&AuthUser::system("cli"), &questions) {
        Ok(result) => print_json(&result),
        Err(e) => {
            eprintln!("Error: import rejected, nothing was stored: {}", e);
            1
        }
    }
}

fn run_leaderboard(db_path: &str) -> i32 {
    let service = match open(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    match service.leaderboard() {
        Ok(board) => print_json(&board),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
