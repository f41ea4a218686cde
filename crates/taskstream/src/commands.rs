//! Command handlers wiring the CLI to the app services.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use time::{Date, OffsetDateTime, macros::format_description};

use taskstream_app::{
    AppConfig, AuthService, BoardStore, FileBoardStore, FileSessionStore, LogSink, MemoryDirectory,
    NoticeSink, SessionStore, TaskBoard, demo_tasks,
};
use taskstream_core::{
    LoginCredentials, Patch, Provider, QuickFilter, SignupCredentials, TaskChanges, TaskDraft,
    TaskId, TaskStatus, UserId,
};

use crate::Command;
use crate::view;

const TASKS_FILE: &str = "tasks.json";
const SESSION_FILE: &str = "session.json";

/// Execute one parsed command against the stores in `data_dir`.
///
/// # Errors
/// Returns an error when a store cannot be accessed or the command's inputs
/// do not validate.
#[allow(clippy::too_many_lines)]
pub fn run(data_dir: &Path, command: Command) -> Result<()> {
    match command {
        Command::Add {
            title,
            description,
            status,
            priority,
            due,
            assign,
            shared,
        } => {
            let mut board = load_board(data_dir)?;
            let draft = TaskDraft {
                title,
                description,
                status: status.as_deref().map(str::parse).transpose()?.unwrap_or_default(),
                priority: priority.as_deref().map(str::parse).transpose()?.unwrap_or_default(),
                due_date: due.as_deref().map(parse_due).transpose()?,
                assigned_to: assign,
                shared_with: shared,
            };
            let line = view::task_line(board.create(draft)?);
            println!("{line}");
            save_board(data_dir, &board)
        }

        Command::Ls { search, filter } => {
            let board = load_board(data_dir)?;
            let filter: QuickFilter = filter.parse()?;
            let tasks = board.search(&search, filter);
            if tasks.is_empty() {
                println!("no tasks match");
            }
            for task in &tasks {
                println!("{}", view::task_line(task));
            }
            Ok(())
        }

        Command::Edit {
            task,
            title,
            description,
            status,
            priority,
            due,
            assign,
            shared,
        } => {
            let id = parse_task_id(&task)?;
            let mut board = load_board(data_dir)?;
            let changes = TaskChanges {
                title,
                description: description.map(text_patch),
                status: status.as_deref().map(str::parse).transpose()?,
                priority: priority.as_deref().map(str::parse).transpose()?,
                due_date: due.as_deref().map(due_patch).transpose()?,
                assigned_to: assign.map(text_patch),
                shared_with: shared,
            };
            let line = view::task_line(board.update(id, changes)?);
            println!("{line}");
            save_board(data_dir, &board)
        }

        Command::Done { task } => {
            let id = parse_task_id(&task)?;
            let mut board = load_board(data_dir)?;
            let line = view::task_line(board.change_status(id, TaskStatus::Completed)?);
            println!("{line}");
            save_board(data_dir, &board)
        }

        Command::Rm { task } => {
            let id = parse_task_id(&task)?;
            let mut board = load_board(data_dir)?;
            board.delete(id);
            save_board(data_dir, &board)
        }

        Command::Stats => {
            let board = load_board(data_dir)?;
            print!("{}", view::stats_block(&board.stats()));
            Ok(())
        }

        Command::Seed => {
            let store = board_store(data_dir);
            let mut tasks = store.load()?;
            let seeded = demo_tasks(board_owner(data_dir)?);
            println!("seeded {} demonstration tasks", seeded.len());
            tasks.extend(seeded);
            store.save(&tasks)?;
            Ok(())
        }

        Command::Login { email, password } => {
            let service = auth_service(data_dir)?;
            service.initialize()?;
            let user = runtime()?.block_on(service.login(LoginCredentials { email, password }))?;
            println!("signed in as {} <{}>", user.name, user.email);
            Ok(())
        }

        Command::LoginWith { provider } => {
            let provider: Provider = provider.parse()?;
            let service = auth_service(data_dir)?;
            service.initialize()?;
            let user = runtime()?.block_on(service.login_with_provider(provider))?;
            println!("signed in as {} <{}>", user.name, user.email);
            Ok(())
        }

        Command::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let service = auth_service(data_dir)?;
            service.initialize()?;
            let user = runtime()?.block_on(service.signup(SignupCredentials {
                name,
                email,
                password,
                confirm_password,
            }))?;
            println!("signed in as {} <{}>", user.name, user.email);
            Ok(())
        }

        Command::Logout => {
            let service = auth_service(data_dir)?;
            service.initialize()?;
            service.logout()?;
            println!("signed out");
            Ok(())
        }

        Command::Whoami => {
            let service = auth_service(data_dir)?;
            let phase = service.initialize()?;
            match phase.user() {
                Some(user) => println!("{} <{}>", user.name, user.email),
                None => println!("not signed in"),
            }
            Ok(())
        }
    }
}

fn board_store(data_dir: &Path) -> FileBoardStore {
    FileBoardStore::new(data_dir.join(TASKS_FILE))
}

fn session_store(data_dir: &Path) -> FileSessionStore {
    FileSessionStore::new(data_dir.join(SESSION_FILE))
}

fn load_board(data_dir: &Path) -> Result<TaskBoard> {
    let tasks = board_store(data_dir).load()?;
    Ok(TaskBoard::with_tasks(
        tasks,
        board_owner(data_dir)?,
        Arc::new(LogSink) as Arc<dyn NoticeSink>,
    ))
}

/// Tasks created before sign-in belong to the anonymous (nil) id.
fn board_owner(data_dir: &Path) -> Result<UserId> {
    Ok(session_store(data_dir)
        .load()?
        .map_or_else(UserId::default, |user| user.id))
}

fn save_board(data_dir: &Path, board: &TaskBoard) -> Result<()> {
    board_store(data_dir).save(board.tasks())?;
    Ok(())
}

fn auth_service(data_dir: &Path) -> Result<AuthService<MemoryDirectory, FileSessionStore>> {
    let config = AppConfig::load(data_dir)?;
    Ok(AuthService::new(
        MemoryDirectory::with_demo_users(),
        session_store(data_dir),
        Arc::new(LogSink) as Arc<dyn NoticeSink>,
    )
    .with_latency(config.auth.latency(), config.auth.provider_latency()))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Runtime::new()?)
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    raw.trim()
        .parse()
        .with_context(|| format!("invalid task id: {raw}"))
}

fn parse_due(raw: &str) -> Result<OffsetDateTime> {
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(raw.trim(), &format)
        .with_context(|| format!("invalid due date: {raw} (expected YYYY-MM-DD)"))?;
    Ok(date.midnight().assume_utc())
}

fn text_patch(raw: String) -> Patch<String> {
    if raw.trim().is_empty() {
        Patch::Clear
    } else {
        Patch::Set(raw)
    }
}

fn due_patch(raw: &str) -> Result<Patch<OffsetDateTime>> {
    if raw.trim().is_empty() {
        Ok(Patch::Clear)
    } else {
        Ok(Patch::Set(parse_due(raw)?))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use taskstream_core::TaskPriority;
    use tempfile::TempDir;

    fn data_dir() -> TempDir {
        let dir = TempDir::new().expect("create temp dir");
        // Zero latency keeps the auth commands instant under test.
        std::fs::write(
            dir.path().join("config.toml"),
            "[auth]\nlatency_ms = 0\nprovider_latency_ms = 0\n",
        )
        .expect("write config");
        dir
    }

    fn add(dir: &TempDir, title: &str) {
        run(
            dir.path(),
            Command::Add {
                title: title.into(),
                description: None,
                status: None,
                priority: Some("high".into()),
                due: Some("2025-07-07".into()),
                assign: None,
                shared: vec![],
            },
        )
        .expect("add task");
    }

    #[test]
    fn add_persists_a_task() {
        let dir = data_dir();
        add(&dir, "Write spec");

        let tasks = board_store(dir.path()).load().expect("load board");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Write spec");
        assert_eq!(tasks[0].priority, TaskPriority::High);
        assert_eq!(
            tasks[0].due_date,
            Some(parse_due("2025-07-07").expect("parse due"))
        );
    }

    #[test]
    fn done_marks_the_task_completed() {
        let dir = data_dir();
        add(&dir, "Finish review");
        let id = board_store(dir.path()).load().expect("load board")[0].id;

        run(
            dir.path(),
            Command::Done {
                task: id.to_string(),
            },
        )
        .expect("complete task");

        let tasks = board_store(dir.path()).load().expect("load board");
        assert_eq!(tasks[0].status, TaskStatus::Completed);
    }

    #[test]
    fn rm_of_unknown_id_is_a_no_op() {
        let dir = data_dir();
        add(&dir, "Keep me");

        run(
            dir.path(),
            Command::Rm {
                task: TaskId::new().to_string(),
            },
        )
        .expect("remove unknown id");

        assert_eq!(board_store(dir.path()).load().expect("load board").len(), 1);
    }

    #[test]
    fn seed_appends_the_demo_tasks() {
        let dir = data_dir();
        run(dir.path(), Command::Seed).expect("seed board");
        assert_eq!(board_store(dir.path()).load().expect("load board").len(), 3);
    }

    #[test]
    fn login_then_logout_round_trips_the_session() {
        let dir = data_dir();

        run(
            dir.path(),
            Command::Login {
                email: "john@example.com".into(),
                password: "password".into(),
            },
        )
        .expect("login");
        let session = session_store(dir.path()).load().expect("load session");
        assert_eq!(session.map(|user| user.name), Some("John Doe".into()));

        run(dir.path(), Command::Logout).expect("logout");
        assert_eq!(session_store(dir.path()).load().expect("load session"), None);
    }

    #[test]
    fn login_with_bad_password_fails() {
        let dir = data_dir();
        let result = run(
            dir.path(),
            Command::Login {
                email: "john@example.com".into(),
                password: "wrong".into(),
            },
        );
        assert!(result.is_err());
        assert_eq!(session_store(dir.path()).load().expect("load session"), None);
    }

    #[test]
    fn edit_clears_fields_with_empty_strings() {
        let dir = data_dir();
        add(&dir, "Trim me");
        let id = board_store(dir.path()).load().expect("load board")[0].id;

        run(
            dir.path(),
            Command::Edit {
                task: id.to_string(),
                title: None,
                description: None,
                status: Some("in-progress".into()),
                priority: None,
                due: Some(String::new()),
                assign: None,
                shared: None,
            },
        )
        .expect("edit task");

        let tasks = board_store(dir.path()).load().expect("load board");
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert_eq!(tasks[0].due_date, None);
    }
}
