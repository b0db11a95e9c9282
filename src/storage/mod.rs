use anyhow::{Context as _, Result};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};

/// Default timeout for individual SQLite queries.
/// Prevents hung queries from blocking the server indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
/// Returns an error if the operation takes longer than `QUERY_TIMEOUT`.
async fn with_timeout<T>(fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "database query timed out after {}s",
            QUERY_TIMEOUT.as_secs()
        )),
    }
}

// ─── Row types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// RFC 3339 completion timestamp. NULL means the task is incomplete.
    pub completed_at: Option<String>,
    /// Owning goal. NULL until the task is explicitly attached to one.
    pub goal_id: Option<i64>,
}

impl TaskRow {
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalRow {
    pub id: i64,
    pub title: String,
}

/// Ordering for `list_tasks`. Asc/Desc sort by title with SQLite's BINARY
/// collation (case-sensitive); Unsorted leaves the store's native order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleOrder {
    Unsorted,
    Asc,
    Desc,
}

// ─── Storage ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        Self::new_with_slow_query(data_dir, 0).await
    }

    /// Create storage with slow-query logging enabled.
    ///
    /// `slow_query_ms` is the threshold in milliseconds — queries exceeding it are
    /// logged at WARN level. Set to 0 to disable slow-query logging.
    pub async fn new_with_slow_query(data_dir: &Path, slow_query_ms: u64) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("taskd.db");
        let mut opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        if slow_query_ms > 0 {
            use sqlx::ConnectOptions as _;
            opts = opts.log_slow_statements(
                log::LevelFilter::Warn,
                std::time::Duration::from_millis(slow_query_ms),
            );
        }

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Return a clone of the connection pool (cheap — Arc-backed).
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        // AUTOINCREMENT keeps ids monotonic: a deleted row's id is never handed
        // out again.
        let stmts = [
            "CREATE TABLE IF NOT EXISTS goals (
                 id    INTEGER PRIMARY KEY AUTOINCREMENT,
                 title TEXT NOT NULL
             )",
            "CREATE TABLE IF NOT EXISTS tasks (
                 id           INTEGER PRIMARY KEY AUTOINCREMENT,
                 title        TEXT NOT NULL,
                 description  TEXT NOT NULL,
                 completed_at TEXT,
                 goal_id      INTEGER REFERENCES goals(id)
             )",
            "CREATE INDEX IF NOT EXISTS idx_tasks_goal ON tasks(goal_id)",
        ];
        for stmt in stmts {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .context("Failed to run database migrations")?;
        }
        Ok(())
    }

    // ─── Tasks ──────────────────────────────────────────────────────────────

    pub async fn create_task(
        &self,
        title: &str,
        description: &str,
        completed_at: Option<&str>,
    ) -> Result<TaskRow> {
        let id = sqlx::query(
            "INSERT INTO tasks (title, description, completed_at) VALUES (?, ?, ?)",
        )
        .bind(title)
        .bind(description)
        .bind(completed_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();
        self.get_task(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("task not found after insert"))
    }

    pub async fn get_task(&self, id: i64) -> Result<Option<TaskRow>> {
        Ok(sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_tasks(&self, order: TitleOrder) -> Result<Vec<TaskRow>> {
        let sql = match order {
            TitleOrder::Asc => "SELECT * FROM tasks ORDER BY title ASC",
            TitleOrder::Desc => "SELECT * FROM tasks ORDER BY title DESC",
            TitleOrder::Unsorted => "SELECT * FROM tasks",
        };
        with_timeout(async { Ok(sqlx::query_as(sql).fetch_all(&self.pool).await?) }).await
    }

    /// Overwrite title and description. `completed_at` and `goal_id` are untouched.
    pub async fn update_task(&self, id: i64, title: &str, description: &str) -> Result<TaskRow> {
        sqlx::query("UPDATE tasks SET title = ?, description = ? WHERE id = ?")
            .bind(title)
            .bind(description)
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.get_task(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("task not found after update"))
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Set or clear the completion timestamp (RFC 3339; None = incomplete).
    pub async fn set_task_completed_at(
        &self,
        id: i64,
        completed_at: Option<&str>,
    ) -> Result<TaskRow> {
        sqlx::query("UPDATE tasks SET completed_at = ? WHERE id = ?")
            .bind(completed_at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.get_task(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("task not found after update"))
    }

    /// Point a task at a goal. One UPDATE + commit per call — a multi-task
    /// attach that fails partway leaves earlier attachments committed.
    pub async fn attach_task_to_goal(&self, task_id: i64, goal_id: i64) -> Result<()> {
        sqlx::query("UPDATE tasks SET goal_id = ? WHERE id = ?")
            .bind(goal_id)
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Goals ──────────────────────────────────────────────────────────────

    pub async fn create_goal(&self, title: &str) -> Result<GoalRow> {
        let id = sqlx::query("INSERT INTO goals (title) VALUES (?)")
            .bind(title)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        self.get_goal(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("goal not found after insert"))
    }

    pub async fn get_goal(&self, id: i64) -> Result<Option<GoalRow>> {
        Ok(sqlx::query_as("SELECT * FROM goals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_goals(&self) -> Result<Vec<GoalRow>> {
        with_timeout(async {
            Ok(sqlx::query_as("SELECT * FROM goals")
                .fetch_all(&self.pool)
                .await?)
        })
        .await
    }

    pub async fn update_goal(&self, id: i64, title: &str) -> Result<GoalRow> {
        sqlx::query("UPDATE goals SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.get_goal(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("goal not found after update"))
    }

    /// Delete a goal. Attached tasks survive with their `goal_id` cleared,
    /// in the same transaction — the store never holds a dangling reference.
    pub async fn delete_goal(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE tasks SET goal_id = NULL WHERE goal_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM goals WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Every task currently pointing at this goal, in insertion order.
    pub async fn tasks_for_goal(&self, goal_id: i64) -> Result<Vec<TaskRow>> {
        Ok(
            sqlx::query_as("SELECT * FROM tasks WHERE goal_id = ? ORDER BY id ASC")
                .bind(goal_id)
                .fetch_all(&self.pool)
                .await?,
        )
    }
}
