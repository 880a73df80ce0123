use anyhow::Result;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

use shared::{Child, ChildForm, ChildQuery, Chore, ChoreQuery, ChoreSort, DueWindow, Task, TaskForm, TaskQuery};

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:chores.db";

const CHORE_SELECT: &str = "SELECT chores.id, chores.child_id, chores.task_id, \
     children.first_name || ' ' || children.last_name AS child_name, \
     tasks.name AS task_name, chores.due_on, chores.completed \
     FROM chores \
     JOIN children ON children.id = chores.child_id \
     JOIN tasks ON tasks.id = chores.task_id";

/// DbConnection manages database operations for children, tasks, and chores
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection.
    ///
    /// Foreign keys are enforced on every pooled connection so deleting a
    /// child or task cascades to its chores.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Create children table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS children (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                active BOOLEAN NOT NULL DEFAULT TRUE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for the alphabetical listing order
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_children_name
            ON children(last_name, first_name);
            "#,
        )
        .execute(pool)
        .await?;

        // Create tasks table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                points INTEGER NOT NULL,
                active BOOLEAN NOT NULL DEFAULT TRUE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_tasks_name
            ON tasks(name);
            "#,
        )
        .execute(pool)
        .await?;

        // Create chores table; dependent chores go away with their child/task
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                child_id INTEGER NOT NULL,
                task_id INTEGER NOT NULL,
                due_on DATE NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE,
                FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE,
                FOREIGN KEY (task_id) REFERENCES tasks (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_chores_due_on
            ON chores(due_on);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // Child operations

    /// Insert a new child and return it with its assigned id
    pub async fn insert_child(&self, form: &ChildForm) -> Result<Child> {
        let result = sqlx::query(
            "INSERT INTO children (first_name, last_name, active) VALUES (?, ?, ?)",
        )
        .bind(&form.first_name)
        .bind(&form.last_name)
        .bind(form.active)
        .execute(&*self.pool)
        .await?;

        Ok(Child {
            id: result.last_insert_rowid(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            active: form.active,
        })
    }

    /// Retrieve a child by id
    pub async fn get_child(&self, id: i64) -> Result<Option<Child>> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, active FROM children WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| Child {
            id: r.get("id"),
            first_name: r.get("first_name"),
            last_name: r.get("last_name"),
            active: r.get("active"),
        }))
    }

    /// List children alphabetically by (last_name, first_name)
    pub async fn list_children(&self, query: &ChildQuery) -> Result<Vec<Child>> {
        let sql = if query.active_only {
            "SELECT id, first_name, last_name, active FROM children \
             WHERE active = 1 ORDER BY last_name, first_name"
        } else {
            "SELECT id, first_name, last_name, active FROM children \
             ORDER BY last_name, first_name"
        };

        let rows = sqlx::query(sql).fetch_all(&*self.pool).await?;

        let children = rows
            .iter()
            .map(|r| Child {
                id: r.get("id"),
                first_name: r.get("first_name"),
                last_name: r.get("last_name"),
                active: r.get("active"),
            })
            .collect();

        Ok(children)
    }

    /// Update a child; returns false when no row with that id exists
    pub async fn update_child(&self, id: i64, form: &ChildForm) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE children SET first_name = ?, last_name = ?, active = ? WHERE id = ?",
        )
        .bind(&form.first_name)
        .bind(&form.last_name)
        .bind(form.active)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a child by id; dependent chores are removed by the cascade
    pub async fn delete_child(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM children WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a child with the given id exists
    pub async fn child_exists(&self, id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM children WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Sum of task points over a child's completed chores
    pub async fn points_earned(&self, child_id: i64) -> Result<i64> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(tasks.points), 0) AS points
            FROM chores
            JOIN tasks ON tasks.id = chores.task_id
            WHERE chores.child_id = ? AND chores.completed = 1
            "#,
        )
        .bind(child_id)
        .fetch_one(&*self.pool)
        .await?;

        Ok(row.get("points"))
    }

    // Task operations

    /// Insert a new task and return it with its assigned id
    pub async fn insert_task(&self, form: &TaskForm) -> Result<Task> {
        let result = sqlx::query("INSERT INTO tasks (name, points, active) VALUES (?, ?, ?)")
            .bind(&form.name)
            .bind(form.points)
            .bind(form.active)
            .execute(&*self.pool)
            .await?;

        Ok(Task {
            id: result.last_insert_rowid(),
            name: form.name.clone(),
            points: form.points,
            active: form.active,
        })
    }

    /// Retrieve a task by id
    pub async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let row = sqlx::query("SELECT id, name, points, active FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| Task {
            id: r.get("id"),
            name: r.get("name"),
            points: r.get("points"),
            active: r.get("active"),
        }))
    }

    /// List tasks alphabetically by name
    pub async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let sql = if query.active_only {
            "SELECT id, name, points, active FROM tasks WHERE active = 1 ORDER BY name"
        } else {
            "SELECT id, name, points, active FROM tasks ORDER BY name"
        };

        let rows = sqlx::query(sql).fetch_all(&*self.pool).await?;

        let tasks = rows
            .iter()
            .map(|r| Task {
                id: r.get("id"),
                name: r.get("name"),
                points: r.get("points"),
                active: r.get("active"),
            })
            .collect();

        Ok(tasks)
    }

    /// Update a task; returns false when no row with that id exists
    pub async fn update_task(&self, id: i64, form: &TaskForm) -> Result<bool> {
        let result = sqlx::query("UPDATE tasks SET name = ?, points = ?, active = ? WHERE id = ?")
            .bind(&form.name)
            .bind(form.points)
            .bind(form.active)
            .bind(id)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a task by id; dependent chores are removed by the cascade
    pub async fn delete_task(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a task with the given id exists
    pub async fn task_exists(&self, id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.is_some())
    }

    // Chore operations

    /// Insert a new chore and return it with its joined child and task names
    pub async fn insert_chore(
        &self,
        child_id: i64,
        task_id: i64,
        due_on: NaiveDate,
        completed: bool,
    ) -> Result<Chore> {
        let result = sqlx::query(
            "INSERT INTO chores (child_id, task_id, due_on, completed) VALUES (?, ?, ?, ?)",
        )
        .bind(child_id)
        .bind(task_id)
        .bind(due_on)
        .bind(completed)
        .execute(&*self.pool)
        .await?;

        let id = result.last_insert_rowid();
        let chore = self
            .get_chore(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("chore {} missing after insert", id))?;

        Ok(chore)
    }

    /// Retrieve a chore by id, with child and task names joined in
    pub async fn get_chore(&self, id: i64) -> Result<Option<Chore>> {
        let sql = format!("{} WHERE chores.id = ?", CHORE_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| Self::chore_from_row(&r)))
    }

    /// List chores per the given query specification.
    ///
    /// `today` anchors the upcoming/past windows; the caller supplies it so
    /// the SQL stays deterministic under test.
    pub async fn list_chores(&self, query: &ChoreQuery, today: NaiveDate) -> Result<Vec<Chore>> {
        let mut sql = format!("{} WHERE 1 = 1", CHORE_SELECT);

        if query.completed.is_some() {
            sql.push_str(" AND chores.completed = ?");
        }
        match query.due {
            Some(DueWindow::Upcoming) => sql.push_str(" AND chores.due_on >= ?"),
            Some(DueWindow::Past) => sql.push_str(" AND chores.due_on < ?"),
            None => {}
        }
        match query.sort {
            ChoreSort::Chronological => sql.push_str(" ORDER BY chores.due_on, tasks.name"),
            ChoreSort::ByTask => sql.push_str(" ORDER BY tasks.name"),
        }

        let mut q = sqlx::query(&sql);
        if let Some(completed) = query.completed {
            q = q.bind(completed);
        }
        if query.due.is_some() {
            q = q.bind(today);
        }

        let rows = q.fetch_all(&*self.pool).await?;
        let chores = rows.iter().map(Self::chore_from_row).collect();

        Ok(chores)
    }

    /// Update a chore; returns false when no row with that id exists
    pub async fn update_chore(
        &self,
        id: i64,
        child_id: i64,
        task_id: i64,
        due_on: NaiveDate,
        completed: bool,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE chores SET child_id = ?, task_id = ?, due_on = ?, completed = ? WHERE id = ?",
        )
        .bind(child_id)
        .bind(task_id)
        .bind(due_on)
        .bind(completed)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a chore by id
    pub async fn delete_chore(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM chores WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn chore_from_row(row: &SqliteRow) -> Chore {
        Chore {
            id: row.get("id"),
            child_id: row.get("child_id"),
            task_id: row.get("task_id"),
            child_name: row.get("child_name"),
            task_name: row.get("task_name"),
            due_on: row.get("due_on"),
            completed: row.get("completed"),
        }
    }
}
