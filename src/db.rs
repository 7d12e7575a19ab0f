use std::borrow::Cow;
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Row};

use crate::error::AppError;
use crate::types::{self, Queue, QueueType, Request, RequestStatus, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Sqlite,
    Postgres,
}

pub fn db_kind_from_url(url: &str) -> DbKind {
    let lower = url.to_lowercase();
    if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
        DbKind::Postgres
    } else {
        DbKind::Sqlite
    }
}

/// Statements are written with `?` placeholders; Postgres wants `$1, $2, ...`.
pub fn rewrite_sql(sql: &str, kind: DbKind) -> Cow<'_, str> {
    match kind {
        DbKind::Sqlite => Cow::Borrowed(sql),
        DbKind::Postgres => {
            let mut out = String::with_capacity(sql.len() + 8);
            let mut idx = 1;
            for ch in sql.chars() {
                if ch == '?' {
                    out.push('$');
                    out.push_str(&idx.to_string());
                    idx += 1;
                } else {
                    out.push(ch);
                }
            }
            Cow::Owned(out)
        }
    }
}

pub fn i64_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().unwrap_or_default()
}

pub fn datetime_to_i64(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}

pub async fn init_db(pool: &AnyPool, kind: DbKind) -> Result<(), AppError> {
    let stmts = [
        r#"CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )"#,
        r#"CREATE TABLE IF NOT EXISTS queues (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            queue_type TEXT NOT NULL,
            owner TEXT,
            channel TEXT,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )"#,
        r#"CREATE INDEX IF NOT EXISTS idx_queues_channel ON queues(channel, queue_type)"#,
        r#"CREATE UNIQUE INDEX IF NOT EXISTS idx_queues_personal_owner
            ON queues(owner) WHERE queue_type = 'personal'"#,
        r#"CREATE TABLE IF NOT EXISTS requests (
            id TEXT PRIMARY KEY,
            queue_id TEXT NOT NULL,
            description TEXT NOT NULL,
            status TEXT NOT NULL,
            owner TEXT NOT NULL,
            assignee TEXT,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )"#,
        r#"CREATE INDEX IF NOT EXISTS idx_requests_queue ON requests(queue_id, created_at)"#,
    ];

    for stmt in stmts {
        let sql = rewrite_sql(stmt, kind);
        sqlx::query(sql.as_ref())
            .execute(pool)
            .await
            .map_err(|err| AppError::data_access("initialise schema", err))?;
    }

    Ok(())
}

/// One entry of a record's field↔column table. Fields use the JSON (camelCase) names.
///
/// Nullable columns are selected as `COALESCE(column, '')`: the `Any` driver cannot decode a
/// SQLite NULL into `Option<String>`, so readers map the empty string back to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub field: &'static str,
    pub column: &'static str,
    pub nullable: bool,
}

const fn col(field: &'static str, column: &'static str) -> ColumnMap {
    ColumnMap {
        field,
        column,
        nullable: false,
    }
}

const fn opt_col(field: &'static str, column: &'static str) -> ColumnMap {
    ColumnMap {
        field,
        column,
        nullable: true,
    }
}

impl ColumnMap {
    /// The select-list expression for this column.
    pub fn select_expr(&self) -> Cow<'static, str> {
        if self.nullable {
            Cow::Owned(format!("COALESCE({0}, '') AS {0}", self.column))
        } else {
            Cow::Borrowed(self.column)
        }
    }
}

pub fn column_for(map: &[ColumnMap], field: &str) -> Option<&'static str> {
    map.iter().find(|m| m.field == field).map(|m| m.column)
}

pub fn field_for(map: &[ColumnMap], column: &str) -> Option<&'static str> {
    map.iter().find(|m| m.column == column).map(|m| m.field)
}

pub const QUEUE_COLUMNS: &[ColumnMap] = &[
    col("id", "id"),
    col("name", "name"),
    col("type", "queue_type"),
    opt_col("owner", "owner"),
    opt_col("channel", "channel"),
    col("createdAt", "created_at"),
    col("updatedAt", "updated_at"),
];

pub const REQUEST_COLUMNS: &[ColumnMap] = &[
    col("id", "id"),
    col("queueId", "queue_id"),
    col("description", "description"),
    col("status", "status"),
    col("owner", "owner"),
    opt_col("assignee", "assignee"),
    col("createdAt", "created_at"),
    col("updatedAt", "updated_at"),
];

pub const USER_COLUMNS: &[ColumnMap] = &[
    col("id", "id"),
    col("name", "name"),
    col("createdAt", "created_at"),
    col("updatedAt", "updated_at"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Null,
}

impl SqlValue {
    fn opt_text(value: Option<&str>) -> Self {
        value.map_or(SqlValue::Null, |v| SqlValue::Text(v.to_string()))
    }

    fn time(value: DateTime<Utc>) -> Self {
        SqlValue::Int(datetime_to_i64(value))
    }
}

fn bind_value<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    value: &SqlValue,
) -> Query<'q, Any, AnyArguments<'q>> {
    match value {
        SqlValue::Text(text) => query.bind(text.clone()),
        SqlValue::Int(int) => query.bind(*int),
        SqlValue::Null => query.bind(None::<String>),
    }
}

/// Field/value pairs of a filter or patch; only fields that are set appear.
pub trait Fields {
    fn fields(&self) -> Vec<(&'static str, SqlValue)>;
}

pub trait Record: Sized + Send + Sync + 'static {
    const TABLE: &'static str;
    const ENTITY: &'static str;
    const COLUMNS: &'static [ColumnMap];

    type Filter: Fields + Send + Sync;
    type Patch: Fields + Send + Sync;

    fn id(&self) -> &str;
    /// Every mapped field with its value, in `COLUMNS` order.
    fn to_values(&self) -> Vec<(&'static str, SqlValue)>;
    fn from_row(row: &RowReader<'_>) -> Result<Self, AppError>;
}

/// Reads a row by field name through the record's column table.
pub struct RowReader<'r> {
    row: &'r AnyRow,
    columns: &'static [ColumnMap],
    entity: &'static str,
}

impl<'r> RowReader<'r> {
    pub fn new(row: &'r AnyRow, columns: &'static [ColumnMap], entity: &'static str) -> Self {
        Self {
            row,
            columns,
            entity,
        }
    }

    fn column(&self, field: &str) -> Result<&'static str, AppError> {
        column_for(self.columns, field)
            .ok_or_else(|| AppError::decode(self.entity, format!("no column mapped for {field}")))
    }

    pub fn text(&self, field: &str) -> Result<String, AppError> {
        let column = self.column(field)?;
        self.row
            .try_get::<String, _>(column)
            .map_err(|err| AppError::data_access(format!("read {}.{column}", self.entity), err))
    }

    /// Reads a nullable text column; the coalesced empty string is `None`.
    pub fn opt_text(&self, field: &str) -> Result<Option<String>, AppError> {
        let value = self.text(field)?;
        Ok(Some(value).filter(|v| !v.is_empty()))
    }

    pub fn timestamp(&self, field: &str) -> Result<DateTime<Utc>, AppError> {
        let column = self.column(field)?;
        let raw = self
            .row
            .try_get::<i64, _>(column)
            .map_err(|err| AppError::data_access(format!("read {}.{column}", self.entity), err))?;
        Ok(i64_to_datetime(raw))
    }

    pub fn parsed<T>(&self, field: &str) -> Result<T, AppError>
    where
        T: std::str::FromStr<Err = String>,
    {
        self.text(field)?
            .parse()
            .map_err(|err: String| AppError::decode(self.entity, err))
    }
}

fn columns_for_fields(
    map: &[ColumnMap],
    entity: &'static str,
    fields: &[(&'static str, SqlValue)],
) -> Result<Vec<&'static str>, AppError> {
    fields
        .iter()
        .map(|(field, _)| {
            column_for(map, field)
                .ok_or_else(|| AppError::decode(entity, format!("no column mapped for {field}")))
        })
        .collect()
}

pub fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    )
}

pub fn select_sql(table: &str, map: &[ColumnMap], filter_columns: &[&str]) -> String {
    let all: Vec<Cow<'static, str>> = map.iter().map(ColumnMap::select_expr).collect();
    let mut sql = format!("SELECT {} FROM {table}", all.join(", "));
    if !filter_columns.is_empty() {
        let conditions: Vec<String> = filter_columns.iter().map(|c| format!("{c} = ?")).collect();
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql
}

pub fn update_sql(table: &str, set_columns: &[&str]) -> String {
    let assignments: Vec<String> = set_columns.iter().map(|c| format!("{c} = ?")).collect();
    format!("UPDATE {table} SET {} WHERE id = ?", assignments.join(", "))
}

/// Narrow CRUD contract the dispatchers depend on.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    async fn create(&self, record: &R) -> Result<(), AppError>;
    async fn list(&self, filter: &R::Filter) -> Result<Vec<R>, AppError>;
    async fn get_by_id(&self, id: &str) -> Result<Option<R>, AppError>;
    /// Applies the patch and bumps `updatedAt`. Returns the stored record, if any.
    async fn update(&self, id: &str, patch: &R::Patch) -> Result<Option<R>, AppError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

pub struct SqlRepository<R> {
    pool: AnyPool,
    kind: DbKind,
    _record: PhantomData<fn() -> R>,
}

impl<R> SqlRepository<R> {
    pub fn new(pool: AnyPool, kind: DbKind) -> Self {
        Self {
            pool,
            kind,
            _record: PhantomData,
        }
    }
}

impl<R> Clone for SqlRepository<R> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone(), self.kind)
    }
}

fn failed(table: &'static str, op: &str, err: sqlx::Error) -> AppError {
    tracing::error!(table, op, error = %err, "repository call failed");
    AppError::data_access(format!("{op} {table}"), err)
}

#[async_trait]
impl<R: Record> Repository<R> for SqlRepository<R> {
    async fn create(&self, record: &R) -> Result<(), AppError> {
        let values = record.to_values();
        let columns = columns_for_fields(R::COLUMNS, R::ENTITY, &values)?;
        let base = insert_sql(R::TABLE, &columns);
        let sql = rewrite_sql(&base, self.kind);
        let mut query = sqlx::query(sql.as_ref());
        for (_, value) in &values {
            query = bind_value(query, value);
        }
        query
            .execute(&self.pool)
            .await
            .map_err(|err| failed(R::TABLE, "insert into", err))?;
        tracing::debug!(table = R::TABLE, id = record.id(), "record created");
        Ok(())
    }

    async fn list(&self, filter: &R::Filter) -> Result<Vec<R>, AppError> {
        let conditions = filter.fields();
        let columns = columns_for_fields(R::COLUMNS, R::ENTITY, &conditions)?;
        let mut base = select_sql(R::TABLE, R::COLUMNS, &columns);
        base.push_str(" ORDER BY created_at ASC");
        let sql = rewrite_sql(&base, self.kind);
        let mut query = sqlx::query(sql.as_ref());
        for (_, value) in &conditions {
            query = bind_value(query, value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|err| failed(R::TABLE, "select from", err))?;
        rows.iter()
            .map(|row| R::from_row(&RowReader::new(row, R::COLUMNS, R::ENTITY)))
            .collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<R>, AppError> {
        let base = select_sql(R::TABLE, R::COLUMNS, &["id"]);
        let sql = rewrite_sql(&base, self.kind);
        let row = sqlx::query(sql.as_ref())
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| failed(R::TABLE, "select from", err))?;
        row.as_ref()
            .map(|row| R::from_row(&RowReader::new(row, R::COLUMNS, R::ENTITY)))
            .transpose()
    }

    async fn update(&self, id: &str, patch: &R::Patch) -> Result<Option<R>, AppError> {
        let mut changes = patch.fields();
        if column_for(R::COLUMNS, "updatedAt").is_some() {
            changes.push(("updatedAt", SqlValue::time(types::now())));
        }
        let columns = columns_for_fields(R::COLUMNS, R::ENTITY, &changes)?;
        let base = update_sql(R::TABLE, &columns);
        let sql = rewrite_sql(&base, self.kind);
        let mut query = sqlx::query(sql.as_ref());
        for (_, value) in &changes {
            query = bind_value(query, value);
        }
        query
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| failed(R::TABLE, "update", err))?;
        self.get_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let base = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
        let sql = rewrite_sql(&base, self.kind);
        let result = sqlx::query(sql.as_ref())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| failed(R::TABLE, "delete from", err))?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueueFilter {
    pub name: Option<String>,
    pub queue_type: Option<QueueType>,
    pub owner: Option<String>,
    pub channel: Option<String>,
}

impl Fields for QueueFilter {
    fn fields(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(name) = &self.name {
            out.push(("name", SqlValue::Text(name.clone())));
        }
        if let Some(queue_type) = self.queue_type {
            out.push(("type", SqlValue::Text(queue_type.as_str().to_string())));
        }
        if let Some(owner) = &self.owner {
            out.push(("owner", SqlValue::Text(owner.clone())));
        }
        if let Some(channel) = &self.channel {
            out.push(("channel", SqlValue::Text(channel.clone())));
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueuePatch {
    pub name: Option<String>,
}

impl Fields for QueuePatch {
    fn fields(&self) -> Vec<(&'static str, SqlValue)> {
        self.name
            .iter()
            .map(|name| ("name", SqlValue::Text(name.clone())))
            .collect()
    }
}

impl Record for Queue {
    const TABLE: &'static str = "queues";
    const ENTITY: &'static str = "queue";
    const COLUMNS: &'static [ColumnMap] = QUEUE_COLUMNS;

    type Filter = QueueFilter;
    type Patch = QueuePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Text(self.id.clone())),
            ("name", SqlValue::Text(self.name.clone())),
            ("type", SqlValue::Text(self.queue_type.as_str().to_string())),
            ("owner", SqlValue::opt_text(self.owner.as_deref())),
            ("channel", SqlValue::opt_text(self.channel.as_deref())),
            ("createdAt", SqlValue::time(self.created_at)),
            ("updatedAt", SqlValue::time(self.updated_at)),
        ]
    }

    fn from_row(row: &RowReader<'_>) -> Result<Self, AppError> {
        Ok(Queue {
            id: row.text("id")?,
            name: row.text("name")?,
            queue_type: row.parsed("type")?,
            owner: row.opt_text("owner")?,
            channel: row.opt_text("channel")?,
            created_at: row.timestamp("createdAt")?,
            updated_at: row.timestamp("updatedAt")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub queue_id: Option<String>,
    pub status: Option<RequestStatus>,
    pub owner: Option<String>,
    pub assignee: Option<String>,
}

impl Fields for RequestFilter {
    fn fields(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(queue_id) = &self.queue_id {
            out.push(("queueId", SqlValue::Text(queue_id.clone())));
        }
        if let Some(status) = self.status {
            out.push(("status", SqlValue::Text(status.as_str().to_string())));
        }
        if let Some(owner) = &self.owner {
            out.push(("owner", SqlValue::Text(owner.clone())));
        }
        if let Some(assignee) = &self.assignee {
            out.push(("assignee", SqlValue::Text(assignee.clone())));
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestPatch {
    pub status: Option<RequestStatus>,
    pub assignee: Option<String>,
    pub description: Option<String>,
}

impl Fields for RequestPatch {
    fn fields(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::new();
        if let Some(status) = self.status {
            out.push(("status", SqlValue::Text(status.as_str().to_string())));
        }
        if let Some(assignee) = &self.assignee {
            out.push(("assignee", SqlValue::Text(assignee.clone())));
        }
        if let Some(description) = &self.description {
            out.push(("description", SqlValue::Text(description.clone())));
        }
        out
    }
}

impl Record for Request {
    const TABLE: &'static str = "requests";
    const ENTITY: &'static str = "request";
    const COLUMNS: &'static [ColumnMap] = REQUEST_COLUMNS;

    type Filter = RequestFilter;
    type Patch = RequestPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Text(self.id.clone())),
            ("queueId", SqlValue::Text(self.queue_id.clone())),
            ("description", SqlValue::Text(self.description.clone())),
            ("status", SqlValue::Text(self.status.as_str().to_string())),
            ("owner", SqlValue::Text(self.owner.clone())),
            ("assignee", SqlValue::opt_text(self.assignee.as_deref())),
            ("createdAt", SqlValue::time(self.created_at)),
            ("updatedAt", SqlValue::time(self.updated_at)),
        ]
    }

    fn from_row(row: &RowReader<'_>) -> Result<Self, AppError> {
        Ok(Request {
            id: row.text("id")?,
            queue_id: row.text("queueId")?,
            description: row.text("description")?,
            status: row.parsed("status")?,
            owner: row.text("owner")?,
            assignee: row.opt_text("assignee")?,
            created_at: row.timestamp("createdAt")?,
            updated_at: row.timestamp("updatedAt")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub name: Option<String>,
}

impl Fields for UserFilter {
    fn fields(&self) -> Vec<(&'static str, SqlValue)> {
        self.name
            .iter()
            .map(|name| ("name", SqlValue::Text(name.clone())))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
}

impl Fields for UserPatch {
    fn fields(&self) -> Vec<(&'static str, SqlValue)> {
        self.name
            .iter()
            .map(|name| ("name", SqlValue::Text(name.clone())))
            .collect()
    }
}

impl Record for User {
    const TABLE: &'static str = "users";
    const ENTITY: &'static str = "user";
    const COLUMNS: &'static [ColumnMap] = USER_COLUMNS;

    type Filter = UserFilter;
    type Patch = UserPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", SqlValue::Text(self.id.clone())),
            ("name", SqlValue::Text(self.name.clone())),
            ("createdAt", SqlValue::time(self.created_at)),
            ("updatedAt", SqlValue::time(self.updated_at)),
        ]
    }

    fn from_row(row: &RowReader<'_>) -> Result<Self, AppError> {
        Ok(User {
            id: row.text("id")?,
            name: row.text("name")?,
            created_at: row.timestamp("createdAt")?,
            updated_at: row.timestamp("updatedAt")?,
        })
    }
}

/// Creates a `default` queue for each configured name that does not exist yet.
pub async fn seed_default_queues(
    queues: &dyn Repository<Queue>,
    names: &[String],
) -> Result<usize, AppError> {
    let mut created = 0;
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let filter = QueueFilter {
            name: Some(name.to_string()),
            queue_type: Some(QueueType::Default),
            ..QueueFilter::default()
        };
        if queues.list(&filter).await?.is_empty() {
            queues.create(&Queue::default_queue(name)).await?;
            created += 1;
        }
    }
    if created > 0 {
        tracing::info!(created, "seeded default queues");
    }
    Ok(created)
}
