//! PostgreSQL document store.
//!
//! All collections share one `documents` table keyed by `(collection, id)`
//! with the document in a JSONB `body`. Field names are always bound as
//! parameters, never spliced into SQL.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use uuid::Uuid;

use super::{
    Condition, Document, DocumentStore, Filter, FindQuery, Sort, SortDirection, STORE_ID_FIELD,
};
use crate::config::DatabaseConfig;
use crate::error::{LaunchpadError, Result};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a connection pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Range comparison operators accepted by [`push_compare`].
const GT: &str = ">";
const GTE: &str = ">=";
const LT: &str = "<";
const LTE: &str = "<=";

fn push_compare(qb: &mut QueryBuilder<'_, Postgres>, field: &str, op: &str, value: &Value) {
    match value {
        // Fixed-width ISO dates compare correctly as bytes.
        Value::String(s) => {
            qb.push("(body ->> ")
                .push_bind(field.to_string())
                .push(") COLLATE \"C\" ")
                .push(op)
                .push(" ")
                .push_bind(s.clone());
        }
        other => {
            qb.push("(body -> ")
                .push_bind(field.to_string())
                .push(") ")
                .push(op)
                .push(" ")
                .push_bind(Json(other.clone()));
        }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    for (field, condition) in filter.clauses() {
        qb.push(" AND ");
        match condition {
            Condition::Eq(value) => {
                qb.push("(body -> ")
                    .push_bind(field.clone())
                    .push(") = ")
                    .push_bind(Json(value.clone()));
            }
            Condition::Ne(value) => {
                qb.push("(body -> ")
                    .push_bind(field.clone())
                    .push(") IS DISTINCT FROM ")
                    .push_bind(Json(value.clone()));
            }
            Condition::Gt(value) => push_compare(qb, field, GT, value),
            Condition::Gte(value) => push_compare(qb, field, GTE, value),
            Condition::Lt(value) => push_compare(qb, field, LT, value),
            Condition::Lte(value) => push_compare(qb, field, LTE, value),
            Condition::In(values) => {
                qb.push_bind(Json(Value::Array(values.clone())))
                    .push(" @> (body -> ")
                    .push_bind(field.clone())
                    .push(")");
            }
            Condition::Contains(value) => {
                qb.push("(body -> ")
                    .push_bind(field.clone())
                    .push(") @> ")
                    .push_bind(Json(Value::Array(vec![value.clone()])));
            }
        }
    }
}

// Sort fields are dates, compared as fixed-width text.
fn push_sort(qb: &mut QueryBuilder<'_, Postgres>, sort: &Sort) {
    let direction = match sort.direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    };
    qb.push(" ORDER BY (body ->> ")
        .push_bind(sort.field.clone())
        .push(") COLLATE \"C\" ")
        .push(direction)
        .push(" NULLS LAST, id ")
        .push(direction);
}

fn scoped<'a>(prefix: &str, collection: &str) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(prefix);
    qb.push(" WHERE collection = ").push_bind(collection.to_string());
    qb
}

/// Unique index violations surface as `DuplicateRecord` for the offending key.
fn unique_violation(error: sqlx::Error, collection: &str, key: &str) -> LaunchpadError {
    let unique = matches!(&error, sqlx::Error::Database(db_err) if db_err.is_unique_violation());
    if unique {
        LaunchpadError::duplicate(collection, key).with_source(error)
    } else {
        error.into()
    }
}

fn id_of(doc: &Document) -> Result<String> {
    doc.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LaunchpadError::validation("Document is missing a string id"))
}

#[async_trait]
impl DocumentStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Unique fields are enforced by the partial unique indexes in
    /// `migrations/0002_unique_fields.sql`, so `unique` needs no query of its own.
    async fn insert_unique(
        &self,
        collection: &str,
        mut doc: Document,
        _unique: &[&str],
    ) -> Result<Document> {
        let id = id_of(&doc)?;
        let store_id = Uuid::new_v4().simple().to_string()[..24].to_string();
        doc.insert(STORE_ID_FIELD.to_string(), Value::String(store_id.clone()));

        let inserted: Option<Json<Document>> = sqlx::query_scalar(
            r#"
            INSERT INTO documents (collection, id, store_id, body)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (collection, id) DO NOTHING
            RETURNING body
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(&store_id)
        .bind(Json(&doc))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, collection, &id))?;

        inserted
            .map(|Json(body)| body)
            .ok_or_else(|| LaunchpadError::duplicate(collection, id))
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Document>> {
        let mut qb = scoped("SELECT body FROM documents", collection);
        push_filter(&mut qb, &query.filter);

        if let Some(sort) = &query.sort {
            push_sort(&mut qb, sort);
        }

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ").push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        if query.skip > 0 {
            qb.push(" OFFSET ").push_bind(i64::try_from(query.skip).unwrap_or(i64::MAX));
        }

        let rows: Vec<Json<Document>> = qb.build_query_scalar().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|Json(body)| body).collect())
    }

    async fn replace_where(
        &self,
        collection: &str,
        id: &str,
        doc: Document,
        expected: &Filter,
        _unique: &[&str],
    ) -> Result<Option<Document>> {
        let mut qb = QueryBuilder::new("UPDATE documents SET body = jsonb_set(");
        qb.push_bind(Json(doc))
            .push(", '{_id}', to_jsonb(store_id)) WHERE collection = ")
            .push_bind(collection.to_string())
            .push(" AND id = ")
            .push_bind(id.to_string());
        push_filter(&mut qb, expected);
        qb.push(" RETURNING body");

        let replaced: Option<Json<Document>> = qb
            .build_query_scalar()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unique_violation(e, collection, id))?;

        Ok(replaced.map(|Json(body)| body))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let removed: Option<Json<Document>> = sqlx::query_scalar(
            "DELETE FROM documents WHERE collection = $1 AND id = $2 RETURNING body",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(removed.map(|Json(body)| body))
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let mut qb = scoped("DELETE FROM documents", collection);
        push_filter(&mut qb, filter);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let mut qb = scoped("SELECT COUNT(*) FROM documents", collection);
        push_filter(&mut qb, filter);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }
}
