//! Generic CRUD + list repository shared by every entity table.
//!
//! Each entity describes its table through [`Entity`]: the table and id
//! column, the projection, which columns the free-text search targets, and
//! how its create/update/patch payloads map onto columns. [`Repository`]
//! turns that description into parameterized statements with
//! `sqlx::QueryBuilder`. User input only ever reaches the database as a bound
//! parameter; identifiers spliced into SQL come from `&'static str` constants.

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use retail_core::{ListQuery, ListResult, new_id};

use super::{RepositoryError, map_write_error};

// =============================================================================
// Bound Values
// =============================================================================

/// A single value bound into a statement.
///
/// Every variant is nullable so that an explicit `null` in a patch can clear
/// a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(Option<String>),
    Int(Option<i32>),
    Bool(Option<bool>),
    Decimal(Option<Decimal>),
    Uuid(Option<Uuid>),
    Date(Option<NaiveDate>),
}

macro_rules! impl_sql_value {
    ($ty:ty => $variant:ident) => {
        impl From<$ty> for SqlValue {
            fn from(value: $ty) -> Self {
                Self::$variant(Some(value.into()))
            }
        }

        impl From<Option<$ty>> for SqlValue {
            fn from(value: Option<$ty>) -> Self {
                Self::$variant(value.map(Into::into))
            }
        }
    };
}

impl_sql_value!(String => Text);
impl_sql_value!(i32 => Int);
impl_sql_value!(bool => Bool);
impl_sql_value!(Decimal => Decimal);
impl_sql_value!(Uuid => Uuid);
impl_sql_value!(NaiveDate => Date);
impl_sql_value!(retail_core::UserId => Uuid);
impl_sql_value!(retail_core::BrandId => Uuid);
impl_sql_value!(retail_core::CategoryId => Uuid);
impl_sql_value!(retail_core::ProductId => Uuid);
impl_sql_value!(retail_core::StoreId => Uuid);
impl_sql_value!(retail_core::StaffId => Uuid);
impl_sql_value!(retail_core::CustomerId => Uuid);
impl_sql_value!(retail_core::OrderId => Uuid);

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: SqlValue) {
    match value {
        SqlValue::Text(v) => builder.push_bind(v),
        SqlValue::Int(v) => builder.push_bind(v),
        SqlValue::Bool(v) => builder.push_bind(v),
        SqlValue::Decimal(v) => builder.push_bind(v),
        SqlValue::Uuid(v) => builder.push_bind(v),
        SqlValue::Date(v) => builder.push_bind(v),
    };
}

/// Ordered `column = value` pairs produced by an entity's field mapper.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Assignments(Vec<(&'static str, SqlValue)>);

impl Assignments {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Always assign `column`.
    #[must_use]
    pub fn set(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.0.push((column, value.into()));
        self
    }

    /// Assign `column` only when the patch field is present.
    ///
    /// For nullable columns `T` is itself an `Option`, so `Some(None)` clears
    /// the column while `None` leaves it untouched.
    #[must_use]
    pub fn set_if_present<T>(self, column: &'static str, value: &Option<T>) -> Self
    where
        T: Clone + Into<SqlValue>,
    {
        match value {
            Some(v) => self.set(column, v.clone()),
            None => self,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn columns(&self) -> Vec<&'static str> {
        self.0.iter().map(|(c, _)| *c).collect()
    }

    fn into_inner(self) -> Vec<(&'static str, SqlValue)> {
        self.0
    }
}

// =============================================================================
// Entity Description
// =============================================================================

/// A table managed by the generic [`Repository`].
pub trait Entity: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static {
    /// Typed primary key.
    type Id: Copy
        + Display
        + FromStr
        + From<Uuid>
        + Into<Uuid>
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Payload for create and full update.
    type Input: DeserializeOwned + Send + Sync + 'static;

    /// Payload for partial update.
    type Patch: DeserializeOwned + Send + Sync + 'static;

    /// Singular name used in log and response messages.
    const NAME: &'static str;
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    /// Projection matching the `FromRow` implementation.
    const SELECT_COLUMNS: &'static str;
    /// Columns matched (case-insensitively, as substrings) by `ListQuery::search`.
    const SEARCH_COLUMNS: &'static [&'static str];
    /// Whether the table carries `created_at` / `updated_at`.
    const TIMESTAMPED: bool;

    /// Map a full payload onto every writable column.
    fn assignments(input: &Self::Input) -> Assignments;

    /// Map a patch onto only the columns it mentions.
    fn patch_assignments(patch: &Self::Patch) -> Assignments;
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for one entity table.
pub struct Repository<'a, E> {
    pool: &'a PgPool,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> Repository<'a, E> {
    /// Create a new repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Insert a new row under a freshly generated identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a unique violation.
    /// Returns `RepositoryError::Validation` on a foreign key or check violation.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &E::Input) -> Result<E::Id, RepositoryError> {
        let id = new_id();
        let mut builder = insert_statement::<E>(id, E::assignments(input));

        builder
            .build()
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        tracing::debug!(entity = E::NAME, id = %id, "Row created");
        Ok(E::Id::from(id))
    }

    /// Get a row by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matches.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: E::Id) -> Result<E, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            E::SELECT_COLUMNS,
            E::TABLE,
            E::ID_COLUMN
        );

        sqlx::query_as::<_, E>(&sql)
            .bind(Into::<Uuid>::into(id))
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Replace every writable column of an existing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matches.
    /// Returns `RepositoryError::Conflict` / `Validation` on constraint violations.
    pub async fn update(&self, id: E::Id, input: &E::Input) -> Result<E, RepositoryError> {
        self.apply(id, E::assignments(input)).await
    }

    /// Update only the columns present in `patch`.
    ///
    /// An empty patch writes nothing and returns the current row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matches.
    /// Returns `RepositoryError::Conflict` / `Validation` on constraint violations.
    pub async fn update_partial(&self, id: E::Id, patch: &E::Patch) -> Result<E, RepositoryError> {
        let assignments = E::patch_assignments(patch);
        if assignments.is_empty() {
            return self.get_by_id(id).await;
        }
        self.apply(id, assignments).await
    }

    /// Delete a row.
    ///
    /// Deleting an already-deleted row is reported as `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matches.
    /// Returns `RepositoryError::Validation` if other rows still reference it.
    pub async fn delete(&self, id: E::Id) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", E::TABLE, E::ID_COLUMN);

        let result = sqlx::query(&sql)
            .bind(Into::<Uuid>::into(id))
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(entity = E::NAME, id = %id, "Row deleted");
        Ok(())
    }

    /// List rows matching `query.search`, one page at a time.
    ///
    /// `count` covers the whole filtered set; an offset past the end yields an
    /// empty page with the full count. Both reads run in one read-only
    /// `REPEATABLE READ` transaction, so they see the same snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn get_list(&self, query: &ListQuery) -> Result<ListResult<E>, RepositoryError> {
        let mut count_builder = count_statement::<E>(query);
        let mut page_builder = page_statement::<E>(query);

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let count = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&mut *tx)
            .await?;
        let rows = page_builder.build().fetch_all(&mut *tx).await?;
        tx.commit().await?;

        let items = rows
            .iter()
            .map(E::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ListResult { count, items })
    }

    async fn apply(&self, id: E::Id, assignments: Assignments) -> Result<E, RepositoryError> {
        let mut builder = update_statement::<E>(id.into(), assignments);

        builder
            .build_query_as::<E>()
            .fetch_optional(self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or(RepositoryError::NotFound)
    }
}

// =============================================================================
// Statement Builders
// =============================================================================

fn insert_statement<E: Entity>(id: Uuid, assignments: Assignments) -> QueryBuilder<'static, Postgres> {
    let values = assignments.into_inner();

    let mut builder = QueryBuilder::new(format!("INSERT INTO {} ({}", E::TABLE, E::ID_COLUMN));
    for (column, _) in &values {
        builder.push(", ").push(*column);
    }
    if E::TIMESTAMPED {
        builder.push(", updated_at");
    }

    builder.push(") VALUES (").push_bind(id);
    for (_, value) in values {
        builder.push(", ");
        push_value(&mut builder, value);
    }
    if E::TIMESTAMPED {
        builder.push(", now()");
    }
    builder.push(")");

    builder
}

fn update_statement<E: Entity>(id: Uuid, assignments: Assignments) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", E::TABLE));

    for (i, (column, value)) in assignments.into_inner().into_iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push(column).push(" = ");
        push_value(&mut builder, value);
    }
    if E::TIMESTAMPED {
        builder.push(", updated_at = now()");
    }

    builder
        .push(format!(" WHERE {} = ", E::ID_COLUMN))
        .push_bind(id)
        .push(format!(" RETURNING {}", E::SELECT_COLUMNS));

    builder
}

fn push_filter<E: Entity>(builder: &mut QueryBuilder<'static, Postgres>, query: &ListQuery) {
    builder.push(" WHERE TRUE");

    let Some(search) = query.search.as_deref() else {
        return;
    };
    if E::SEARCH_COLUMNS.is_empty() {
        return;
    }

    let pattern = format!("%{}%", escape_like(search));
    builder.push(" AND (");
    for (i, column) in E::SEARCH_COLUMNS.iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push(*column).push(" ILIKE ").push_bind(pattern.clone());
    }
    builder.push(")");
}

fn count_statement<E: Entity>(query: &ListQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", E::TABLE));
    push_filter::<E>(&mut builder, query);
    builder
}

fn page_statement<E: Entity>(query: &ListQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM {}", E::SELECT_COLUMNS, E::TABLE));
    push_filter::<E>(&mut builder, query);

    if E::TIMESTAMPED {
        builder.push(format!(" ORDER BY created_at DESC, {}", E::ID_COLUMN));
    } else {
        builder.push(format!(" ORDER BY {}", E::ID_COLUMN));
    }

    builder
        .push(" OFFSET ")
        .push_bind(i64::from(query.offset))
        .push(" LIMIT ")
        .push_bind(i64::from(query.limit));

    builder
}

/// Escape `LIKE` metacharacters so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{Category, Customer, CustomerPatch, Stock};

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_insert_statement_binds_every_value() {
        let assignments = Assignments::new().set("category_name", "Road".to_string());
        let builder = insert_statement::<Category>(new_id(), assignments);

        assert_eq!(
            builder.sql(),
            "INSERT INTO categories (category_id, category_name, updated_at) VALUES ($1, $2, now())"
        );
    }

    #[test]
    fn test_update_statement_touches_updated_at() {
        let assignments = Assignments::new()
            .set("first_name", "Ada".to_string())
            .set("phone", None::<String>);
        let builder = update_statement::<Customer>(new_id(), assignments);
        let sql = builder.sql();

        assert!(sql.starts_with("UPDATE customers SET first_name = $1, phone = $2, updated_at = now()"));
        assert!(sql.contains(" WHERE customer_id = $3 RETURNING "));
    }

    #[test]
    fn test_search_is_bound_not_spliced() {
        let query = ListQuery::default().with_search("x' OR '1'='1");
        let builder = page_statement::<Customer>(&query);
        let sql = builder.sql();

        assert!(!sql.contains("OR '1'='1"));
        assert!(sql.contains("first_name ILIKE $1 OR last_name ILIKE $2 OR email ILIKE $3"));
        assert!(sql.ends_with("OFFSET $4 LIMIT $5"));
    }

    #[test]
    fn test_count_statement_shares_filter() {
        let query = ListQuery::default().with_search("trek");
        let builder = count_statement::<Category>(&query);

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM categories WHERE TRUE AND (category_name ILIKE $1)"
        );
    }

    #[test]
    fn test_search_ignored_without_search_columns() {
        let query = ListQuery::default().with_search("anything");
        let builder = page_statement::<Stock>(&query);

        assert!(!builder.sql().contains("ILIKE"));
    }

    #[test]
    fn test_patch_distinguishes_absent_from_null() {
        let patch: CustomerPatch =
            serde_json::from_str(r#"{"first_name": "Grace", "phone": null}"#).unwrap();
        let assignments = Customer::patch_assignments(&patch);

        assert_eq!(assignments.columns(), vec!["first_name", "phone"]);
        assert_eq!(
            assignments,
            Assignments::new()
                .set("first_name", "Grace".to_string())
                .set("phone", None::<String>)
        );
    }

    #[test]
    fn test_empty_patch_has_no_assignments() {
        let patch: CustomerPatch = serde_json::from_str("{}").unwrap();
        assert!(Customer::patch_assignments(&patch).is_empty());
    }
}
