use crate::{
    config::DbConfig,
    data::{
        StudentStore,
        pagination::PageRequest,
        student::{NewStudent, Student, StudentUpdate},
    },
    error::{
        GetDatabaseConnectionSnafu, MakeQuerySnafu, MigrateSnafu, OpenDatabaseSnafu,
        RollcallResult,
    },
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{
    Pool, Postgres, QueryBuilder,
    pool::PoolConnection,
    postgres::PgPoolOptions,
};

const SELECT_STUDENTS: &str = "SELECT id, first_name, last_name, email FROM public.students";

#[derive(Clone, Debug)]
pub struct PostgresStudentStore {
    pool: Pool<Postgres>,
}

impl PostgresStudentStore {
    pub async fn new(options: PgPoolOptions, db_config: &DbConfig) -> RollcallResult<Self> {
        let pool = options
            .connect(&db_config.get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self::from_pool(pool))
    }

    /// Wraps a pool that already has the schema applied.
    pub const fn from_pool(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn get_connection(&self) -> RollcallResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .context(GetDatabaseConnectionSnafu)
    }
}

/// Builds the bounded page query. Rows come back in insertion order.
pub fn page_query(request: &PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(SELECT_STUDENTS);

    if let Some(pattern) = request.like_pattern() {
        query.push(" WHERE (first_name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(r" ESCAPE '\' OR last_name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(r" ESCAPE '\' OR email ILIKE ");
        query.push_bind(pattern);
        query.push(r" ESCAPE '\')");
    }

    query.push(" ORDER BY seq LIMIT ");
    query.push_bind(request.limit());
    query.push(" OFFSET ");
    query.push_bind(request.offset());

    query
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn get_page(&self, request: &PageRequest) -> RollcallResult<Vec<Student>> {
        let mut conn = self.get_connection().await?;

        page_query(request)
            .build_query_as::<Student>()
            .fetch_all(&mut *conn)
            .await
            .context(MakeQuerySnafu)
    }

    async fn get_by_id(&self, id: &str) -> RollcallResult<Option<Student>> {
        let mut conn = self.get_connection().await?;

        sqlx::query_as::<_, Student>(&format!("{SELECT_STUDENTS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .context(MakeQuerySnafu)
    }

    async fn insert(&self, to_be_added: NewStudent) -> RollcallResult<String> {
        let Student {
            id,
            first_name,
            last_name,
            email,
        } = to_be_added.into_student();
        let mut conn = self.get_connection().await?;

        sqlx::query(
            "INSERT INTO public.students (id, first_name, last_name, email) VALUES ($1, $2, $3, $4)",
        )
        .bind(id.as_str())
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .execute(&mut *conn)
        .await
        .context(MakeQuerySnafu)?;

        Ok(id)
    }

    async fn update(&self, id: &str, update: StudentUpdate) -> RollcallResult<u64> {
        let StudentUpdate {
            first_name,
            last_name,
            email,
        } = update;
        let mut conn = self.get_connection().await?;

        let result = sqlx::query(
            "UPDATE public.students SET first_name = $1, last_name = $2, email = $3 WHERE id = $4",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(id)
        .execute(&mut *conn)
        .await
        .context(MakeQuerySnafu)?;

        Ok(result.rows_affected())
    }

    async fn remove(&self, id: &str) -> RollcallResult<u64> {
        let mut conn = self.get_connection().await?;

        let result = sqlx::query("DELETE FROM public.students WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .context(MakeQuerySnafu)?;

        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_page_is_ordered_and_bounded() {
        let request = PageRequest::from_raw(Some("3"), None);

        assert_eq!(
            page_query(&request).sql(),
            "SELECT id, first_name, last_name, email FROM public.students ORDER BY seq LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn search_filters_before_the_limit() {
        let request = PageRequest::from_raw(None, Some("ada"));

        assert_eq!(
            page_query(&request).sql(),
            "SELECT id, first_name, last_name, email FROM public.students \
             WHERE (first_name ILIKE $1 ESCAPE '\\' OR last_name ILIKE $2 ESCAPE '\\' OR email ILIKE $3 ESCAPE '\\') \
             ORDER BY seq LIMIT $4 OFFSET $5"
        );
    }

    fn named(id: &str, first_name: &str) -> NewStudent {
        NewStudent {
            id: Some(id.into()),
            first_name: Some(first_name.into()),
            ..NewStudent::default()
        }
    }

    async fn page_ids(store: &PostgresStudentStore, page: &str, search: Option<&str>) -> Vec<String> {
        store
            .get_page(&PageRequest::from_raw(Some(page), search))
            .await
            .unwrap()
            .into_iter()
            .map(|student| student.id)
            .collect()
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn pages_come_back_in_insertion_order(pool: Pool<Postgres>) {
        let store = PostgresStudentStore::from_pool(pool);
        //ids deliberately out of alphabetical order
        for (id, first_name) in [("C", "Carol"), ("A", "Alan"), ("B", "Beth")] {
            store.insert(named(id, first_name)).await.unwrap();
        }

        assert_eq!(page_ids(&store, "1", None).await, ["C", "A"]);
        assert_eq!(page_ids(&store, "2", None).await, ["B"]);
        assert!(page_ids(&store, "3", None).await.is_empty());
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn search_matches_wildcards_literally(pool: Pool<Postgres>) {
        let store = PostgresStudentStore::from_pool(pool);
        for (id, first_name) in [("1", "100% Ada"), ("2", "1000 Bob"), ("3", "ada_x"), ("4", "adaax")] {
            store.insert(named(id, first_name)).await.unwrap();
        }

        assert_eq!(page_ids(&store, "1", Some("100%")).await, ["1"]);
        assert_eq!(page_ids(&store, "1", Some("a_x")).await, ["3"]);
        assert_eq!(page_ids(&store, "1", Some("ADA")).await, ["1", "3"]);
        assert_eq!(page_ids(&store, "2", Some("ADA")).await, ["4"]);
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn writes_to_missing_ids_touch_nothing(pool: Pool<Postgres>) {
        let store = PostgresStudentStore::from_pool(pool);
        store.insert(named("A", "Alan")).await.unwrap();

        assert_eq!(store.update("ghost", StudentUpdate::default()).await.unwrap(), 0);
        assert_eq!(store.remove("ghost").await.unwrap(), 0);
        assert!(store.get_by_id("ghost").await.unwrap().is_none());
        assert_eq!(store.remove("A").await.unwrap(), 1);
        assert!(store.insert(named("A", "Alan")).await.is_ok());
        assert!(store.insert(named("A", "Again")).await.is_err());
    }
}
