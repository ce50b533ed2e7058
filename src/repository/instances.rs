//! Book instances repository: loan listings and due-date mutation

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        instance::{BookInstance, InstanceStatus, LoanDetails},
        user::Borrower,
    },
};

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get instance by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance with id {} not found", id)))
    }

    /// Count all instances
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count instances with the given status
    pub async fn count_by_status(&self, status: InstanceStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// On-loan instances for one borrower, soonest due first
    pub async fn loans_for_borrower(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.loans(Some(user_id)).await
    }

    /// All on-loan instances across borrowers, soonest due first
    pub async fn loans_all(&self) -> AppResult<Vec<LoanDetails>> {
        self.loans(None).await
    }

    async fn loans(&self, borrower_id: Option<i32>) -> AppResult<Vec<LoanDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, bi.imprint, bi.due_back, bi.borrower_id,
                   b.title, u.username, u.first_name, u.last_name
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            LEFT JOIN users u ON u.id = bi.borrower_id
            WHERE bi.status = 'o'
              AND ($1::integer IS NULL OR bi.borrower_id = $1)
            ORDER BY bi.due_back
            "#,
        )
        .bind(borrower_id)
        .fetch_all(&self.pool)
        .await?;

        let today = Utc::now().date_naive();

        let loans = rows
            .into_iter()
            .map(|row| {
                let due_back: Option<NaiveDate> = row.get("due_back");
                let borrower = row
                    .get::<Option<i32>, _>("borrower_id")
                    .map(|id| Borrower {
                        id,
                        username: row.get::<Option<String>, _>("username").unwrap_or_default(),
                        first_name: row.get("first_name"),
                        last_name: row.get("last_name"),
                    });
                LoanDetails {
                    id: row.get("id"),
                    book_id: row.get("book_id"),
                    title: row.get("title"),
                    imprint: row.get("imprint"),
                    due_back,
                    borrower,
                    is_overdue: due_back.map(|d| d < today).unwrap_or(false),
                }
            })
            .collect();

        Ok(loans)
    }

    /// Set the due date of exactly one instance
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book instance with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
