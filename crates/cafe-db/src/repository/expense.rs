//! # Expense Repository
//!
//! Back-office spending (rent, milk deliveries, salaries). Expenses feed
//! the net profit line on the sales report.

use cafe_core::report::DateRange;
use cafe_core::validation::{validate_expense_amount, validate_name};
use cafe_core::{Expense, ExpenseCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

const EXPENSE_COLUMNS: &str =
    "id, description, amount_paise, category, date, user_id, notes, receipt_url";

/// Body of an expense create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount_paise: i64,
    #[serde(default)]
    pub category: ExpenseCategory,
    /// When the money was spent; defaults to now.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
}

impl NewExpense {
    pub fn validate(&self) -> DbResult<()> {
        validate_name("description", &self.description)?;
        validate_expense_amount(self.amount_paise)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// All expenses, latest first.
    pub async fn list(&self) -> DbResult<Vec<Expense>> {
        let sql = format!("SELECT {} FROM expenses ORDER BY date DESC, id DESC", EXPENSE_COLUMNS);
        let expenses = sqlx::query_as::<_, Expense>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(expenses)
    }

    /// Expenses dated inside the half-open `range`, oldest first.
    pub async fn by_date_range(&self, range: &DateRange) -> DbResult<Vec<Expense>> {
        debug!(start = %range.start, end = %range.end, "Loading expenses for range");

        let sql = format!(
            "SELECT {} FROM expenses WHERE date >= ?1 AND date < ?2 ORDER BY date, id",
            EXPENSE_COLUMNS
        );
        let expenses = sqlx::query_as::<_, Expense>(&sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;

        Ok(expenses)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Expense>> {
        let sql = format!("SELECT {} FROM expenses WHERE id = ?1", EXPENSE_COLUMNS);
        let expense = sqlx::query_as::<_, Expense>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(expense)
    }

    pub async fn create(&self, new: &NewExpense) -> DbResult<Expense> {
        new.validate()?;
        debug!(amount_paise = new.amount_paise, category = new.category.as_str(), "Recording expense");

        let result = sqlx::query(
            r#"
            INSERT INTO expenses (description, amount_paise, category, date, user_id, notes, receipt_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(new.description.trim())
        .bind(new.amount_paise)
        .bind(new.category)
        .bind(new.date.unwrap_or_else(Utc::now))
        .bind(new.user_id)
        .bind(&new.notes)
        .bind(&new.receipt_url)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Expense", id.to_string()))
    }

    /// Replaces an expense. A missing date keeps the stored one.
    pub async fn update(&self, id: i64, update: &NewExpense) -> DbResult<Expense> {
        update.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE expenses SET
                description = ?2,
                amount_paise = ?3,
                category = ?4,
                date = COALESCE(?5, date),
                user_id = ?6,
                notes = ?7,
                receipt_url = ?8
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.description.trim())
        .bind(update.amount_paise)
        .bind(update.category)
        .bind(update.date)
        .bind(update.user_id)
        .bind(&update.notes)
        .bind(&update.receipt_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id.to_string()));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Expense", id.to_string()))
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{database, staff};
    use chrono::{Duration, TimeZone};

    fn expense(amount_paise: i64, date: DateTime<Utc>) -> NewExpense {
        NewExpense {
            description: "Milk delivery".to_string(),
            amount_paise,
            category: ExpenseCategory::Inventory,
            date: Some(date),
            user_id: None,
            notes: None,
            receipt_url: None,
        }
    }

    fn day() -> DateRange {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        DateRange::new(start, start + Duration::days(1))
    }

    #[tokio::test]
    async fn test_expense_crud() {
        let db = database().await;
        let repo = db.expenses();

        let created = repo
            .create(&expense(250_000, day().start + Duration::hours(9)))
            .await
            .unwrap();
        assert_eq!(created.category, ExpenseCategory::Inventory);
        assert_eq!(created.amount().paise(), 250_000);

        let mut change = expense(300_000, day().start);
        change.date = None;
        change.category = ExpenseCategory::Utilities;
        let updated = repo.update(created.id, &change).await.unwrap();
        assert_eq!(updated.amount_paise, 300_000);
        assert_eq!(updated.category, ExpenseCategory::Utilities);
        assert_eq!(updated.date, created.date);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_by_date_range() {
        let db = database().await;
        let repo = db.expenses();

        repo.create(&expense(1000, day().start)).await.unwrap();
        repo.create(&expense(2000, day().start + Duration::hours(23))).await.unwrap();
        repo.create(&expense(4000, day().end)).await.unwrap();
        repo.create(&expense(8000, day().start - Duration::seconds(1))).await.unwrap();

        let in_day = repo.by_date_range(&day()).await.unwrap();
        let amounts: Vec<i64> = in_day.iter().map(|e| e.amount_paise).collect();
        assert_eq!(amounts, vec![1000, 2000]);
        assert_eq!(repo.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let db = database().await;
        let err = db.expenses().create(&expense(0, day().start)).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));
    }

    #[tokio::test]
    async fn test_expense_user_must_exist() {
        let db = database().await;
        let repo = db.expenses();

        let mut unknown = expense(1000, day().start);
        unknown.user_id = Some(42);
        let err = repo.create(&unknown).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let mut known = expense(1000, day().start);
        known.user_id = Some(staff(&db, "meera").await);
        assert_eq!(repo.create(&known).await.unwrap().user_id, known.user_id);
    }
}
