//! # Shift Repository
//!
//! Employee clock-in / clock-out.
//!
//! ```text
//! clock_in(user 99) ──► UserNotFound / UserInactive    (must be active staff)
//!        │
//! clock_in(user 7) ──► shift #12 { clock_out: NULL }   (one open shift per user)
//!        │
//! clock_in(user 7) ──► ShiftAlreadyActive
//!        │
//! clock_out(#12)   ──► shift #12 { clock_out: 17:02 }
//!        │
//! clock_out(#12)   ──► ShiftAlreadyClosed
//! ```

use cafe_core::error::CoreError;
use cafe_core::EmployeeShift;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// Every shift, most recent first.
    pub async fn list(&self) -> DbResult<Vec<EmployeeShift>> {
        let shifts = sqlx::query_as::<_, EmployeeShift>(
            "SELECT id, user_id, clock_in, clock_out FROM employee_shifts ORDER BY clock_in DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }

    pub async fn by_user(&self, user_id: i64) -> DbResult<Vec<EmployeeShift>> {
        let shifts = sqlx::query_as::<_, EmployeeShift>(
            r#"
            SELECT id, user_id, clock_in, clock_out FROM employee_shifts
            WHERE user_id = ?1
            ORDER BY clock_in DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }

    /// Shifts nobody has clocked out of yet.
    pub async fn active(&self) -> DbResult<Vec<EmployeeShift>> {
        let shifts = sqlx::query_as::<_, EmployeeShift>(
            r#"
            SELECT id, user_id, clock_in, clock_out FROM employee_shifts
            WHERE clock_out IS NULL
            ORDER BY clock_in
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<EmployeeShift>> {
        let shift = sqlx::query_as::<_, EmployeeShift>(
            "SELECT id, user_id, clock_in, clock_out FROM employee_shifts WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Opens a shift for `user_id`.
    ///
    /// ## Errors
    /// - `UserNotFound` for an unknown id, `UserInactive` for deactivated staff
    /// - `ShiftAlreadyActive` while the user still has an open shift. The
    ///   partial unique index on open shifts backs this up against two tills
    ///   racing each other.
    pub async fn clock_in(&self, user_id: i64) -> DbResult<EmployeeShift> {
        let active: Option<bool> = sqlx::query_scalar("SELECT active FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match active {
            None => return Err(CoreError::UserNotFound(user_id).into()),
            Some(false) => return Err(CoreError::UserInactive(user_id).into()),
            Some(true) => {}
        }

        let open: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM employee_shifts WHERE user_id = ?1 AND clock_out IS NULL",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if open.is_some() {
            return Err(CoreError::ShiftAlreadyActive { user_id }.into());
        }

        let result = sqlx::query("INSERT INTO employee_shifts (user_id, clock_in) VALUES (?1, ?2)")
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => CoreError::ShiftAlreadyActive { user_id }.into(),
                other => other,
            })?;

        let id = result.last_insert_rowid();
        info!(user_id, shift_id = id, "Clocked in");

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Shift", id.to_string()))
    }

    /// Closes an open shift.
    pub async fn clock_out(&self, id: i64) -> DbResult<EmployeeShift> {
        let result = sqlx::query(
            "UPDATE employee_shifts SET clock_out = ?2 WHERE id = ?1 AND clock_out IS NULL",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Either the shift does not exist or it was already closed.
            return match self.get(id).await? {
                Some(_) => Err(CoreError::ShiftAlreadyClosed(id).into()),
                None => Err(DbError::not_found("Shift", id.to_string())),
            };
        }

        let shift = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Shift", id.to_string()))?;

        info!(user_id = shift.user_id, shift_id = id, "Clocked out");
        Ok(shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{database, staff};
    use crate::repository::user::NewUser;
    use cafe_core::UserRole;

    #[tokio::test]
    async fn test_clock_in_and_out() {
        let db = database().await;
        let repo = db.shifts();
        let ravi = staff(&db, "ravi").await;

        let shift = repo.clock_in(ravi).await.unwrap();
        assert!(shift.is_active());
        assert_eq!(shift.user_id, ravi);
        assert_eq!(repo.active().await.unwrap().len(), 1);

        let closed = repo.clock_out(shift.id).await.unwrap();
        assert!(!closed.is_active());
        assert!(closed.duration().unwrap() >= chrono::Duration::zero());
        assert!(repo.active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_clock_in_rejected() {
        let db = database().await;
        let repo = db.shifts();
        let ravi = staff(&db, "ravi").await;
        let asha = staff(&db, "asha").await;

        repo.clock_in(ravi).await.unwrap();
        let err = repo.clock_in(ravi).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ShiftAlreadyActive { user_id }) if user_id == ravi
        ));

        // Another employee is unaffected.
        repo.clock_in(asha).await.unwrap();
    }

    #[tokio::test]
    async fn test_clock_in_requires_active_user() {
        let db = database().await;
        let repo = db.shifts();

        let err = repo.clock_in(99).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::UserNotFound(99))));

        let mut left = NewUser::new("Kiran", "kiran", UserRole::Staff);
        left.active = false;
        let kiran = db.users().create(&left).await.unwrap().id;
        let err = repo.clock_in(kiran).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::UserInactive(id)) if id == kiran));

        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clock_out_twice_rejected() {
        let db = database().await;
        let repo = db.shifts();
        let ravi = staff(&db, "ravi").await;

        let shift = repo.clock_in(ravi).await.unwrap();
        repo.clock_out(shift.id).await.unwrap();

        let err = repo.clock_out(shift.id).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ShiftAlreadyClosed(_))));

        let err = repo.clock_out(999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_shifts_by_user_after_reopening() {
        let db = database().await;
        let repo = db.shifts();
        let ravi = staff(&db, "ravi").await;
        let asha = staff(&db, "asha").await;

        let first = repo.clock_in(ravi).await.unwrap();
        repo.clock_out(first.id).await.unwrap();
        repo.clock_in(ravi).await.unwrap();
        repo.clock_in(asha).await.unwrap();

        assert_eq!(repo.by_user(ravi).await.unwrap().len(), 2);
        assert_eq!(repo.list().await.unwrap().len(), 3);
    }
}
