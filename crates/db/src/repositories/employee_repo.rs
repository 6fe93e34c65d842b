//! Repository for the `employees` table.

use sqlx::{PgExecutor, PgPool};
use workwear_core::inventory::EmployeeStatus;
use workwear_core::roles::ROLE_READ_ONLY;
use workwear_core::types::DbId;

use crate::models::employee::{CreateEmployee, Employee};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, entra_id, first_name, last_name, email, role, status, \
                        created_at, updated_at";

/// Provides CRUD operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee, returning the created row.
    ///
    /// Missing role defaults to `READ_ONLY`, missing status to `ACTIVE`.
    pub async fn create(pool: &PgPool, input: &CreateEmployee) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees (entra_id, first_name, last_name, email, role, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(&input.entra_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(input.role.as_deref().unwrap_or(ROLE_READ_ONLY))
            .bind(input.status.unwrap_or(EmployeeStatus::Active).as_str())
            .fetch_one(pool)
            .await
    }

    /// Find an employee by internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List employees ordered by last name, then first name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees ORDER BY last_name, first_name, id");
        sqlx::query_as::<_, Employee>(&query).fetch_all(pool).await
    }
}
