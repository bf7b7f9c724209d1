//! # Report Queries
//!
//! Read-only aggregation over finalized transactions and profits,
//! filtered by an inclusive creation-date range.
//!
//! Dates are compared at day granularity: `date(created_at)` against the
//! requested start/end dates, both ends inclusive.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kasir_core::validation::validate_date_range;
use kasir_core::CoreError;

// =============================================================================
// Read Models
// =============================================================================

/// One transaction row in the sales report, joined with the customer
/// name when a customer was attached.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalesRow {
    pub id: String,
    pub cashier_id: String,
    pub invoice: String,
    pub cash: i64,
    pub change: i64,
    pub discount: i64,
    pub grand_total: i64,
    pub created_at: DateTime<Utc>,
    pub customer_name: Option<String>,
}

/// Sales report for a date range: the matching transactions plus the
/// summed grand total.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub sales: Vec<SalesRow>,
    pub total: i64,
}

/// One profit row in the profit report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProfitRow {
    pub id: String,
    pub transaction_id: String,
    pub invoice: String,
    pub total: i64,
    pub created_at: DateTime<Utc>,
}

/// Profit report for a date range: the matching profit rows plus the
/// summed total.
#[derive(Debug, Clone, Serialize)]
pub struct ProfitReport {
    pub profits: Vec<ProfitRow>,
    pub total: i64,
}

// =============================================================================
// Queries
// =============================================================================

/// Read-only reporting interface.
#[derive(Debug, Clone)]
pub struct ReportQueries {
    pool: SqlitePool,
}

impl ReportQueries {
    /// Creates a new ReportQueries.
    pub fn new(pool: SqlitePool) -> Self {
        ReportQueries { pool }
    }

    /// Transactions created between `start` and `end` (inclusive),
    /// newest first, with the summed grand total.
    pub async fn sales_between(&self, start: NaiveDate, end: NaiveDate) -> DbResult<SalesReport> {
        validate_date_range(start, end).map_err(CoreError::from)?;

        debug!(%start, %end, "Running sales report");

        let sales = sqlx::query_as::<_, SalesRow>(
            r#"
            SELECT
                t.id,
                t.cashier_id,
                t.invoice,
                t.cash,
                t.change,
                t.discount,
                t.grand_total,
                t.created_at,
                cu.name AS customer_name
            FROM transactions t
            LEFT JOIN customers cu ON cu.id = t.customer_id
            WHERE date(t.created_at) BETWEEN date(?1) AND date(?2)
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(grand_total), 0)
            FROM transactions
            WHERE date(created_at) BETWEEN date(?1) AND date(?2)
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(SalesReport { sales, total })
    }

    /// Profit rows created between `start` and `end` (inclusive), newest
    /// first, with the summed profit total.
    pub async fn profits_between(&self, start: NaiveDate, end: NaiveDate) -> DbResult<ProfitReport> {
        validate_date_range(start, end).map_err(CoreError::from)?;

        debug!(%start, %end, "Running profit report");

        let profits = sqlx::query_as::<_, ProfitRow>(
            r#"
            SELECT
                pr.id,
                pr.transaction_id,
                t.invoice,
                pr.total,
                pr.created_at
            FROM profits pr
            INNER JOIN transactions t ON t.id = pr.transaction_id
            WHERE date(pr.created_at) BETWEEN date(?1) AND date(?2)
            ORDER BY pr.created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total), 0)
            FROM profits
            WHERE date(created_at) BETWEEN date(?1) AND date(?2)
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProfitReport { profits, total })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
