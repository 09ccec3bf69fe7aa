//! # Domain Types
//!
//! Core domain types used throughout Backroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Employee     │   │     Product     │   │  AbsenceRequest │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  email (unique) │   │  sku (business) │   │  employee (FK)  │       │
//! │  │  salary_cents🔒 │   │  price_cents🔒  │   │  start..end     │       │
//! │  │  address (FK)   │   │  is_active      │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │      Task       │   │   TaskAssignment    │   │ TransactionItem │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  id (i64)       │◄──│ (task, employee) PK │   │ (txn, product)  │   │
//! │  │  duration_mins  │   │  assigned_at        │   │  quantity🔒     │   │
//! │  │  is_active      │   └─────────────────────┘   └─────────────────┘   │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  🔒 = private field guarded by a checked mutator                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Every standalone entity carries a surrogate `i64` id. The id is `0` while
//! the entity is detached (not yet persisted); the store assigns the real,
//! positive id on first insert and it is immutable afterwards. Association
//! records (TaskAssignment, TransactionItem) are keyed by the pair of ids
//! they join instead.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_email, validate_name};
use crate::{MAX_LINE_QUANTITY, RESET_TOKEN_TTL_MINUTES};

// =============================================================================
// Address
// =============================================================================

/// A postal address, referenced by employees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Address {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// Creates a detached address.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Address {
            id: 0,
            street: street.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }
}

// =============================================================================
// Employee
// =============================================================================

/// A staff member.
///
/// ## Invariant
/// `salary_cents` is never negative. The field is private and can only be
///// changed through [`Employee::set_salary`], which rejects negative values
/// and leaves the prior salary in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Unique business identifier, also used for password-reset flows.
    pub email: String,
    pub phone: Option<String>,
    /// Job title, e.g. "Cashier" or "Warehouse Manager".
    pub position: String,
    /// Monthly salary in cents. Guarded: see [`Employee::set_salary`].
    salary_cents: i64,
    /// Home address, if recorded.
    pub address_id: Option<i64>,
    pub hired_on: NaiveDate,
}

impl Employee {
    /// Creates a detached employee, validating names, email and salary.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        position: impl Into<String>,
        salary: Money,
        hired_on: NaiveDate,
    ) -> CoreResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let email = email.into();

        validate_name("first_name", &first_name)?;
        validate_name("last_name", &last_name)?;
        validate_email(&email)?;

        if salary.is_negative() {
            return Err(CoreError::NegativeSalary {
                cents: salary.cents(),
            });
        }

        Ok(Employee {
            id: 0,
            first_name,
            last_name,
            email,
            phone: None,
            position: position.into(),
            salary_cents: salary.cents(),
            address_id: None,
            hired_on,
        })
    }

    /// Returns the salary as a Money value.
    #[inline]
    pub fn salary(&self) -> Money {
        Money::from_cents(self.salary_cents)
    }

    /// Returns the salary in cents.
    #[inline]
    pub fn salary_cents(&self) -> i64 {
        self.salary_cents
    }

    /// Sets the salary, rejecting negative values.
    ///
    /// On rejection the previous salary is left unchanged.
    pub fn set_salary(&mut self, salary: Money) -> CoreResult<()> {
        if salary.is_negative() {
            return Err(CoreError::NegativeSalary {
                cents: salary.cents(),
            });
        }
        self.salary_cents = salary.cents();
        Ok(())
    }

    /// Full display name, "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product carried by the store.
///
/// ## Invariant
/// `price_cents` is never negative; see [`Product::set_price`].
///
/// ## Soft Delete
/// Products are never physically removed by default: historical orders and
/// transactions keep referencing them. `is_active = false` hides a product
/// from default listings while keeping the row addressable for restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    pub name: String,
    /// Optional business identifier (e.g. "COKE-330").
    pub sku: Option<String>,
    /// Unit price in cents. Guarded: see [`Product::set_price`].
    price_cents: i64,
    /// Soft-delete flag; false means hidden from default listings.
    pub is_active: bool,
}

impl Product {
    /// Creates a detached, active product, validating name and price.
    pub fn new(
        name: impl Into<String>,
        sku: Option<String>,
        price: Money,
    ) -> CoreResult<Self> {
        let name = name.into();
        validate_name("name", &name)?;

        if price.is_negative() {
            return Err(CoreError::NegativePrice {
                cents: price.cents(),
            });
        }

        Ok(Product {
            id: 0,
            name,
            sku,
            price_cents: price.cents(),
            is_active: true,
        })
    }

    /// Returns the price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the price in cents.
    #[inline]
    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    /// Sets the price, rejecting negative values.
    ///
    /// On rejection the previous price is left unchanged.
    pub fn set_price(&mut self, price: Money) -> CoreResult<()> {
        if price.is_negative() {
            return Err(CoreError::NegativePrice {
                cents: price.cents(),
            });
        }
        self.price_cents = price.cents();
        Ok(())
    }
}

// =============================================================================
// Stock Level
// =============================================================================

/// A warehouse stock row: how many units of one product sit at one location.
///
/// ## Invariant
/// `quantity` is never negative; the schema enforces the same rule with a
/// CHECK constraint as a second line of defense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockLevel {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    pub product_id: i64,
    /// Units on hand. Guarded: see [`StockLevel::set_quantity`].
    quantity: i64,
    /// Shelf / aisle label, e.g. "A-12".
    pub location: String,
}

impl StockLevel {
    /// Creates a detached stock row, rejecting negative quantities.
    pub fn new(
        product_id: i64,
        quantity: i64,
        location: impl Into<String>,
    ) -> CoreResult<Self> {
        if quantity < 0 {
            return Err(CoreError::NegativeStock { quantity });
        }
        Ok(StockLevel {
            id: 0,
            product_id,
            quantity,
            location: location.into(),
        })
    }

    /// Units currently on hand.
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Sets the on-hand quantity, rejecting negative values.
    pub fn set_quantity(&mut self, quantity: i64) -> CoreResult<()> {
        if quantity < 0 {
            return Err(CoreError::NegativeStock { quantity });
        }
        self.quantity = quantity;
        Ok(())
    }
}

// =============================================================================
// Order
// =============================================================================

/// The state of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed and awaits fulfilment.
    Placed,
    /// Order has been fulfilled.
    Completed,
    /// Order was cancelled before fulfilment.
    Cancelled,
}

/// A restocking order placed by an employee for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    /// Employee who placed the order.
    pub employee_id: i64,
    pub product_id: i64,
    /// Units ordered; always positive.
    quantity: i64,
    pub order_date: NaiveDate,
    pub status: OrderStatus,
}

impl Order {
    /// Creates a detached order, rejecting non-positive quantities.
    pub fn new(
        employee_id: i64,
        product_id: i64,
        quantity: i64,
        order_date: NaiveDate,
    ) -> CoreResult<Self> {
        if quantity < 1 {
            return Err(CoreError::InvalidQuantity { quantity });
        }
        Ok(Order {
            id: 0,
            employee_id,
            product_id,
            quantity,
            order_date,
            status: OrderStatus::Placed,
        })
    }

    /// Units ordered.
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A checkout transaction recorded by an employee.
///
/// Products sold in the transaction hang off it as [`TransactionItem`]
/// association rows; the transaction row itself carries no amounts — totals
/// are derived from its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    /// Employee who rang the transaction up.
    pub employee_id: i64,
    pub transaction_date: NaiveDate,
    pub note: Option<String>,
}

impl Transaction {
    /// Creates a detached transaction.
    pub fn new(employee_id: i64, transaction_date: NaiveDate) -> Self {
        Transaction {
            id: 0,
            employee_id,
            transaction_date,
            note: None,
        }
    }
}

/// A quantity-bearing line joining a transaction to a product.
///
/// ## Composite Key
/// Keyed by `(transaction_id, product_id)` — exactly the pair of referenced
/// identities. The row cannot exist unless both sides are already persisted;
/// the store enforces that with foreign keys.
///
/// ## Invariant
/// `quantity` is always positive and bounded by [`MAX_LINE_QUANTITY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionItem {
    /// Parent transaction; 0 while the line is detached, filled in when the
    /// line is inserted together with its parent.
    pub transaction_id: i64,
    pub product_id: i64,
    /// Units sold on this line. Always >= 1.
    quantity: i64,
}

impl TransactionItem {
    /// Creates a detached line for a product, rejecting non-positive and
    /// absurdly large quantities.
    pub fn new(product_id: i64, quantity: i64) -> CoreResult<Self> {
        if quantity < 1 || quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::InvalidQuantity { quantity });
        }
        Ok(TransactionItem {
            transaction_id: 0,
            product_id,
            quantity,
        })
    }

    /// Units sold on this line.
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

// =============================================================================
// Absence Request
// =============================================================================

/// The review state of an absence request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting a manager's decision.
    Pending,
    Accepted,
    Rejected,
}

/// A leave/absence request for an inclusive date interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AbsenceRequest {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    pub employee_id: i64,
    /// First day away, inclusive.
    pub start_date: NaiveDate,
    /// Last day away, inclusive.
    pub end_date: NaiveDate,
    pub status: RequestStatus,
    pub reason: Option<String>,
}

impl AbsenceRequest {
    /// Creates a pending request, rejecting inverted date ranges.
    pub fn new(
        employee_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> CoreResult<Self> {
        if start_date > end_date {
            return Err(CoreError::InvalidDateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }
        Ok(AbsenceRequest {
            id: 0,
            employee_id,
            start_date,
            end_date,
            status: RequestStatus::Pending,
            reason,
        })
    }

    /// Standard interval-intersection test, inclusive on both ends.
    ///
    /// `[self.start_date, self.end_date]` overlaps `[start, end]` iff
    /// `self.start_date <= end && self.end_date >= start`. The SQL finder in
    /// the repository layer applies the same predicate.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }
}

// =============================================================================
// Task
// =============================================================================

/// The progress state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Done,
}

/// A unit of scheduled work, assignable to employees.
///
/// ## Lifecycle
/// ```text
/// Active ──(soft_delete)──► Deleted ──(restore)──► Active
/// ```
/// Only active tasks appear in default listings; deleted tasks appear only
/// in the dedicated deleted listing and keep all fields for restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Task {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// The day the work is scheduled for; drives workload aggregation.
    pub task_date: NaiveDate,
    /// Planned effort in minutes; summed per employee by workload queries.
    pub duration_minutes: i64,
    /// Soft-delete flag; false means hidden from default listings.
    pub is_active: bool,
}

impl Task {
    /// Creates a detached, active task in the `Open` state.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        task_date: NaiveDate,
        duration_minutes: i64,
    ) -> CoreResult<Self> {
        let name = name.into();
        validate_name("name", &name)?;

        Ok(Task {
            id: 0,
            name,
            description,
            status: TaskStatus::Open,
            task_date,
            duration_minutes,
            is_active: true,
        })
    }
}

/// Assigns an employee to a task.
///
/// ## Composite Key
/// Keyed by `(task_id, employee_id)`; both sides must already be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TaskAssignment {
    pub task_id: i64,
    pub employee_id: i64,
    pub assigned_at: DateTime<Utc>,
}

/// One row of the per-employee workload aggregation.
///
/// `hours` is the sum of assigned task durations inside the queried date
/// range, converted to hours and rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct WorkloadEntry {
    pub employee_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub hours: f64,
}

// =============================================================================
// Technical Issue
// =============================================================================

/// The handling state of a technical issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
}

/// A technical problem reported by an employee (broken till, printer jam...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TechnicalIssue {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    /// Employee who reported the issue.
    pub employee_id: i64,
    pub title: String,
    pub description: String,
    pub reported_at: DateTime<Utc>,
    pub status: IssueStatus,
}

impl TechnicalIssue {
    /// Creates a detached, open issue.
    pub fn new(
        employee_id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        reported_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let title = title.into();
        validate_name("title", &title)?;

        Ok(TechnicalIssue {
            id: 0,
            employee_id,
            title,
            description: description.into(),
            reported_at,
            status: IssueStatus::Open,
        })
    }
}

// =============================================================================
// Report
// =============================================================================

/// A record of a generated report file.
///
/// Rendering the PDF itself is a collaborator's job; this type only tracks
/// what was generated, when, by whom, and under which file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Report {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    /// Free-form report kind, e.g. "monthly sales".
    pub report_type: String,
    pub generated_at: DateTime<Utc>,
    /// Sanitized file name, see [`report_file_name`].
    pub file_name: String,
    /// Employee who requested the report, if known.
    pub author_id: Option<i64>,
}

impl Report {
    /// Creates a detached report record with a derived file name.
    pub fn new(
        report_type: impl Into<String>,
        generated_at: DateTime<Utc>,
        author_id: Option<i64>,
    ) -> CoreResult<Self> {
        let report_type = report_type.into();
        validate_name("report_type", &report_type)?;

        let file_name = report_file_name(&report_type, generated_at);
        Ok(Report {
            id: 0,
            report_type,
            generated_at,
            file_name,
            author_id,
        })
    }
}

/// Builds the on-disk file name for a report: the sanitized report type plus
/// a timestamp, e.g. `monthly_sales_20260830_141500.pdf`.
///
/// Sanitization lowercases the type and collapses every run of
/// non-alphanumeric characters into a single underscore, so arbitrary
/// user-entered report names stay filesystem-safe.
pub fn report_file_name(report_type: &str, at: DateTime<Utc>) -> String {
    let mut sanitized = String::with_capacity(report_type.len());
    let mut last_was_sep = true;

    for c in report_type.chars() {
        if c.is_alphanumeric() {
            sanitized.extend(c.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            sanitized.push('_');
            last_was_sep = true;
        }
    }
    let sanitized = sanitized.trim_end_matches('_');
    let stem = if sanitized.is_empty() { "report" } else { sanitized };

    format!("{}_{}.pdf", stem, at.format("%Y%m%d_%H%M%S"))
}

// =============================================================================
// Password Reset Token
// =============================================================================

/// A one-time token for an employee's password-reset flow.
///
/// The token value is generated by the persistence layer; submitting it by
/// email is a collaborator's job and out of scope here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PasswordResetToken {
    /// Surrogate identifier; 0 until persisted.
    pub id: i64,
    pub employee_id: i64,
    /// Opaque token value handed to the employee.
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// True once the token has been redeemed.
    pub used: bool,
}

impl PasswordResetToken {
    /// Creates a detached token valid for [`RESET_TOKEN_TTL_MINUTES`].
    pub fn new(employee_id: i64, token: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        PasswordResetToken {
            id: 0,
            employee_id,
            token: token.into(),
            created_at,
            expires_at: created_at + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
            used: false,
        }
    }

    /// A token is valid while unused and unexpired.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.used && now < self.expires_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee() -> Employee {
        Employee::new(
            "Jan",
            "Kowalski",
            "jan@example.com",
            "Cashier",
            Money::from_cents(400_000),
            date(2024, 1, 15),
        )
        .unwrap()
    }

    #[test]
    fn test_negative_salary_rejected_on_construction() {
        let result = Employee::new(
            "Jan",
            "Kowalski",
            "jan@example.com",
            "Cashier",
            Money::from_cents(-1),
            date(2024, 1, 15),
        );
        assert!(matches!(result, Err(CoreError::NegativeSalary { cents: -1 })));
    }

    #[test]
    fn test_set_salary_rejects_negative_and_keeps_prior_value() {
        let mut emp = employee();
        let err = emp.set_salary(Money::from_cents(-500)).unwrap_err();
        assert!(matches!(err, CoreError::NegativeSalary { cents: -500 }));
        // prior valid value unchanged
        assert_eq!(emp.salary_cents(), 400_000);

        emp.set_salary(Money::from_cents(450_000)).unwrap();
        assert_eq!(emp.salary().cents(), 450_000);
    }

    #[test]
    fn test_set_price_rejects_negative_and_keeps_prior_value() {
        let mut product =
            Product::new("Cola 330ml", Some("COKE-330".into()), Money::from_cents(299)).unwrap();
        let err = product.set_price(Money::from_cents(-299)).unwrap_err();
        assert!(matches!(err, CoreError::NegativePrice { .. }));
        assert_eq!(product.price_cents(), 299);
    }

    #[test]
    fn test_stock_quantity_never_negative() {
        assert!(StockLevel::new(1, -3, "A-12").is_err());

        let mut stock = StockLevel::new(1, 10, "A-12").unwrap();
        assert!(stock.set_quantity(-1).is_err());
        assert_eq!(stock.quantity(), 10);
    }

    #[test]
    fn test_transaction_item_quantity_bounds() {
        assert!(matches!(
            TransactionItem::new(1, 0),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        ));
        assert!(TransactionItem::new(1, -4).is_err());
        assert!(TransactionItem::new(1, MAX_LINE_QUANTITY + 1).is_err());
        assert_eq!(TransactionItem::new(1, 3).unwrap().quantity(), 3);
    }

    #[test]
    fn test_absence_rejects_inverted_range() {
        let result = AbsenceRequest::new(1, date(2025, 7, 10), date(2025, 7, 1), None);
        assert!(matches!(result, Err(CoreError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_absence_overlap_is_inclusive() {
        let request =
            AbsenceRequest::new(1, date(2025, 7, 1), date(2025, 7, 10), None).unwrap();

        // fully inside, partially inside
        assert!(request.overlaps(date(2025, 7, 3), date(2025, 7, 5)));
        assert!(request.overlaps(date(2025, 6, 25), date(2025, 7, 1)));
        // touching at a single boundary day still overlaps
        assert!(request.overlaps(date(2025, 7, 10), date(2025, 7, 20)));
        // disjoint on either side
        assert!(!request.overlaps(date(2025, 6, 1), date(2025, 6, 30)));
        assert!(!request.overlaps(date(2025, 7, 11), date(2025, 7, 20)));
    }

    #[test]
    fn test_report_file_name_sanitization() {
        let at = DateTime::parse_from_rfc3339("2026-08-30T14:15:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(
            report_file_name("Monthly Sales", at),
            "monthly_sales_20260830_141500.pdf"
        );
        assert_eq!(
            report_file_name("  Q3//Staff: absences!  ", at),
            "q3_staff_absences_20260830_141500.pdf"
        );
        assert_eq!(report_file_name("???", at), "report_20260830_141500.pdf");
    }

    #[test]
    fn test_reset_token_validity_window() {
        let created = DateTime::parse_from_rfc3339("2026-08-30T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let token = PasswordResetToken::new(7, "abc", created);

        assert!(token.is_valid(created + Duration::minutes(5)));
        assert!(!token.is_valid(created + Duration::minutes(RESET_TOKEN_TTL_MINUTES)));

        let mut used = token.clone();
        used.used = true;
        assert!(!used.is_valid(created));
    }
}
