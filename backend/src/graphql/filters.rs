//! GraphQL filter input types for flexible querying
//!
//! These are the leaf predicates of a `where` tree, with the operator
//! vocabulary the admin clients send:
//! - equals, not
//! - lt, lte, gt, gte (comparisons)
//! - contains, startsWith, endsWith (string matching)
//! - in, notIn (list membership)
//!
//! Each filter knows how to render itself as parameterized SQL fragments for
//! a given column via `sql_conditions`; the `*WhereInput` types in the entity
//! modules compose those fragments into full WHERE trees.

use async_graphql::InputObject;

use super::orm::SqlValue;

/// Filter for string fields
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "StringFilter")]
pub struct StringFilter {
    /// Equals
    pub equals: Option<String>,
    /// Not equals
    pub not: Option<String>,
    /// Contains substring
    pub contains: Option<String>,
    /// Starts with
    pub starts_with: Option<String>,
    /// Ends with
    pub ends_with: Option<String>,
    /// In list
    #[graphql(name = "in")]
    pub in_list: Option<Vec<String>>,
    /// Not in list
    pub not_in: Option<Vec<String>>,
}

/// Filter for integer fields
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "IntFilter")]
pub struct IntFilter {
    /// Equals
    pub equals: Option<i64>,
    /// Not equals
    pub not: Option<i64>,
    /// Less than
    pub lt: Option<i64>,
    /// Less than or equal
    pub lte: Option<i64>,
    /// Greater than
    pub gt: Option<i64>,
    /// Greater than or equal
    pub gte: Option<i64>,
    /// In list
    #[graphql(name = "in")]
    pub in_list: Option<Vec<i64>>,
    /// Not in list
    pub not_in: Option<Vec<i64>>,
}

/// Filter for float fields
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "FloatFilter")]
pub struct FloatFilter {
    /// Equals
    pub equals: Option<f64>,
    /// Not equals
    pub not: Option<f64>,
    /// Less than
    pub lt: Option<f64>,
    /// Less than or equal
    pub lte: Option<f64>,
    /// Greater than
    pub gt: Option<f64>,
    /// Greater than or equal
    pub gte: Option<f64>,
}

/// Filter for date/timestamp fields (stored as RFC3339 strings)
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "DateTimeFilter")]
pub struct DateTimeFilter {
    /// Equals
    pub equals: Option<String>,
    /// Not equals
    pub not: Option<String>,
    /// Before (less than)
    pub lt: Option<String>,
    /// Before or on (less than or equal)
    pub lte: Option<String>,
    /// After (greater than)
    pub gt: Option<String>,
    /// After or on (greater than or equal)
    pub gte: Option<String>,
}

// ============================================================================
// SQL Generation
// ============================================================================

impl StringFilter {
    /// Check if filter has any conditions
    pub fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not.is_none()
            && self.contains.is_none()
            && self.starts_with.is_none()
            && self.ends_with.is_none()
            && self.in_list.is_none()
            && self.not_in.is_none()
    }

    /// Render this filter as WHERE fragments over `column`.
    pub fn sql_conditions(&self, column: &str) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        if let Some(ref v) = self.equals {
            conditions.push(format!("{} = ?", column));
            values.push(SqlValue::String(v.clone()));
        }
        if let Some(ref v) = self.not {
            conditions.push(format!("{} != ?", column));
            values.push(SqlValue::String(v.clone()));
        }
        if let Some(ref v) = self.contains {
            conditions.push(format!("{} LIKE ? ESCAPE '\\'", column));
            values.push(SqlValue::String(format!("%{}%", escape_like(v))));
        }
        if let Some(ref v) = self.starts_with {
            conditions.push(format!("{} LIKE ? ESCAPE '\\'", column));
            values.push(SqlValue::String(format!("{}%", escape_like(v))));
        }
        if let Some(ref v) = self.ends_with {
            conditions.push(format!("{} LIKE ? ESCAPE '\\'", column));
            values.push(SqlValue::String(format!("%{}", escape_like(v))));
        }
        if let Some(ref list) = self.in_list {
            if list.is_empty() {
                // IN () matches nothing
                conditions.push("1 = 0".to_string());
            } else {
                let placeholders = vec!["?"; list.len()].join(", ");
                conditions.push(format!("{} IN ({})", column, placeholders));
                values.extend(list.iter().cloned().map(SqlValue::String));
            }
        }
        if let Some(ref list) = self.not_in {
            if !list.is_empty() {
                let placeholders = vec!["?"; list.len()].join(", ");
                conditions.push(format!("{} NOT IN ({})", column, placeholders));
                values.extend(list.iter().cloned().map(SqlValue::String));
            }
        }

        (conditions, values)
    }

    // ========================================================================
    // Helper constructors for programmatic use
    // ========================================================================

    /// Create an equals filter
    pub fn equals(value: impl Into<String>) -> Self {
        Self {
            equals: Some(value.into()),
            ..Default::default()
        }
    }

    /// Create a contains filter
    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            contains: Some(value.into()),
            ..Default::default()
        }
    }

    /// Create a starts-with filter
    pub fn starts_with(value: impl Into<String>) -> Self {
        Self {
            starts_with: Some(value.into()),
            ..Default::default()
        }
    }

    /// Create an in-list filter
    pub fn in_list(values: Vec<String>) -> Self {
        Self {
            in_list: Some(values),
            ..Default::default()
        }
    }
}

impl IntFilter {
    /// Check if filter has any conditions
    pub fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not.is_none()
            && self.lt.is_none()
            && self.lte.is_none()
            && self.gt.is_none()
            && self.gte.is_none()
            && self.in_list.is_none()
            && self.not_in.is_none()
    }

    /// Render this filter as WHERE fragments over `column`.
    pub fn sql_conditions(&self, column: &str) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        for (op, v) in [
            ("=", self.equals),
            ("!=", self.not),
            ("<", self.lt),
            ("<=", self.lte),
            (">", self.gt),
            (">=", self.gte),
        ] {
            if let Some(v) = v {
                conditions.push(format!("{} {} ?", column, op));
                values.push(SqlValue::Int(v));
            }
        }
        if let Some(ref list) = self.in_list {
            if list.is_empty() {
                conditions.push("1 = 0".to_string());
            } else {
                let placeholders = vec!["?"; list.len()].join(", ");
                conditions.push(format!("{} IN ({})", column, placeholders));
                values.extend(list.iter().copied().map(SqlValue::Int));
            }
        }
        if let Some(ref list) = self.not_in {
            if !list.is_empty() {
                let placeholders = vec!["?"; list.len()].join(", ");
                conditions.push(format!("{} NOT IN ({})", column, placeholders));
                values.extend(list.iter().copied().map(SqlValue::Int));
            }
        }

        (conditions, values)
    }

    /// Create an equals filter
    pub fn equals(value: i64) -> Self {
        Self {
            equals: Some(value),
            ..Default::default()
        }
    }

    /// Create a greater-than-or-equal filter
    pub fn gte(value: i64) -> Self {
        Self {
            gte: Some(value),
            ..Default::default()
        }
    }

    /// Create a between filter (inclusive)
    pub fn between(min: i64, max: i64) -> Self {
        Self {
            gte: Some(min),
            lte: Some(max),
            ..Default::default()
        }
    }
}

impl FloatFilter {
    /// Check if filter has any conditions
    pub fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not.is_none()
            && self.lt.is_none()
            && self.lte.is_none()
            && self.gt.is_none()
            && self.gte.is_none()
    }

    /// Render this filter as WHERE fragments over `column`.
    pub fn sql_conditions(&self, column: &str) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        for (op, v) in [
            ("=", self.equals),
            ("!=", self.not),
            ("<", self.lt),
            ("<=", self.lte),
            (">", self.gt),
            (">=", self.gte),
        ] {
            if let Some(v) = v {
                conditions.push(format!("{} {} ?", column, op));
                values.push(SqlValue::Float(v));
            }
        }

        (conditions, values)
    }

    /// Create a greater-than filter
    pub fn gt(value: f64) -> Self {
        Self {
            gt: Some(value),
            ..Default::default()
        }
    }
}

impl DateTimeFilter {
    /// Check if filter has any conditions
    pub fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not.is_none()
            && self.lt.is_none()
            && self.lte.is_none()
            && self.gt.is_none()
            && self.gte.is_none()
    }

    /// Render this filter as WHERE fragments over `column`.
    ///
    /// RFC3339 strings compare correctly as text.
    pub fn sql_conditions(&self, column: &str) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        for (op, v) in [
            ("=", &self.equals),
            ("!=", &self.not),
            ("<", &self.lt),
            ("<=", &self.lte),
            (">", &self.gt),
            (">=", &self.gte),
        ] {
            if let Some(v) = v {
                conditions.push(format!("{} {} ?", column, op));
                values.push(SqlValue::String(v.clone()));
            }
        }

        (conditions, values)
    }

    /// Create a before (less than) filter
    pub fn before(value: impl Into<String>) -> Self {
        Self {
            lt: Some(value.into()),
            ..Default::default()
        }
    }
}

/// Escape LIKE wildcards in user input.
fn escape_like(value: &str) -> String {
    value.replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_equals_renders_single_parameterized_condition() {
        let filter = StringFilter::equals("Card");
        let (conditions, values) = filter.sql_conditions("payments.payment_type");

        assert_eq!(conditions, vec!["payments.payment_type = ?"]);
        assert_eq!(values, vec![SqlValue::String("Card".to_string())]);
    }

    #[test]
    fn gte_round_trips_exactly() {
        let filter = IntFilter::gte(10);
        let (conditions, values) = filter.sql_conditions("orders.total_price");

        assert_eq!(conditions, vec!["orders.total_price >= ?"]);
        assert_eq!(values, vec![SqlValue::Int(10)]);
    }

    #[test]
    fn int_between_emits_both_bounds() {
        let filter = IntFilter::between(10, 100);
        let (conditions, values) = filter.sql_conditions("orders.total_price");

        assert_eq!(
            conditions,
            vec!["orders.total_price <= ?", "orders.total_price >= ?"]
        );
        assert_eq!(values, vec![SqlValue::Int(100), SqlValue::Int(10)]);
    }

    #[test]
    fn in_list_expands_placeholders() {
        let filter = StringFilter::in_list(vec!["a".into(), "b".into(), "c".into()]);
        let (conditions, values) = filter.sql_conditions("customers.id");

        assert_eq!(conditions, vec!["customers.id IN (?, ?, ?)"]);
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let filter = StringFilter::in_list(vec![]);
        let (conditions, values) = filter.sql_conditions("customers.id");

        assert_eq!(conditions, vec!["1 = 0"]);
        assert!(values.is_empty());
    }

    #[test]
    fn contains_escapes_like_wildcards() {
        let filter = StringFilter::contains("50%_off");
        let (_, values) = filter.sql_conditions("products.name");

        assert_eq!(values, vec![SqlValue::String("%50\\%\\_off%".to_string())]);
    }

    #[test]
    fn prefix_and_cutoff_helpers_render_expected_operators() {
        let (conditions, values) = StringFilter::starts_with("555-").sql_conditions("customers.phone");
        assert_eq!(conditions, vec!["customers.phone LIKE ? ESCAPE '\\'"]);
        assert_eq!(values, vec![SqlValue::String("555-%".to_string())]);

        let (conditions, _) =
            DateTimeFilter::before("2026-01-01T00:00:00+00:00").sql_conditions("orders.created_at");
        assert_eq!(conditions, vec!["orders.created_at < ?"]);
    }

    #[test]
    fn empty_filter_reports_empty() {
        assert!(StringFilter::default().is_empty());
        assert!(IntFilter::default().is_empty());
        assert!(FloatFilter::default().is_empty());
        assert!(DateTimeFilter::default().is_empty());
        assert!(!IntFilter::equals(1).is_empty());
    }
}
