//! Table mappings for the domain entities.
//!
//! A [`TableMapping`] names the table, the key column and the data columns
//! of an entity and converts between rows and entity values. Every table
//! also carries the five audit columns in [`AUDIT_COLUMNS`].

use accredigo_domain::{
    Accreditation, AuditInfo, Entity, ExploreUserAccess, Facility, FacilityRole,
    FacilityRolePermission, FacilityType, FacilityUser, Feature, GapAnalysisSession, Payment,
    Permission, Subscription, SubscriptionPlan, SubscriptionPlanFeature, SystemRole,
    SystemRolePermission, User, UserActionLog,
};
use sqlx::sqlite::SqliteRow;

use crate::values::{FromSqlColumn, SqlValue, ToSqlValue};
use crate::Result;

/// Audit columns present on every table, in storage order.
pub const AUDIT_COLUMNS: [&str; 5] = [
    "created_at",
    "created_by",
    "updated_at",
    "updated_by",
    "is_deleted",
];

/// Soft-delete flag column.
pub const DELETED_COLUMN: &str = "is_deleted";

/// Default ordering column.
pub const CREATED_AT_COLUMN: &str = "created_at";

/// Row mapping for an entity type.
pub trait TableMapping: Entity {
    /// Table name.
    const TABLE: &'static str;

    /// Key column.
    const KEY_COLUMN: &'static str;

    /// Data columns, excluding the key and audit columns.
    const COLUMNS: &'static [&'static str];

    /// Bindable form of a key.
    fn key_value(key: &Self::Key) -> SqlValue;

    /// Data column values, in [`TableMapping::COLUMNS`] order.
    fn column_values(&self) -> Vec<SqlValue>;

    /// Rebuild an entity from a full row.
    fn from_row(row: &SqliteRow) -> Result<Self>;

    /// Whether `column` exists on the table.
    fn has_column(column: &str) -> bool {
        column == Self::KEY_COLUMN
            || Self::COLUMNS.contains(&column)
            || AUDIT_COLUMNS.contains(&column)
    }

    /// Every column in storage order: key, data, audit.
    fn all_columns() -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(1 + Self::COLUMNS.len() + AUDIT_COLUMNS.len());
        columns.push(Self::KEY_COLUMN);
        columns.extend_from_slice(Self::COLUMNS);
        columns.extend_from_slice(&AUDIT_COLUMNS);
        columns
    }
}

/// One-to-many relation from `Self` to `R`, declared at compile time.
pub trait Related<R: TableMapping>: TableMapping {
    /// Column on `R` holding the key of `Self`.
    const FOREIGN_KEY: &'static str;
}

/// Audit values in [`AUDIT_COLUMNS`] order.
pub(crate) fn audit_values(audit: &AuditInfo) -> Vec<SqlValue> {
    vec![
        audit.created_at.to_sql_value(),
        audit.created_by.to_sql_value(),
        audit.updated_at.to_sql_value(),
        audit.updated_by.to_sql_value(),
        audit.is_deleted.to_sql_value(),
    ]
}

pub(crate) fn read_audit(row: &SqliteRow) -> Result<AuditInfo> {
    Ok(AuditInfo {
        created_at: FromSqlColumn::from_column(row, "created_at")?,
        created_by: FromSqlColumn::from_column(row, "created_by")?,
        updated_at: FromSqlColumn::from_column(row, "updated_at")?,
        updated_by: FromSqlColumn::from_column(row, "updated_by")?,
        is_deleted: FromSqlColumn::from_column(row, "is_deleted")?,
    })
}

/// Field names double as column names.
macro_rules! table_mapping {
    ($entity:ident => $table:literal, key: $key:ident, columns: [$($column:ident),* $(,)?]) => {
        impl TableMapping for $entity {
            const TABLE: &'static str = $table;
            const KEY_COLUMN: &'static str = stringify!($key);
            const COLUMNS: &'static [&'static str] = &[$(stringify!($column)),*];

            fn key_value(key: &Self::Key) -> SqlValue {
                key.to_sql_value()
            }

            fn column_values(&self) -> Vec<SqlValue> {
                vec![$(self.$column.to_sql_value()),*]
            }

            fn from_row(row: &SqliteRow) -> Result<Self> {
                Ok(Self {
                    $key: FromSqlColumn::from_column(row, stringify!($key))?,
                    $($column: FromSqlColumn::from_column(row, stringify!($column))?,)*
                    audit: read_audit(row)?,
                })
            }
        }
    };
}

macro_rules! related {
    ($parent:ident => $child:ident via $fk:ident) => {
        impl Related<$child> for $parent {
            const FOREIGN_KEY: &'static str = stringify!($fk);
        }
    };
}

table_mapping!(SystemRole => "system_roles", key: id, columns: [name]);
table_mapping!(Permission => "permissions", key: id, columns: [code, description]);
table_mapping!(SystemRolePermission => "system_role_permissions", key: id,
    columns: [system_role_id, permission_id]);
table_mapping!(User => "users", key: id,
    columns: [name, arabic_name, email, password, system_role_id, phone_number]);
table_mapping!(ExploreUserAccess => "explore_user_access", key: user_id,
    columns: [trial_start, trial_end]);
table_mapping!(UserActionLog => "user_action_logs", key: id,
    columns: [user_id, action, context, occurred_at]);

table_mapping!(FacilityType => "facility_types", key: id, columns: [type_name, arabic_type_name]);
table_mapping!(FacilityRole => "facility_roles", key: id, columns: [name]);
table_mapping!(FacilityRolePermission => "facility_role_permissions", key: id,
    columns: [facility_role_id, permission_id]);
table_mapping!(Facility => "facilities", key: user_id,
    columns: [name, arabic_name, location, arabic_location, company_size, email, phone, tel,
        accreditation_id, facility_type_id]);
table_mapping!(FacilityUser => "facility_users", key: user_id,
    columns: [facility_id, facility_role_id]);

table_mapping!(Accreditation => "accreditations", key: id,
    columns: [name, arabic_name, description, arabic_description]);
table_mapping!(GapAnalysisSession => "gap_analysis_sessions", key: id,
    columns: [facility_id, accreditation_id, started_at, ended_at]);

table_mapping!(SubscriptionPlan => "subscription_plans", key: id, columns: [plan_type, pricing]);
table_mapping!(Feature => "features", key: id, columns: [text, arabic_text]);
table_mapping!(SubscriptionPlanFeature => "subscription_plan_features", key: id,
    columns: [subscription_plan_id, feature_id]);
table_mapping!(Subscription => "subscriptions", key: id,
    columns: [facility_id, plan_id, start_date, expiry_date, status, amount]);
table_mapping!(Payment => "payments", key: id,
    columns: [facility_id, subscription_id, amount, method, status, paid_at, currency]);

related!(SystemRole => User via system_role_id);
related!(User => UserActionLog via user_id);
related!(FacilityType => Facility via facility_type_id);
related!(Facility => FacilityUser via facility_id);
related!(Facility => Subscription via facility_id);
related!(Facility => GapAnalysisSession via facility_id);
related!(Accreditation => Facility via accreditation_id);
related!(Accreditation => GapAnalysisSession via accreditation_id);
related!(SubscriptionPlan => SubscriptionPlanFeature via subscription_plan_id);
related!(Subscription => Payment via subscription_id);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_columns() {
        assert_eq!(User::TABLE, "users");
        assert_eq!(User::KEY_COLUMN, User::KEY_FIELD);
        assert!(User::has_column("email"));
        assert!(User::has_column("is_deleted"));
        assert!(!User::has_column("email; DROP TABLE users"));
        assert_eq!(User::all_columns().len(), 1 + 6 + 5);
    }

    #[test]
    fn test_column_values_follow_declared_order() {
        let plan = SubscriptionPlan::new("p1", "Premium", 900);
        assert_eq!(
            plan.column_values(),
            vec![SqlValue::Text("Premium".to_string()), SqlValue::Integer(900)]
        );
        assert_eq!(SubscriptionPlan::key_value(&plan.id), SqlValue::Text("p1".to_string()));
    }

    #[test]
    fn test_relations() {
        assert_eq!(<User as Related<UserActionLog>>::FOREIGN_KEY, "user_id");
        assert_eq!(<Facility as Related<FacilityUser>>::FOREIGN_KEY, "facility_id");
    }
}
