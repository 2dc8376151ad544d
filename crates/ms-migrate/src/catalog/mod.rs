//! Embedded schema migrations for the scheduling database.
//!
//! Each migration is a pair of numbered `.sql` files embedded via
//! `include_str!`. Tables use sequences for ids since DuckDB has no `SERIAL`.

use crate::migration::{Migration, SqlMigration};

pub const CREATE_DEPARTMENTS: SqlMigration = SqlMigration::new(
    "000001_create_departments",
    include_str!("000001_create_departments.up.sql"),
    include_str!("000001_create_departments.down.sql"),
);

pub const CREATE_DOCTORS: SqlMigration = SqlMigration::new(
    "000002_create_doctors",
    include_str!("000002_create_doctors.up.sql"),
    include_str!("000002_create_doctors.down.sql"),
);

pub const CREATE_SCHEDULES: SqlMigration = SqlMigration::new(
    "000003_create_schedules",
    include_str!("000003_create_schedules.up.sql"),
    include_str!("000003_create_schedules.down.sql"),
);

pub const CREATE_APPOINTMENTS: SqlMigration = SqlMigration::new(
    "000004_create_appointments",
    include_str!("000004_create_appointments.up.sql"),
    include_str!("000004_create_appointments.down.sql"),
);

pub const CREATE_USERS: SqlMigration = SqlMigration::new(
    "000005_create_users",
    include_str!("000005_create_users.up.sql"),
    include_str!("000005_create_users.down.sql"),
);

/// All built-in migrations.
pub fn migrations() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(CREATE_DEPARTMENTS),
        Box::new(CREATE_DOCTORS),
        Box::new(CREATE_SCHEDULES),
        Box::new(CREATE_APPOINTMENTS),
        Box::new(CREATE_USERS),
    ]
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
