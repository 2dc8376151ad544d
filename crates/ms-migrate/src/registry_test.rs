use super::*;
use crate::migration::SqlMigration;

fn sql(id: &'static str) -> Box<dyn Migration> {
    Box::new(SqlMigration::new(id, "SELECT 1", "SELECT 1"))
}

#[test]
fn sorts_by_id_regardless_of_registration_order() {
    let registry = Registry::new(vec![sql("0003"), sql("0001"), sql("0002")]).unwrap();
    assert_eq!(registry.ids(), vec!["0001", "0002", "0003"]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn builder_registers_in_any_order() {
    let registry = Registry::builder()
        .register(SqlMigration::new("000002_b", "", ""))
        .register(SqlMigration::new("000001_a", "", ""))
        .register_all(vec![sql("000003_c")])
        .build()
        .unwrap();
    assert_eq!(registry.ids(), vec!["000001_a", "000002_b", "000003_c"]);
}

#[test]
fn empty_registry_is_valid() {
    let registry = Registry::new(Vec::new()).unwrap();
    assert!(registry.is_empty());
    assert!(registry.get("0001").is_none());
}

#[test]
fn get_finds_registered_ids_only() {
    let registry = Registry::new(vec![sql("0002"), sql("0001")]).unwrap();
    assert_eq!(registry.get("0002").map(|m| m.id()), Some("0002"));
    assert!(registry.contains("0001"));
    assert!(!registry.contains("0003"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = Registry::new(vec![sql("0001"), sql("0002"), sql("0001")]).unwrap_err();
    match err {
        MigrateError::DuplicateIdentifier { id } => assert_eq!(id, "0001"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_numeric_prefix_is_rejected() {
    for bad in ["create_users", "v1_users", "0001-users", "0001_Users", ""] {
        let err = Registry::new(vec![sql(bad)]).unwrap_err();
        assert!(
            matches!(err, MigrateError::InvalidIdentifier { .. }),
            "{bad:?} should be rejected, got {err}"
        );
    }
}

#[test]
fn mixed_prefix_widths_are_rejected() {
    // "10" < "9" as strings, so mixed widths would break rollback order.
    let err = Registry::new(vec![sql("9_nine"), sql("10_ten")]).unwrap_err();
    match err {
        MigrateError::InvalidIdentifier { id, reason } => {
            assert_eq!(id, "10_ten");
            assert!(reason.contains("9_nine"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn timestamp_ids_are_accepted() {
    let registry = Registry::new(vec![
        sql("20240301120000_add_index"),
        sql("20231115083000_create_table"),
    ])
    .unwrap();
    assert_eq!(
        registry.ids(),
        vec!["20231115083000_create_table", "20240301120000_add_index"]
    );
}

#[test]
fn description_defaults_to_id_suffix() {
    let registry = Registry::new(vec![sql("000001_create_departments"), sql("000002")]).unwrap();
    assert_eq!(
        registry.get("000001_create_departments").unwrap().description(),
        "create_departments"
    );
    assert_eq!(registry.get("000002").unwrap().description(), "");
}
