//! In-memory collection of every migration known to one engine.
//!
//! The registry is built once from the complete descriptor list, validated,
//! and kept sorted ascending by id. Registration order never matters.

use crate::error::{MigrateError, MigrateResult};
use crate::migration::Migration;
use regex::Regex;
use std::sync::OnceLock;

static ID_PATTERN: OnceLock<Regex> = OnceLock::new();

fn id_pattern() -> &'static Regex {
    ID_PATTERN.get_or_init(|| Regex::new(r"^([0-9]+)(_[a-z0-9_]+)?$").expect("valid regex"))
}

/// Sorted, validated set of migrations.
pub struct Registry {
    migrations: Vec<Box<dyn Migration>>,
}

impl Registry {
    /// Build a registry from the full descriptor list.
    ///
    /// Fails when an id does not follow the `<digits>[_name]` scheme, when
    /// numeric prefixes differ in width (string order would then disagree
    /// with authoring order), or when two migrations share an id.
    pub fn new(mut migrations: Vec<Box<dyn Migration>>) -> MigrateResult<Self> {
        let mut prefix_width: Option<(usize, String)> = None;
        for migration in &migrations {
            let id = migration.id();
            let caps = id_pattern()
                .captures(id)
                .ok_or_else(|| MigrateError::InvalidIdentifier {
                    id: id.to_string(),
                    reason: "expected a zero-padded number optionally followed by \
                             '_' and lowercase words, e.g. 000001_create_departments"
                        .to_string(),
                })?;
            let width = caps[1].len();
            match &prefix_width {
                None => prefix_width = Some((width, id.to_string())),
                Some((expected, first)) if *expected != width => {
                    return Err(MigrateError::InvalidIdentifier {
                        id: id.to_string(),
                        reason: format!(
                            "numeric prefix has {width} digits but '{first}' has {expected}"
                        ),
                    });
                }
                Some(_) => {}
            }
        }

        migrations.sort_by(|a, b| a.id().cmp(b.id()));
        if let Some(pair) = migrations.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(MigrateError::DuplicateIdentifier {
                id: pair[0].id().to_string(),
            });
        }

        Ok(Self { migrations })
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Migrations in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Migration> + '_ {
        self.migrations.iter().map(|m| m.as_ref())
    }

    pub fn get(&self, id: &str) -> Option<&dyn Migration> {
        self.migrations
            .binary_search_by(|m| m.id().cmp(id))
            .ok()
            .map(|idx| self.migrations[idx].as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.migrations.iter().map(|m| m.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("ids", &self.ids())
            .finish()
    }
}

/// Chained registration, validated all at once by [`RegistryBuilder::build`].
#[derive(Default)]
pub struct RegistryBuilder {
    migrations: Vec<Box<dyn Migration>>,
}

impl RegistryBuilder {
    pub fn register<M: Migration + 'static>(mut self, migration: M) -> Self {
        self.migrations.push(Box::new(migration));
        self
    }

    pub fn register_all<I>(mut self, migrations: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Migration>>,
    {
        self.migrations.extend(migrations);
        self
    }

    pub fn build(self) -> MigrateResult<Registry> {
        Registry::new(self.migrations)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
