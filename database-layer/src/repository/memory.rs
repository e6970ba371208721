// Shared row storage for the in-memory repositories
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{DatabaseError, DatabaseResult};

pub(crate) trait Keyed {
    fn key(&self) -> Uuid;
}

/// Insertion-ordered rows behind one lock, so uniqueness checks and writes
/// happen atomically like a unique index would make them.
#[derive(Debug)]
pub(crate) struct MemoryTable<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Keyed + Clone> MemoryTable<T> {
    pub fn get(&self, id: Uuid) -> Option<T> {
        self.rows.read().iter().find(|row| row.key() == id).cloned()
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.read().iter().find(|row| predicate(row)).cloned()
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.read().iter().filter(|row| predicate(row)).cloned().collect()
    }

    /// Inserts `row` unless `violation` names a constraint the other rows break.
    pub fn insert(&self, row: T, violation: impl Fn(&T, &T) -> Option<&'static str>) -> DatabaseResult<()> {
        let mut rows = self.rows.write();
        if rows.iter().any(|existing| existing.key() == row.key()) {
            return Err(DatabaseError::QueryFailed(format!("duplicate primary key {}", row.key())));
        }
        check_unique(&rows, &row, violation)?;
        rows.push(row);
        Ok(())
    }

    /// Replaces the row with the same key, applying the same uniqueness rule.
    pub fn replace(&self, row: T, violation: impl Fn(&T, &T) -> Option<&'static str>) -> DatabaseResult<()> {
        let mut rows = self.rows.write();
        check_unique(&rows, &row, violation)?;
        let slot = rows
            .iter_mut()
            .find(|existing| existing.key() == row.key())
            .ok_or_else(|| DatabaseError::QueryFailed(format!("row {} does not exist", row.key())))?;
        *slot = row;
        Ok(())
    }

    pub fn modify(&self, id: Uuid, change: impl FnOnce(&mut T)) -> bool {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|row| row.key() == id) {
            Some(row) => {
                change(row);
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|row| row.key() != id);
        rows.len() != before
    }

    pub fn retain(&self, keep: impl Fn(&T) -> bool) {
        self.rows.write().retain(|row| keep(row));
    }

    pub fn extend(&self, new_rows: impl IntoIterator<Item = T>) {
        self.rows.write().extend(new_rows);
    }
}

fn check_unique<T: Keyed>(
    rows: &[T],
    candidate: &T,
    violation: impl Fn(&T, &T) -> Option<&'static str>,
) -> DatabaseResult<()> {
    for existing in rows.iter().filter(|r| r.key() != candidate.key()) {
        if let Some(constraint) = violation(existing, candidate) {
            return Err(DatabaseError::UniqueViolation {
                constraint: constraint.to_string(),
            });
        }
    }
    Ok(())
}

/// No uniqueness rule beyond the primary key
pub(crate) fn no_constraints<T>(_: &T, _: &T) -> Option<&'static str> {
    None
}
