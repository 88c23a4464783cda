//! Ordered record containers with a single "current" selection.
//!
//! A [`Collection`] keeps records in fetch-response order. The current
//! selection is stored as an index into `items`, so it can never point at a
//! record that is not in the collection.

use serde::Serialize;

use crate::entity::Entity;
use crate::error::CoreError;

/// Ordered container of same-type records plus a single selection pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection<E> {
    items: Vec<E>,
    current: Option<usize>,
    base_url: String,
}

impl<E: Entity> Collection<E> {
    /// Creates an empty collection whose records live under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Collection {
            items: Vec::new(),
            current: None,
            base_url: base_url.into(),
        }
    }

    /// Appends a record, preserving arrival order.
    pub fn add_new(&mut self, record: E) {
        self.items.push(record);
    }

    /// Looks up a record by id. Linear scan; collections are small.
    pub fn get_by_id(&self, id: E::Id) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Like [`Collection::get_by_id`], but absence is an error.
    pub fn require(&self, id: E::Id) -> Result<&E, CoreError> {
        self.get_by_id(id).ok_or_else(|| not_found::<E>(id))
    }

    pub(crate) fn position(&self, id: E::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Mutable access to a record, used to attach lazily loaded detail.
    pub fn get_by_id_mut(&mut self, id: E::Id) -> Option<&mut E> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Marks the record with `id` as the current selection.
    pub fn set_current(&mut self, id: E::Id) -> Result<&E, CoreError> {
        let index = self.position(id).ok_or_else(|| not_found::<E>(id))?;
        self.current = Some(index);
        Ok(&self.items[index])
    }

    pub fn get_current(&self) -> Option<&E> {
        self.current.map(|index| &self.items[index])
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Collection root, used as the fetch target.
    pub fn get_url(&self) -> &str {
        &self.base_url
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.items.iter()
    }
}

fn not_found<E: Entity>(id: E::Id) -> CoreError {
    CoreError::NotFound {
        kind: E::KIND,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ProgramRecord;
    use crate::id::ProgramId;

    fn programs(ids: &[i64]) -> Collection<ProgramRecord> {
        let mut collection = Collection::new("/rest/program");
        for id in ids {
            collection.add_new(ProgramRecord::new(
                ProgramId(*id),
                format!("program {id}"),
                "/rest/program",
            ));
        }
        collection
    }

    #[test]
    fn add_new_preserves_arrival_order() {
        let collection = programs(&[3, 1, 2]);
        let ids: Vec<_> = collection.iter().map(|p| p.id().0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn get_by_id_finds_or_reports_absence() {
        let collection = programs(&[1, 2]);
        assert_eq!(collection.get_by_id(ProgramId(2)).unwrap().title(), "program 2");
        assert!(collection.get_by_id(ProgramId(9)).is_none());

        let err = collection.require(ProgramId(9)).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: "program", ref id } if id == "9"));
    }

    #[test]
    fn current_points_at_a_member() {
        let mut collection = programs(&[1, 2]);
        assert!(collection.get_current().is_none());

        collection.set_current(ProgramId(2)).unwrap();
        assert_eq!(collection.get_current().unwrap().id(), ProgramId(2));

        // A failed selection leaves the previous one in place.
        assert!(collection.set_current(ProgramId(7)).is_err());
        assert_eq!(collection.get_current().unwrap().id(), ProgramId(2));

        collection.clear_current();
        assert!(collection.get_current().is_none());
    }

    #[test]
    fn get_url_returns_base_url() {
        let collection = programs(&[]);
        assert_eq!(collection.get_url(), "/rest/program");
        assert!(collection.is_empty());
    }
}
