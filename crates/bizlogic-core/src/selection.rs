//! Explicit "current selection" context handed to presentation code.

use serde::Serialize;

use crate::collection::Collection;
use crate::entity::{Entity, InterfaceRecord, ProgramRecord, VersionRecord};
use crate::id::{InterfaceId, ProgramId, VersionId};

/// Id and title of one selected record (what a breadcrumb needs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionEntry<Id> {
    pub id: Id,
    pub title: String,
}

/// The resolved selection at each hierarchy level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub interface: Option<SelectionEntry<InterfaceId>>,
    pub program: Option<SelectionEntry<ProgramId>>,
    pub version: Option<SelectionEntry<VersionId>>,
}

fn entry<E: Entity>(collection: Option<&Collection<E>>) -> Option<SelectionEntry<E::Id>> {
    collection
        .and_then(Collection::get_current)
        .map(|record| SelectionEntry {
            id: record.id(),
            title: record.title().to_string(),
        })
}

impl Selection {
    /// Builds the context from the current pointers of each collection.
    pub fn from_collections(
        interfaces: Option<&Collection<InterfaceRecord>>,
        programs: Option<&Collection<ProgramRecord>>,
        versions: Option<&Collection<VersionRecord>>,
    ) -> Self {
        Selection {
            interface: entry(interfaces),
            program: entry(programs),
            version: entry(versions),
        }
    }

    pub fn interface_id(&self) -> Option<InterfaceId> {
        self.interface.as_ref().map(|e| e.id)
    }

    pub fn program_id(&self) -> Option<ProgramId> {
        self.program.as_ref().map(|e| e.id)
    }

    pub fn version_id(&self) -> Option<VersionId> {
        self.version.as_ref().map(|e| e.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_reads_current_pointers() {
        let mut interfaces = Collection::new("/i");
        interfaces.add_new(InterfaceRecord::new(InterfaceId(5), "Orders", "/i"));
        interfaces.set_current(InterfaceId(5)).unwrap();

        let programs: Collection<ProgramRecord> = Collection::new("/p");

        let selection = Selection::from_collections(Some(&interfaces), Some(&programs), None);
        assert_eq!(selection.interface_id(), Some(InterfaceId(5)));
        assert_eq!(selection.interface.as_ref().unwrap().title, "Orders");
        assert!(selection.program_id().is_none());
        assert!(selection.version_id().is_none());
    }
}
