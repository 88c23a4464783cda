//! Cascading fetch cache for the Interface → Program → Version hierarchy.
//!
//! Each level is loaded lazily, scoped by its parent's id, and memoized
//! until the parent selection changes. Requests for a dependent level
//! first make sure every ancestor level is loaded, in root-to-leaf order.
//!
//! Concurrency model:
//! - one async gate per level, held for the whole check-fetch-commit of
//!   that level, so a second caller waits for the in-flight fetch and then
//!   finds the memoized result instead of issuing a duplicate request;
//! - collections live behind one `RwLock` that is never held across a
//!   request, and a level is committed only after its fetch succeeded, so
//!   a failure leaves the cache exactly as it was;
//! - gates are taken in one fixed order (interfaces, programs, versions,
//!   detail) and a cascade keeps the gates above the level it resolves,
//!   so no other caller can re-scope an ancestor while a dependent level
//!   is in flight. Concurrent cascades under different parents run one
//!   after the other instead of undoing each other.

use tokio::sync::{Mutex, MutexGuard, RwLock};

use bizlogic_core::{
    Collection, Entity, InterfaceId, InterfaceRecord, ProgramId, ProgramRecord, Selection,
    VersionId, VersionRecord,
};

use crate::config::Endpoints;
use crate::descriptors::DescriptorClient;
use crate::error::ClientError;
use crate::transport::Transport;
use crate::wire::{
    decode_one, decode_rows, CreateVersionBody, InterfaceRow, ProgramRow, SaveVersionBody,
    VersionDetail, VersionRow,
};

/// Query parameter scoping the programs list by interface.
pub const PROGRAM_SCOPE_PARAM: &str = "program_interface";
/// Query parameter scoping the versions list by program.
pub const VERSION_SCOPE_PARAM: &str = "program";

/// A collection together with the parent id it was fetched under.
#[derive(Debug, Clone)]
struct Scoped<S, E> {
    scope: S,
    collection: Collection<E>,
}

#[derive(Debug, Default)]
struct CacheState {
    interfaces: Option<Collection<InterfaceRecord>>,
    programs: Option<Scoped<InterfaceId, ProgramRecord>>,
    versions: Option<Scoped<ProgramId, VersionRecord>>,
}

/// Memoizing, self-healing loader for the three hierarchy levels.
pub struct FetchCache<T> {
    transport: T,
    endpoints: Endpoints,
    state: RwLock<CacheState>,
    interfaces_gate: Mutex<()>,
    programs_gate: Mutex<()>,
    versions_gate: Mutex<()>,
    detail_gate: Mutex<()>,
}

impl<T: Transport> FetchCache<T> {
    pub fn new(transport: T, endpoints: Endpoints) -> Self {
        FetchCache {
            transport,
            endpoints,
            state: RwLock::new(CacheState::default()),
            interfaces_gate: Mutex::new(()),
            programs_gate: Mutex::new(()),
            versions_gate: Mutex::new(()),
            detail_gate: Mutex::new(()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Client for the toolbox descriptor endpoints, sharing this transport.
    pub fn descriptors(&self) -> DescriptorClient<'_, T> {
        DescriptorClient::new(&self.transport, &self.endpoints)
    }

    // -------------------------------------------------------------------
    // Entry points
    // -------------------------------------------------------------------

    /// Loads the interfaces collection (once).
    pub async fn fetch_interfaces(&self) -> Result<(), ClientError> {
        self.ensure_interfaces().await
    }

    /// Loads the programs of `interface`, loading interfaces first if needed.
    ///
    /// Selecting a different interface than the cached programs were
    /// scoped to replaces the programs and discards the versions.
    pub async fn fetch_programs(&self, interface: InterfaceId) -> Result<(), ClientError> {
        self.hold_programs(interface).await.map(drop)
    }

    /// Loads the versions of `program`, loading its ancestors first if needed.
    pub async fn fetch_versions(
        &self,
        interface: InterfaceId,
        program: ProgramId,
    ) -> Result<(), ClientError> {
        self.hold_versions(interface, program).await.map(drop)
    }

    /// Resolves the whole cascade down to `version`, loads the version's
    /// program text and environment (once per record) and marks it current.
    pub async fn fetch_version(
        &self,
        interface: InterfaceId,
        program: ProgramId,
        version: VersionId,
    ) -> Result<VersionRecord, ClientError> {
        loop {
            let _held = self.hold_versions(interface, program).await?;
            let _detail = self.detail_gate.lock().await;

            {
                let mut guard = self.state.write().await;
                let Some(versions) = guard.versions.as_mut().filter(|v| v.scope == program) else {
                    continue;
                };
                if versions.collection.require(version)?.is_loaded() {
                    return Ok(versions.collection.set_current(version)?.clone());
                }
            }

            let url = self.endpoints.version(version);
            let detail: VersionDetail = decode_one("version", self.transport.get(&url).await?)?;

            let mut guard = self.state.write().await;
            let Some(versions) = guard.versions.as_mut().filter(|v| v.scope == program) else {
                continue;
            };
            let Some(record) = versions.collection.get_by_id_mut(version) else {
                continue;
            };
            detail.apply_to(record);
            tracing::info!("loaded detail of version {}", version);
            return Ok(versions.collection.set_current(version)?.clone());
        }
    }

    // -------------------------------------------------------------------
    // Level resolution
    //
    // Gates are always taken in the order interfaces, programs, versions,
    // detail. The interfaces gate is released once the root level is
    // loaded; every lower gate stays held until the level it guards is
    // committed, so a level's parent scope cannot change underneath it.
    // -------------------------------------------------------------------

    async fn ensure_interfaces(&self) -> Result<(), ClientError> {
        let _gate = self.interfaces_gate.lock().await;
        if self.state.read().await.interfaces.is_some() {
            return Ok(());
        }

        let url = self.endpoints.interfaces();
        let rows: Vec<InterfaceRow> = decode_rows("interface", self.transport.get(&url).await?)?;
        let mut collection = Collection::new(url.clone());
        for row in rows {
            collection.add_new(row.into_record(&url));
        }

        tracing::info!("cached {} interfaces", collection.len());
        self.state.write().await.interfaces = Some(collection);
        Ok(())
    }

    /// Resolves the programs of `interface` and returns the held programs gate.
    async fn hold_programs(
        &self,
        interface: InterfaceId,
    ) -> Result<MutexGuard<'_, ()>, ClientError> {
        loop {
            self.ensure_interfaces().await?;
            let gate = self.programs_gate.lock().await;
            if self.resolve_programs(interface).await? {
                return Ok(gate);
            }
            tracing::debug!("interfaces invalidated while resolving programs; retrying");
        }
    }

    /// Resolves the versions of `program` and returns the held programs
    /// and versions gates.
    async fn hold_versions(
        &self,
        interface: InterfaceId,
        program: ProgramId,
    ) -> Result<(MutexGuard<'_, ()>, MutexGuard<'_, ()>), ClientError> {
        loop {
            let programs = self.hold_programs(interface).await?;
            let versions = self.versions_gate.lock().await;
            if self.resolve_versions(interface, program).await? {
                return Ok((programs, versions));
            }
        }
    }

    /// Requires the programs gate. Returns `false` when the interfaces
    /// level is missing.
    async fn resolve_programs(&self, interface: InterfaceId) -> Result<bool, ClientError> {
        {
            let mut guard = self.state.write().await;
            let state = &mut *guard;
            let Some(interfaces) = state.interfaces.as_mut() else {
                return Ok(false);
            };
            interfaces.require(interface)?;
            if state.programs.as_ref().is_some_and(|p| p.scope == interface) {
                interfaces.set_current(interface)?;
                return Ok(true);
            }
        }

        let url = self.endpoints.programs();
        let params = [(PROGRAM_SCOPE_PARAM, interface.to_string())];
        let value = self.transport.get_with_search_params(&url, &params).await?;
        let rows: Vec<ProgramRow> = decode_rows("program", value)?;
        let mut collection = Collection::new(url.clone());
        for row in rows {
            collection.add_new(row.into_record(&url));
        }

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let Some(interfaces) = state.interfaces.as_mut() else {
            return Ok(false);
        };
        interfaces.set_current(interface)?;
        if let Some(previous) = &state.programs {
            tracing::info!(
                "interface {} selected, discarding programs of interface {}",
                interface,
                previous.scope
            );
        }
        state.versions = None;
        tracing::info!("cached {} programs of interface {}", collection.len(), interface);
        state.programs = Some(Scoped {
            scope: interface,
            collection,
        });
        Ok(true)
    }

    /// Requires the programs and versions gates. Returns `false` when the
    /// programs are no longer scoped to `interface`.
    async fn resolve_versions(
        &self,
        interface: InterfaceId,
        program: ProgramId,
    ) -> Result<bool, ClientError> {
        {
            let mut guard = self.state.write().await;
            let state = &mut *guard;
            let Some(programs) = state.programs.as_mut().filter(|p| p.scope == interface) else {
                return Ok(false);
            };
            programs.collection.require(program)?;
            if state.versions.as_ref().is_some_and(|v| v.scope == program) {
                programs.collection.set_current(program)?;
                return Ok(true);
            }
        }

        let url = self.endpoints.versions();
        let params = [(VERSION_SCOPE_PARAM, program.to_string())];
        let value = self.transport.get_with_search_params(&url, &params).await?;
        let rows: Vec<VersionRow> = decode_rows("version", value)?;
        let mut collection = Collection::new(url.clone());
        for row in rows {
            collection.add_new(row.into_record(&url));
        }

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let Some(programs) = state.programs.as_mut().filter(|p| p.scope == interface) else {
            return Ok(false);
        };
        programs.collection.set_current(program)?;
        if let Some(previous) = &state.versions {
            tracing::info!(
                "program {} selected, discarding versions of program {}",
                program,
                previous.scope
            );
        }
        tracing::info!("cached {} versions of program {}", collection.len(), program);
        state.versions = Some(Scoped {
            scope: program,
            collection,
        });
        Ok(true)
    }

    // -------------------------------------------------------------------
    // Save
    // -------------------------------------------------------------------

    /// Saves `record` with `program_text` over the existing version.
    ///
    /// The cached record is updated only after the server accepted the write.
    pub async fn save_version(
        &self,
        record: &VersionRecord,
        program_text: &str,
    ) -> Result<VersionRecord, ClientError> {
        let body = SaveVersionBody {
            id: record.id(),
            title: record.title(),
            description: record.description(),
            xml: program_text,
        };
        let body = serde_json::to_value(&body).map_err(|err| ClientError::Decode {
            what: "version",
            reason: err.to_string(),
        })?;
        self.transport
            .put(&self.endpoints.version(record.id()), &body)
            .await?;

        let mut saved = record.clone();
        saved.set_program_text(program_text);

        let mut guard = self.state.write().await;
        if let Some(cached) = guard
            .versions
            .as_mut()
            .and_then(|v| v.collection.get_by_id_mut(record.id()))
        {
            cached.set_title(record.title());
            cached.set_description(record.description());
            cached.set_program_text(program_text);
        }
        tracing::info!("saved version {}", record.id());
        Ok(saved)
    }

    /// Creates a new version of `program` holding `program_text`.
    ///
    /// The created record is appended to the versions collection when that
    /// collection is scoped to `program`.
    pub async fn save_version_as(
        &self,
        program: ProgramId,
        title: &str,
        description: &str,
        program_text: &str,
    ) -> Result<VersionRecord, ClientError> {
        let body = CreateVersionBody {
            program,
            title,
            description,
            xml: program_text,
        };
        let body = serde_json::to_value(&body).map_err(|err| ClientError::Decode {
            what: "version",
            reason: err.to_string(),
        })?;
        let url = self.endpoints.versions();
        let row: VersionRow = decode_one("version", self.transport.post(&url, &body).await?)?;

        // The environment only comes with the detail, so the record stays
        // unloaded and the next fetch_version requests it.
        let mut created = row.into_record(&url);
        created.set_program_text(program_text);

        let _versions = self.versions_gate.lock().await;
        let mut guard = self.state.write().await;
        if let Some(versions) = guard.versions.as_mut().filter(|v| v.scope == program) {
            versions.collection.add_new(created.clone());
        }
        tracing::info!("created version {} of program {}", created.id(), program);
        Ok(created)
    }

    // -------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------

    pub async fn interfaces(&self) -> Option<Collection<InterfaceRecord>> {
        self.state.read().await.interfaces.clone()
    }

    pub async fn programs(&self) -> Option<Collection<ProgramRecord>> {
        self.state
            .read()
            .await
            .programs
            .as_ref()
            .map(|p| p.collection.clone())
    }

    pub async fn versions(&self) -> Option<Collection<VersionRecord>> {
        self.state
            .read()
            .await
            .versions
            .as_ref()
            .map(|v| v.collection.clone())
    }

    /// Interface the cached programs were fetched under.
    pub async fn program_scope(&self) -> Option<InterfaceId> {
        self.state.read().await.programs.as_ref().map(|p| p.scope)
    }

    /// Program the cached versions were fetched under.
    pub async fn version_scope(&self) -> Option<ProgramId> {
        self.state.read().await.versions.as_ref().map(|v| v.scope)
    }

    pub async fn current_version(&self) -> Option<VersionRecord> {
        self.state
            .read()
            .await
            .versions
            .as_ref()
            .and_then(|v| v.collection.get_current().cloned())
    }

    /// The resolved selection context for presentation code.
    pub async fn selection(&self) -> Selection {
        let state = self.state.read().await;
        Selection::from_collections(
            state.interfaces.as_ref(),
            state.programs.as_ref().map(|p| &p.collection),
            state.versions.as_ref().map(|v| &v.collection),
        )
    }

    /// Drops every cached level; the next call refetches from the root.
    pub async fn invalidate_all(&self) {
        let _interfaces = self.interfaces_gate.lock().await;
        let _programs = self.programs_gate.lock().await;
        let _versions = self.versions_gate.lock().await;
        let _detail = self.detail_gate.lock().await;
        *self.state.write().await = CacheState::default();
        tracing::info!("fetch cache invalidated");
    }
}
