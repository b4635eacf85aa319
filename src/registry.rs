//! The View/Procedure Registry.
//!
//! Caches fully resolved join definitions (and stored-procedure descriptors)
//! by output type, so repeated execution skips graph construction. The
//! registry is an owned handle rather than a global: clone it to share one
//! cache between callers, create another to get an independent one.

use core::any::TypeId;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::HashMap;
use joinery_core::{
    Entity, FromRow, JoinDefinition, JoineryError, Result, Statement, TableRef, joinery_trace_view,
};
use joinery_types::Dialect;

use crate::config::Config;
use crate::connection::Connection;
use crate::procedure::ProcedureDescriptor;

/// What the registry holds for one output type.
#[derive(Debug, Clone)]
pub enum StoredView {
    Join(Arc<JoinDefinition>),
    Procedure(Arc<ProcedureDescriptor>),
}

impl StoredView {
    pub fn render(&self, dialect: Dialect) -> Result<Statement> {
        match self {
            StoredView::Join(definition) => definition.render(dialect),
            StoredView::Procedure(procedure) => procedure.render(dialect),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    dialect: Dialect,
    views: Arc<RwLock<HashMap<TypeId, StoredView>>>,
}

impl ViewRegistry {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            views: Arc::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.dialect)
    }

    /// Dialect every stored view is rendered in.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    // A panic while holding the lock cannot leave the map half-updated: every
    // write is a single insert or remove.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeId, StoredView>> {
        self.views.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, StoredView>> {
        self.views.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, dto: TableRef, view: StoredView) -> Option<StoredView> {
        let previous = self.write().insert(dto.id(), view);
        if previous.is_some() {
            joinery_trace_view!("replace", dto.name());
        } else {
            joinery_trace_view!("store", dto.name());
        }
        previous
    }

    /// Stores `definition` under its output type, replacing whatever was
    /// stored for that type before. Returns the replaced entry.
    ///
    /// Readers see either the old entry or the new one, never a gap.
    pub fn store(&self, definition: JoinDefinition) -> Option<StoredView> {
        let dto = definition.dto();
        self.insert(dto, StoredView::Join(Arc::new(definition)))
    }

    /// Stores a procedure whose result rows map into `D`, replacing any
    /// earlier entry for `D`.
    pub fn store_procedure<D: Entity>(&self, procedure: ProcedureDescriptor) -> Option<StoredView> {
        self.insert(TableRef::of::<D>(), StoredView::Procedure(Arc::new(procedure)))
    }

    pub fn remove<D: Entity>(&self) -> Option<StoredView> {
        self.write().remove(&TypeId::of::<D>())
    }

    pub fn contains<D: Entity>(&self) -> bool {
        self.read().contains_key(&TypeId::of::<D>())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// The entry stored for `D`. The clone shares the stored definition.
    pub fn definition<D: Entity>(&self) -> Option<StoredView> {
        self.read().get(&TypeId::of::<D>()).cloned()
    }

    fn lookup<D: Entity>(&self) -> Result<StoredView> {
        self.definition::<D>().ok_or_else(|| {
            joinery_trace_view!("miss", D::TABLE);
            JoineryError::ViewNotFound { dto: D::TABLE }
        })
    }

    /// Renders the entry stored for `D` in the registry's dialect.
    pub fn render<D: Entity>(&self) -> Result<Statement> {
        self.lookup::<D>()?.render(self.dialect)
    }

    fn render_for<D: Entity, C: Connection>(&self, conn: &C) -> Result<Statement> {
        let view = self.lookup::<D>()?;
        if conn.dialect() != self.dialect {
            return Err(JoineryError::Execution(format!(
                "view `{}` renders for {} but the connection speaks {}",
                D::TABLE,
                self.dialect,
                conn.dialect()
            )));
        }
        view.render(self.dialect)
    }

    /// Renders, executes and maps the entry stored for `D`. The connection
    /// must speak the registry's dialect.
    ///
    /// The lock is released before the connection is awaited, so a slow
    /// query never blocks `store`.
    pub async fn execute<D, C>(&self, conn: &C) -> Result<Vec<D>>
    where
        D: Entity + FromRow,
        C: Connection,
    {
        let statement = self.render_for::<D, C>(conn)?;
        conn.fetch(&statement, None).await
    }

    /// Like [`execute`](Self::execute), inside the caller's transaction.
    pub async fn execute_in<D, C>(&self, conn: &C, tx: &mut C::Transaction) -> Result<Vec<D>>
    where
        D: Entity + FromRow,
        C: Connection,
    {
        let statement = self.render_for::<D, C>(conn)?;
        conn.fetch(&statement, Some(tx)).await
    }
}
