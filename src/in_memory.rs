//! Process-local unit of work.
//!
//! Committed state lives behind a shared lock. Every session reads from its
//! own copy, so it sees its own pending writes, and journals each write.
//! `save` replays the journal onto the committed tables under their write
//! lock; `rollback` drops the journal and refreshes the copy. Rows written by
//! other sessions are kept; two sessions updating the same row is
//! last-writer-wins for that row.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    ApplicationUser, Category, Entity, OrderDetail, OrderDetailInclude, OrderHeader,
    OrderHeaderInclude, OrderStatus, PaymentStatus, Product,
};
use crate::repository::{OrderHeaderRepository, Repository};
use crate::unit_of_work::{notify_commit, notify_rollback, Observers};
use crate::{
    PersistenceError, PersistenceResult, TransactionAware, UnitOfWork, UnitOfWorkSession,
};

#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    categories: BTreeMap<i32, Category>,
    order_headers: BTreeMap<i32, OrderHeader>,
    order_details: BTreeMap<i32, OrderDetail>,
    products: BTreeMap<i32, Product>,
    users: HashMap<Uuid, ApplicationUser>,
}

/// Last identifier handed out per table. Identifiers are never reused, even
/// after a rollback or a delete.
#[derive(Debug, Default)]
pub(crate) struct Sequences {
    categories: i32,
    order_headers: i32,
    order_details: i32,
    products: i32,
}

fn next_value(sequence: &mut i32) -> i32 {
    *sequence += 1;
    *sequence
}

/// A journaled write, replayable against any copy of the tables.
type Change = Box<dyn Fn(&mut Tables) -> PersistenceResult<()> + Send + Sync>;

/// Table access and relation resolution for the in-memory store.
pub(crate) trait Stored: Entity {
    fn table(tables: &Tables) -> &BTreeMap<i32, Self>;

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i32, Self>;

    fn sequence(sequences: &mut Sequences) -> &mut i32;

    fn assign_id(&mut self, id: i32);

    fn resolve(&mut self, _tables: &Tables, _include: &[Self::Include]) {}
}

impl Stored for Category {
    fn table(tables: &Tables) -> &BTreeMap<i32, Self> {
        &tables.categories
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i32, Self> {
        &mut tables.categories
    }

    fn sequence(sequences: &mut Sequences) -> &mut i32 {
        &mut sequences.categories
    }

    fn assign_id(&mut self, id: i32) {
        self.id = id;
    }
}

impl Stored for OrderHeader {
    fn table(tables: &Tables) -> &BTreeMap<i32, Self> {
        &tables.order_headers
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i32, Self> {
        &mut tables.order_headers
    }

    fn sequence(sequences: &mut Sequences) -> &mut i32 {
        &mut sequences.order_headers
    }

    fn assign_id(&mut self, id: i32) {
        self.id = id;
    }

    fn resolve(&mut self, tables: &Tables, include: &[OrderHeaderInclude]) {
        if include.contains(&OrderHeaderInclude::ApplicationUser) {
            self.application_user = tables.users.get(&self.application_user_id).cloned();
        }
    }
}

impl Stored for OrderDetail {
    fn table(tables: &Tables) -> &BTreeMap<i32, Self> {
        &tables.order_details
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i32, Self> {
        &mut tables.order_details
    }

    fn sequence(sequences: &mut Sequences) -> &mut i32 {
        &mut sequences.order_details
    }

    fn assign_id(&mut self, id: i32) {
        self.id = id;
    }

    fn resolve(&mut self, tables: &Tables, include: &[OrderDetailInclude]) {
        if include.contains(&OrderDetailInclude::Product) {
            self.product = tables.products.get(&self.product_id).cloned();
        }
    }
}

fn missing<E: Entity>(id: i32) -> PersistenceError {
    PersistenceError::EntityMissing {
        entity: E::NAME,
        id: id.to_string(),
    }
}

fn insert<E: Stored>(tables: &mut Tables, entity: &E) -> PersistenceResult<()> {
    E::table_mut(tables).insert(entity.id(), entity.clone());
    Ok(())
}

fn replace<E: Stored>(tables: &mut Tables, entity: &E) -> PersistenceResult<()> {
    match E::table_mut(tables).get_mut(&entity.id()) {
        Some(stored) => {
            *stored = entity.clone();
            Ok(())
        }
        None => Err(missing::<E>(entity.id())),
    }
}

fn remove<E: Stored>(tables: &mut Tables, id: i32) -> PersistenceResult<()> {
    E::table_mut(tables)
        .remove(&id)
        .map(|_| ())
        .ok_or_else(|| missing::<E>(id))
}

fn order_header_mut(tables: &mut Tables, id: i32) -> PersistenceResult<&mut OrderHeader> {
    tables
        .order_headers
        .get_mut(&id)
        .ok_or_else(|| missing::<OrderHeader>(id))
}

/// Unit of work whose committed state lives in process memory.
#[derive(Clone, Default)]
pub struct InMemoryUnitOfWork {
    committed: Arc<RwLock<Tables>>,
    sequences: Arc<Mutex<Sequences>>,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a user so order headers can resolve it.
    pub fn seed_user(&self, user: ApplicationUser) {
        self.committed.write().users.insert(user.id, user);
    }

    /// Store a product so order lines can resolve it. An `id` of 0 is replaced
    /// by the next free identifier.
    pub fn seed_product(&self, mut product: Product) -> Product {
        {
            let mut sequences = self.sequences.lock();
            if product.id == 0 {
                product.id = next_value(&mut sequences.products);
            } else {
                sequences.products = sequences.products.max(product.id);
            }
        }
        self.committed
            .write()
            .products
            .insert(product.id, product.clone());
        product
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    type Session = InMemoryUnitOfWorkSession;

    async fn begin(&self) -> PersistenceResult<Self::Session> {
        let workspace = Arc::new(Workspace {
            working: RwLock::new(self.committed.read().clone()),
            journal: Mutex::new(Vec::new()),
            committed: self.committed.clone(),
            sequences: self.sequences.clone(),
        });
        Ok(InMemoryUnitOfWorkSession {
            categories: InMemoryRepository::new(workspace.clone()),
            order_headers: InMemoryRepository::new(workspace.clone()),
            order_details: InMemoryRepository::new(workspace.clone()),
            workspace,
            observers: Arc::new(RwLock::new(Vec::new())),
        })
    }
}

/// State shared by the repositories of one session.
pub(crate) struct Workspace {
    committed: Arc<RwLock<Tables>>,
    sequences: Arc<Mutex<Sequences>>,
    working: RwLock<Tables>,
    journal: Mutex<Vec<Change>>,
}

impl Workspace {
    /// Applies `change` to the session copy and journals it if it succeeded.
    fn record<F>(&self, change: F) -> PersistenceResult<()>
    where
        F: Fn(&mut Tables) -> PersistenceResult<()> + Send + Sync + 'static,
    {
        change(&mut self.working.write())?;
        self.journal.lock().push(Box::new(change));
        Ok(())
    }

    /// Replays the journal onto the committed tables. Either every change
    /// lands or none does.
    fn publish(&self) -> PersistenceResult<usize> {
        let mut journal = self.journal.lock();
        let mut committed = self.committed.write();
        let mut next = committed.clone();
        for change in journal.iter() {
            change(&mut next)?;
        }
        *committed = next;
        *self.working.write() = committed.clone();
        let published = journal.len();
        journal.clear();
        Ok(published)
    }

    fn discard(&self) -> usize {
        let mut journal = self.journal.lock();
        *self.working.write() = self.committed.read().clone();
        let discarded = journal.len();
        journal.clear();
        discarded
    }
}

pub(crate) struct InMemoryRepository<E> {
    workspace: Arc<Workspace>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Stored> InMemoryRepository<E> {
    fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            workspace,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Stored> Repository<E> for InMemoryRepository<E> {
    async fn get_all(
        &self,
        filter: Option<&E::Filter>,
        include: &[E::Include],
    ) -> PersistenceResult<Vec<E>> {
        let tables = self.workspace.working.read();
        Ok(E::table(&tables)
            .values()
            .filter(|e| filter.map_or(true, |f| e.matches(f)))
            .map(|e| {
                let mut entity = e.clone();
                entity.resolve(&tables, include);
                entity
            })
            .collect())
    }

    async fn get_one(
        &self,
        filter: &E::Filter,
        include: &[E::Include],
    ) -> PersistenceResult<Option<E>> {
        let tables = self.workspace.working.read();
        Ok(E::table(&tables)
            .values()
            .find(|e| e.matches(filter))
            .map(|e| {
                let mut entity = e.clone();
                entity.resolve(&tables, include);
                entity
            }))
    }

    async fn add(&self, entity: &E) -> PersistenceResult<E> {
        let mut stored = entity.clone();
        stored.assign_id(next_value(E::sequence(&mut self.workspace.sequences.lock())));
        let row = stored.clone();
        self.workspace.record(move |tables| insert(tables, &row))?;
        Ok(stored)
    }

    async fn update(&self, entity: &E) -> PersistenceResult<()> {
        let row = entity.clone();
        self.workspace.record(move |tables| replace(tables, &row))
    }

    async fn delete(&self, entity: &E) -> PersistenceResult<()> {
        let id = entity.id();
        self.workspace.record(move |tables| remove::<E>(tables, id))
    }
}

#[async_trait]
impl OrderHeaderRepository for InMemoryRepository<OrderHeader> {
    async fn update_status(
        &self,
        id: i32,
        order_status: OrderStatus,
        payment_status: Option<PaymentStatus>,
    ) -> PersistenceResult<()> {
        self.workspace.record(move |tables| {
            let header = order_header_mut(tables, id)?;
            header.order_status = order_status;
            if let Some(payment_status) = payment_status {
                header.payment_status = payment_status;
            }
            Ok(())
        })
    }

    async fn update_payment_intent(
        &self,
        id: i32,
        session_id: &str,
        payment_intent_id: &str,
    ) -> PersistenceResult<()> {
        let session_id = session_id.to_string();
        let payment_intent_id = payment_intent_id.to_string();
        let paid_at = Utc::now();
        self.workspace.record(move |tables| {
            let header = order_header_mut(tables, id)?;
            header.session_id = Some(session_id.clone());
            header.payment_intent_id = Some(payment_intent_id.clone());
            header.date_of_payment = Some(paid_at);
            Ok(())
        })
    }
}

/// Session over a private copy of the in-memory tables.
pub struct InMemoryUnitOfWorkSession {
    workspace: Arc<Workspace>,
    categories: InMemoryRepository<Category>,
    order_headers: InMemoryRepository<OrderHeader>,
    order_details: InMemoryRepository<OrderDetail>,
    observers: Observers,
}

#[async_trait]
impl UnitOfWorkSession for InMemoryUnitOfWorkSession {
    fn category(&self) -> &dyn Repository<Category> {
        &self.categories
    }

    fn order_header(&self) -> &dyn OrderHeaderRepository {
        &self.order_headers
    }

    fn order_detail(&self) -> &dyn Repository<OrderDetail> {
        &self.order_details
    }

    fn register_transaction_aware(&self, observer: Arc<dyn TransactionAware>) {
        self.observers.write().push(observer);
    }

    async fn save(&self) -> PersistenceResult<()> {
        let published = self.workspace.publish()?;
        tracing::debug!(changes = published, "in-memory changes committed");
        notify_commit(&self.observers).await
    }

    async fn rollback(&self) -> PersistenceResult<()> {
        let discarded = self.workspace.discard();
        tracing::debug!(changes = discarded, "in-memory changes discarded");
        notify_rollback(&self.observers).await
    }
}
