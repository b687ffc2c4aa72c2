use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use storefront_admin::models::{
    Category, Entity, OrderDetail, OrderHeader, OrderStatus, PaymentStatus,
};
use storefront_admin::payment::{PaymentError, Refund, RefundRequest, RefundService};
use storefront_admin::{
    OrderHeaderRepository, PersistenceError, PersistenceResult, Repository, TransactionAware,
    UnitOfWorkSession,
};

/// One collaborator call, recorded in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetAll(&'static str),
    GetOne(&'static str),
    Add(&'static str),
    Update(&'static str),
    Delete(&'static str),
    UpdateStatus {
        id: i32,
        order_status: OrderStatus,
        payment_status: Option<PaymentStatus>,
    },
    UpdatePaymentIntent {
        id: i32,
        payment_intent_id: String,
    },
    Refund(RefundRequest),
    Save,
    Rollback,
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn record(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.lock().iter().filter(|c| *c == call).count()
    }

    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.0.lock().iter().position(predicate)
    }
}

/// Repository double: serves `rows` and records every argument it receives.
pub struct MockRepository<E: Entity> {
    log: CallLog,
    rows: Mutex<Vec<E>>,
    filters: Mutex<Vec<E::Filter>>,
    includes: Mutex<Vec<Vec<E::Include>>>,
    added: Mutex<Vec<E>>,
    updated: Mutex<Vec<E>>,
    deleted: Mutex<Vec<E>>,
}

impl<E> MockRepository<E>
where
    E: Entity,
    E::Filter: Clone,
{
    fn new(log: CallLog) -> Self {
        Self {
            log,
            rows: Mutex::new(Vec::new()),
            filters: Mutex::new(Vec::new()),
            includes: Mutex::new(Vec::new()),
            added: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Entities the repository returns from `get_all` and `get_one`.
    pub fn returns(&self, rows: Vec<E>) {
        *self.rows.lock() = rows;
    }

    pub fn filters(&self) -> Vec<E::Filter> {
        self.filters.lock().clone()
    }

    pub fn includes(&self) -> Vec<Vec<E::Include>> {
        self.includes.lock().clone()
    }

    pub fn added(&self) -> Vec<E> {
        self.added.lock().clone()
    }

    pub fn updated(&self) -> Vec<E> {
        self.updated.lock().clone()
    }

    pub fn deleted(&self) -> Vec<E> {
        self.deleted.lock().clone()
    }

    fn remember(&self, filter: Option<&E::Filter>, include: &[E::Include]) {
        if let Some(filter) = filter {
            self.filters.lock().push(filter.clone());
        }
        self.includes.lock().push(include.to_vec());
    }
}

#[async_trait]
impl<E> Repository<E> for MockRepository<E>
where
    E: Entity,
    E::Filter: Clone,
{
    async fn get_all(
        &self,
        filter: Option<&E::Filter>,
        include: &[E::Include],
    ) -> PersistenceResult<Vec<E>> {
        self.log.record(Call::GetAll(E::NAME));
        self.remember(filter, include);
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|e| filter.map_or(true, |f| e.matches(f)))
            .cloned()
            .collect())
    }

    async fn get_one(
        &self,
        filter: &E::Filter,
        include: &[E::Include],
    ) -> PersistenceResult<Option<E>> {
        self.log.record(Call::GetOne(E::NAME));
        self.remember(Some(filter), include);
        Ok(self.rows.lock().iter().find(|e| e.matches(filter)).cloned())
    }

    async fn add(&self, entity: &E) -> PersistenceResult<E> {
        self.log.record(Call::Add(E::NAME));
        self.added.lock().push(entity.clone());
        Ok(entity.clone())
    }

    async fn update(&self, entity: &E) -> PersistenceResult<()> {
        self.log.record(Call::Update(E::NAME));
        self.updated.lock().push(entity.clone());
        Ok(())
    }

    async fn delete(&self, entity: &E) -> PersistenceResult<()> {
        self.log.record(Call::Delete(E::NAME));
        self.deleted.lock().push(entity.clone());
        Ok(())
    }
}

#[async_trait]
impl OrderHeaderRepository for MockRepository<OrderHeader> {
    async fn update_status(
        &self,
        id: i32,
        order_status: OrderStatus,
        payment_status: Option<PaymentStatus>,
    ) -> PersistenceResult<()> {
        self.log.record(Call::UpdateStatus {
            id,
            order_status,
            payment_status,
        });
        Ok(())
    }

    async fn update_payment_intent(
        &self,
        id: i32,
        _session_id: &str,
        payment_intent_id: &str,
    ) -> PersistenceResult<()> {
        self.log.record(Call::UpdatePaymentIntent {
            id,
            payment_intent_id: payment_intent_id.to_string(),
        });
        Ok(())
    }
}

/// Unit-of-work double sharing one call log across its repositories.
pub struct MockSession {
    pub log: CallLog,
    pub categories: MockRepository<Category>,
    pub order_headers: MockRepository<OrderHeader>,
    pub order_details: MockRepository<OrderDetail>,
    fail_save: AtomicBool,
}

impl MockSession {
    pub fn new() -> Arc<Self> {
        let log = CallLog::default();
        Arc::new(Self {
            categories: MockRepository::new(log.clone()),
            order_headers: MockRepository::new(log.clone()),
            order_details: MockRepository::new(log.clone()),
            log,
            fail_save: AtomicBool::new(false),
        })
    }

    /// Make every later `save` fail like a lost database connection.
    pub fn fail_saves(&self) {
        self.fail_save.store(true, Ordering::SeqCst);
    }

    pub fn count(&self, call: &Call) -> usize {
        self.log.count(call)
    }

    pub fn saves(&self) -> usize {
        self.log.count(&Call::Save)
    }
}

#[async_trait]
impl UnitOfWorkSession for MockSession {
    fn category(&self) -> &dyn Repository<Category> {
        &self.categories
    }

    fn order_header(&self) -> &dyn OrderHeaderRepository {
        &self.order_headers
    }

    fn order_detail(&self) -> &dyn Repository<OrderDetail> {
        &self.order_details
    }

    fn register_transaction_aware(&self, _observer: Arc<dyn TransactionAware>) {}

    async fn save(&self) -> PersistenceResult<()> {
        self.log.record(Call::Save);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(PersistenceError::TransactionClosed);
        }
        Ok(())
    }

    async fn rollback(&self) -> PersistenceResult<()> {
        self.log.record(Call::Rollback);
        Ok(())
    }
}

/// Refund service double that records requests into the session's log.
pub struct MockRefundService {
    log: CallLog,
    failure: Option<PaymentError>,
}

impl MockRefundService {
    pub fn new(log: CallLog) -> Arc<Self> {
        Arc::new(Self { log, failure: None })
    }

    pub fn failing(log: CallLog, failure: PaymentError) -> Arc<Self> {
        Arc::new(Self {
            log,
            failure: Some(failure),
        })
    }

    pub fn requests(&self) -> Vec<RefundRequest> {
        self.log
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Refund(request) => Some(request),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl RefundService for MockRefundService {
    async fn create(&self, request: RefundRequest) -> Result<Refund, PaymentError> {
        self.log.record(Call::Refund(request.clone()));
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        Ok(Refund {
            id: "re_test_1".to_string(),
            payment_intent: request.payment_intent,
            status: "succeeded".to_string(),
        })
    }
}
