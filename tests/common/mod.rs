#![allow(dead_code)]

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use client_exposure::models::{
    Client, ClientCode, ClientSettings, Representative, RepresentativeOrder, Separation,
    SeparationStatus, Title,
};
use client_exposure::service::normalize_client_code;
use client_exposure::{AppResult, FinancialService, LedgerSource, SnapshotCache};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// 内存数据源, 记录客户列表被读取的次数
#[derive(Default)]
pub struct InMemoryLedger {
    pub clients: Mutex<Vec<Client>>,
    pub titles: Vec<Title>,
    pub orders: Vec<RepresentativeOrder>,
    pub representatives: Vec<Representative>,
    pub separations: Mutex<Vec<Separation>>,
    pub client_loads: AtomicUsize,
}

impl InMemoryLedger {
    pub fn loads(&self) -> usize {
        self.client_loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerSource for InMemoryLedger {
    async fn list_clients(&self) -> AppResult<Vec<Client>> {
        self.client_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.clients.lock().unwrap().clone())
    }

    async fn list_titles(&self, codes: &[ClientCode]) -> AppResult<Vec<Title>> {
        Ok(self
            .titles
            .iter()
            .filter(|t| {
                t.client_code
                    .as_ref()
                    .and_then(normalize_client_code)
                    .is_some_and(|c| codes.contains(&c))
            })
            .cloned()
            .collect())
    }

    async fn list_representative_orders(&self) -> AppResult<Vec<RepresentativeOrder>> {
        Ok(self.orders.clone())
    }

    async fn list_representatives(&self) -> AppResult<Vec<Representative>> {
        Ok(self.representatives.clone())
    }

    async fn list_separations(&self) -> AppResult<Vec<Separation>> {
        Ok(self.separations.lock().unwrap().clone())
    }

    async fn get_separation(&self, id: i64) -> AppResult<Option<Separation>> {
        Ok(self
            .separations
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn set_separation_status(
        &self,
        id: i64,
        from: SeparationStatus,
        to: SeparationStatus,
    ) -> AppResult<Option<Separation>> {
        let mut separations = self.separations.lock().unwrap();
        Ok(separations
            .iter_mut()
            .find(|s| s.id == id && s.status == from)
            .map(|s| {
                s.status = to;
                s.clone()
            }))
    }

    async fn update_client_settings(
        &self,
        code: ClientCode,
        settings: &ClientSettings,
    ) -> AppResult<Option<Client>> {
        let mut clients = self.clients.lock().unwrap();
        Ok(clients
            .iter_mut()
            .find(|c| c.code.as_ref().and_then(normalize_client_code) == Some(code))
            .map(|c| {
                c.healthy_volume = settings.healthy_volume.clone();
                c.correction_factor = settings.correction_factor;
                c.clone()
            }))
    }
}

/// 第一次读取申请列表后挂起, 直到 `release` 放行
pub struct PausingLedger {
    pub inner: Arc<InMemoryLedger>,
    pub reached: Notify,
    pub release: Notify,
    armed: AtomicBool,
}

impl PausingLedger {
    pub fn new(inner: Arc<InMemoryLedger>) -> Self {
        Self {
            inner,
            reached: Notify::new(),
            release: Notify::new(),
            armed: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl LedgerSource for PausingLedger {
    async fn list_clients(&self) -> AppResult<Vec<Client>> {
        self.inner.list_clients().await
    }

    async fn list_titles(&self, codes: &[ClientCode]) -> AppResult<Vec<Title>> {
        self.inner.list_titles(codes).await
    }

    async fn list_representative_orders(&self) -> AppResult<Vec<RepresentativeOrder>> {
        self.inner.list_representative_orders().await
    }

    async fn list_representatives(&self) -> AppResult<Vec<Representative>> {
        self.inner.list_representatives().await
    }

    async fn list_separations(&self) -> AppResult<Vec<Separation>> {
        let separations = self.inner.list_separations().await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.reached.notify_one();
            self.release.notified().await;
        }
        Ok(separations)
    }

    async fn get_separation(&self, id: i64) -> AppResult<Option<Separation>> {
        self.inner.get_separation(id).await
    }

    async fn set_separation_status(
        &self,
        id: i64,
        from: SeparationStatus,
        to: SeparationStatus,
    ) -> AppResult<Option<Separation>> {
        self.inner.set_separation_status(id, from, to).await
    }

    async fn update_client_settings(
        &self,
        code: ClientCode,
        settings: &ClientSettings,
    ) -> AppResult<Option<Client>> {
        self.inner.update_client_settings(code, settings).await
    }
}

pub fn service_with(ledger: Arc<dyn LedgerSource>, ttl: Duration) -> FinancialService {
    FinancialService::new(
        ledger,
        Arc::new(SnapshotCache::new(ttl)),
        Duration::from_secs(5),
    )
}

pub fn pending_separation(id: i64, client: i64) -> Separation {
    Separation {
        id,
        client_code: Some(client.into()),
        status: SeparationStatus::Pending,
        total_value: BigDecimal::from(250_i64),
        created_at: None,
        items: Vec::new(),
    }
}

pub fn sample_ledger() -> InMemoryLedger {
    InMemoryLedger {
        clients: Mutex::new(vec![
            Client::new(1001_i64, Some("Mercado Azul")),
            Client::new("2002", Some("Padaria Sol")),
            Client::new(3003_i64, Some("Farmácia Lua")),
        ]),
        titles: vec![
            Title::new(1001_i64, "6000", "6000", "2099-01-01"),
            Title::new("2002", "800", "300", "2020-01-01"),
            Title::new(2002_i64, "100", "100", "2099-01-01"),
        ],
        orders: vec![RepresentativeOrder {
            order_number: "77".to_string(),
            representative: Some(5),
            client_code: Some(1001_i64.into()),
            ordered_at: None,
        }],
        representatives: vec![Representative {
            code: 5,
            name: "Carlos".to_string(),
        }],
        separations: Mutex::new(vec![pending_separation(1, 1001), pending_separation(2, 2002)]),
        client_loads: AtomicUsize::new(0),
    }
}
