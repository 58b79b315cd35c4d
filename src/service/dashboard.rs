use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::db::LedgerSource;
use crate::error::{AppError, AppResult};
use crate::models::{
    Client, ClientCode, ClientReport, ClientSettings, EnrichedClientRecord, PortfolioSummary,
    RepresentativeCode, Separation, SeparationAction, Title,
};
use crate::service::aggregator::{index_separations, process_clients_data, SeparationIndex};
use crate::service::cache::TtlCache;
use crate::service::normalize::normalize_optional;
use crate::service::representatives::{client_to_representative_map, representative_name_map};

const PORTFOLIO_KEY: &str = "portfolio";

/// 一次取数的完整结果, 汇总在其上重复计算
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub clients: Vec<Client>,
    pub titles: Vec<Title>,
    pub separations: SeparationIndex,
    pub client_to_rep: HashMap<ClientCode, RepresentativeCode>,
    pub rep_names: HashMap<RepresentativeCode, String>,
}

impl LedgerSnapshot {
    pub fn enrich(&self, today: NaiveDate) -> Vec<EnrichedClientRecord> {
        process_clients_data(
            &self.clients,
            &self.separations,
            &self.client_to_rep,
            &self.rep_names,
            &self.titles,
            today,
        )
    }
}

pub type SnapshotCache = TtlCache<&'static str, Arc<LedgerSnapshot>>;

/// 客户财务看板服务
pub struct FinancialService {
    source: Arc<dyn LedgerSource>,
    cache: Arc<SnapshotCache>,
    query_timeout: Duration,
}

impl FinancialService {
    pub fn new(
        source: Arc<dyn LedgerSource>,
        cache: Arc<SnapshotCache>,
        query_timeout: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            query_timeout,
        }
    }

    /// 读取快照, 缓存未命中时回源
    pub async fn snapshot(&self) -> AppResult<Arc<LedgerSnapshot>> {
        if let Some(snapshot) = self.cache.get(&PORTFOLIO_KEY) {
            tracing::debug!("Ledger snapshot served from cache");
            return Ok(snapshot);
        }

        let generation = self.cache.generation();
        let snapshot = match tokio::time::timeout(self.query_timeout, self.load_snapshot()).await {
            Ok(result) => Arc::new(result?),
            Err(_) => {
                tracing::error!("✗ 取数超时 (>{:?})", self.query_timeout);
                return Err(AppError::Timeout(self.query_timeout.as_secs()));
            }
        };

        let cached = self
            .cache
            .insert_if_current(PORTFOLIO_KEY, snapshot.clone(), generation);
        if !cached && !self.cache.ttl().is_zero() {
            tracing::debug!("Ledger snapshot invalidated while loading, not cached");
        }
        Ok(snapshot)
    }

    async fn load_snapshot(&self) -> AppResult<LedgerSnapshot> {
        let start_time = std::time::Instant::now();

        // 1. 客户列表
        let clients = self.source.list_clients().await?;
        let mut codes: Vec<ClientCode> = clients
            .iter()
            .filter_map(|c| normalize_optional(c.code.as_ref()))
            .collect();
        codes.sort_unstable();
        codes.dedup();

        // 2. 单据、订单、代表、申请并发查询
        let (titles, orders, representatives, separations) = tokio::try_join!(
            self.source.list_titles(&codes),
            self.source.list_representative_orders(),
            self.source.list_representatives(),
            self.source.list_separations(),
        )?;

        tracing::info!(
            "Ledger snapshot loaded: {} clients, {} titles, {} orders, {} representatives, {} separations in {:?}",
            clients.len(),
            titles.len(),
            orders.len(),
            representatives.len(),
            separations.len(),
            start_time.elapsed()
        );

        Ok(LedgerSnapshot {
            clients,
            titles,
            separations: index_separations(separations),
            client_to_rep: client_to_representative_map(&orders),
            rep_names: representative_name_map(&representatives),
        })
    }

    /// 看板报表; `search` 按简称、编码或代表姓名过滤 (忽略大小写)
    pub async fn client_report(
        &self,
        today: NaiveDate,
        search: Option<&str>,
    ) -> AppResult<ClientReport> {
        let snapshot = self.snapshot().await?;
        let mut clients = snapshot.enrich(today);

        if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
            clients.retain(|record| matches_search(record, term));
        }

        Ok(ClientReport {
            today,
            summary: PortfolioSummary::from_records(&clients),
            clients,
        })
    }

    pub async fn client_record(
        &self,
        code: ClientCode,
        today: NaiveDate,
    ) -> AppResult<EnrichedClientRecord> {
        let snapshot = self.snapshot().await?;
        snapshot
            .enrich(today)
            .into_iter()
            .find(|record| record.client_code == Some(code))
            .ok_or_else(|| AppError::NotFound(format!("Client {}", code)))
    }

    pub async fn approve_separation(&self, id: i64) -> AppResult<Separation> {
        self.transition_separation(id, SeparationAction::Approve).await
    }

    pub async fn reject_separation(&self, id: i64) -> AppResult<Separation> {
        self.transition_separation(id, SeparationAction::Reject).await
    }

    async fn transition_separation(
        &self,
        id: i64,
        action: SeparationAction,
    ) -> AppResult<Separation> {
        let current = self
            .source
            .get_separation(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Separation {}", id)))?;

        let Some(next) = action.apply(current.status) else {
            return Err(AppError::InvalidTransition {
                id,
                status: current.status,
            });
        };

        // 条件更新; 并发修改时以数据库中的最新状态报错
        let updated = match self
            .source
            .set_separation_status(id, current.status, next)
            .await?
        {
            Some(updated) => updated,
            None => {
                let status = self
                    .source
                    .get_separation(id)
                    .await?
                    .map(|s| s.status)
                    .ok_or_else(|| AppError::NotFound(format!("Separation {}", id)))?;
                return Err(AppError::InvalidTransition { id, status });
            }
        };

        self.cache.invalidate(&PORTFOLIO_KEY);
        tracing::info!("Separation {}: {} -> {}", id, current.status, updated.status);
        Ok(updated)
    }

    /// 管理表单: 更新健康开票量与修正系数
    pub async fn update_client_settings(
        &self,
        code: ClientCode,
        settings: ClientSettings,
    ) -> AppResult<Client> {
        if let Some(volume) = &settings.healthy_volume {
            if *volume < bigdecimal::BigDecimal::from(0) {
                return Err(AppError::Validation(
                    "volume_saudavel_faturamento must not be negative".to_string(),
                ));
            }
        }

        let client = self
            .source
            .update_client_settings(code, &settings)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {}", code)))?;

        self.cache.invalidate(&PORTFOLIO_KEY);
        tracing::info!("Client {} settings updated", code);
        Ok(client)
    }
}

fn matches_search(record: &EnrichedClientRecord, term: &str) -> bool {
    let needle = term.to_lowercase();
    let alias_hit = record
        .client
        .alias
        .as_deref()
        .is_some_and(|alias| alias.to_lowercase().contains(&needle));
    let code_hit = record
        .client_code
        .is_some_and(|code| code.to_string().contains(&needle));
    let rep_hit = record
        .representative_name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(&needle));
    alias_hit || code_hit || rep_hit
}
