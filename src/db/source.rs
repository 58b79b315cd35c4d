use async_trait::async_trait;
use futures::future::try_join_all;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::db::queries;
use crate::error::AppResult;
use crate::models::{
    Client, ClientCode, ClientSettings, Representative, RepresentativeOrder, Separation,
    SeparationItem, SeparationRow, SeparationStatus, Title,
};

/// 单次单据查询最多携带的客户编码数
pub const TITLE_QUERY_CHUNK: usize = 1000;

/// 外部数据库的读写接口
#[async_trait]
pub trait LedgerSource: Send + Sync + 'static {
    async fn list_clients(&self) -> AppResult<Vec<Client>>;

    async fn list_titles(&self, codes: &[ClientCode]) -> AppResult<Vec<Title>>;

    async fn list_representative_orders(&self) -> AppResult<Vec<RepresentativeOrder>>;

    async fn list_representatives(&self) -> AppResult<Vec<Representative>>;

    async fn list_separations(&self) -> AppResult<Vec<Separation>>;

    async fn get_separation(&self, id: i64) -> AppResult<Option<Separation>>;

    /// 当前状态不是 `from` 时返回 `None`
    async fn set_separation_status(
        &self,
        id: i64,
        from: SeparationStatus,
        to: SeparationStatus,
    ) -> AppResult<Option<Separation>>;

    async fn update_client_settings(
        &self,
        code: ClientCode,
        settings: &ClientSettings,
    ) -> AppResult<Option<Client>>;
}

/// PostgreSQL 实现
#[derive(Clone)]
pub struct PgLedgerSource {
    pool: PgPool,
}

impl PgLedgerSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attach_items(&self, rows: Vec<SeparationRow>) -> AppResult<Vec<Separation>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut items_by_separation: HashMap<i64, Vec<SeparationItem>> = HashMap::new();
        for chunk in ids.chunks(TITLE_QUERY_CHUNK) {
            for item in queries::list_separation_items(&self.pool, chunk).await? {
                items_by_separation
                    .entry(item.separacao_id)
                    .or_default()
                    .push(item.into());
            }
        }

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let items = items_by_separation.remove(&row.id).unwrap_or_default();
                row.into_separation(items)
            })
            .collect())
    }
}

#[async_trait]
impl LedgerSource for PgLedgerSource {
    async fn list_clients(&self) -> AppResult<Vec<Client>> {
        let rows = queries::list_clients(&self.pool).await?;
        Ok(rows.into_iter().map(Client::from).collect())
    }

    async fn list_titles(&self, codes: &[ClientCode]) -> AppResult<Vec<Title>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let raw_codes: Vec<i64> = codes.iter().map(|code| code.get()).collect();
        let chunks = raw_codes
            .chunks(TITLE_QUERY_CHUNK)
            .map(|chunk| queries::list_titles_for_codes(&self.pool, chunk));

        let results = try_join_all(chunks).await?;
        let titles: Vec<Title> = results.into_iter().flatten().map(Title::from).collect();

        tracing::debug!(
            "Fetched {} titles for {} client codes",
            titles.len(),
            codes.len()
        );
        Ok(titles)
    }

    async fn list_representative_orders(&self) -> AppResult<Vec<RepresentativeOrder>> {
        let rows = queries::list_representative_orders(&self.pool).await?;
        Ok(rows.into_iter().map(RepresentativeOrder::from).collect())
    }

    async fn list_representatives(&self) -> AppResult<Vec<Representative>> {
        Ok(queries::list_representatives(&self.pool).await?)
    }

    async fn list_separations(&self) -> AppResult<Vec<Separation>> {
        let rows = queries::list_separations(&self.pool).await?;
        self.attach_items(rows).await
    }

    async fn get_separation(&self, id: i64) -> AppResult<Option<Separation>> {
        let Some(row) = queries::get_separation(&self.pool, id).await? else {
            return Ok(None);
        };
        Ok(self.attach_items(vec![row]).await?.into_iter().next())
    }

    async fn set_separation_status(
        &self,
        id: i64,
        from: SeparationStatus,
        to: SeparationStatus,
    ) -> AppResult<Option<Separation>> {
        let Some(row) = queries::update_separation_status(&self.pool, id, from, to).await? else {
            return Ok(None);
        };
        Ok(self.attach_items(vec![row]).await?.into_iter().next())
    }

    async fn update_client_settings(
        &self,
        code: ClientCode,
        settings: &ClientSettings,
    ) -> AppResult<Option<Client>> {
        let row = queries::update_client_settings(&self.pool, code.get(), settings).await?;
        Ok(row.map(Client::from))
    }
}
