use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::HashMap;

use crate::models::{
    Client, ClientCode, EnrichedClientRecord, RepresentativeCode, Separation, Title,
};
use crate::service::ledger::{TitleLedger, TitleTotals};
use crate::service::normalize::normalize_optional;
use crate::service::representatives::resolve_representative_name;
use crate::service::risk::classify;

/// 客户编码 -> 拣货申请, 保持原始顺序
pub type SeparationIndex = IndexMap<ClientCode, Vec<Separation>>;

/// 将申请按客户分组; 编码无法规范化的申请被丢弃
pub fn index_separations(separations: Vec<Separation>) -> SeparationIndex {
    let mut index = SeparationIndex::new();
    for separation in separations {
        match normalize_optional(separation.client_code.as_ref()) {
            Some(code) => index.entry(code).or_default().push(separation),
            None => tracing::debug!("Separation {} has no usable client code", separation.id),
        }
    }
    index
}

/// 客户财务汇总 (纯函数, 无 I/O)
///
/// 每个输入客户对应一条输出, 顺序不变。编码无法规范化的客户得到全零合计、
/// 空申请列表和空代表名, 不会影响其他客户。
pub fn process_clients_data(
    clients: &[Client],
    separations_by_client_code: &SeparationIndex,
    client_to_rep_code: &HashMap<ClientCode, RepresentativeCode>,
    rep_code_to_name: &HashMap<RepresentativeCode, String>,
    titles: &[Title],
    today: NaiveDate,
) -> Vec<EnrichedClientRecord> {
    let ledger = TitleLedger::from_titles(titles);

    clients
        .iter()
        .map(|client| {
            let code = normalize_optional(client.code.as_ref());

            let totals = match code {
                Some(code) => ledger.totals(code, today),
                None => TitleTotals::zero(),
            };

            let totals_consistent = totals.is_consistent();
            if !totals_consistent {
                tracing::warn!(
                    "Client {:?}: totals out of order (overdue {}, open {}, billed {})",
                    code,
                    totals.overdue_balance,
                    totals.open_balance,
                    totals.gross_total
                );
            }

            let separations = code
                .and_then(|c| separations_by_client_code.get(&c))
                .cloned()
                .unwrap_or_default();

            let representative_name =
                resolve_representative_name(code, client_to_rep_code, rep_code_to_name)
                    .map(str::to_string);

            let risk = classify(Some(&totals.overdue_balance), Some(&totals.open_balance));

            EnrichedClientRecord {
                client: client.clone(),
                client_code: code,
                total_billed: totals.gross_total,
                total_open: totals.open_balance,
                total_overdue: totals.overdue_balance,
                separations,
                representative_name,
                risk,
                missing_amounts: totals.missing_amounts,
                totals_consistent,
            }
        })
        .collect()
}
