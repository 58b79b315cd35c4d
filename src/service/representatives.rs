use std::collections::HashMap;

use crate::models::{ClientCode, Representative, RepresentativeCode, RepresentativeOrder};
use crate::service::normalize::normalize_optional;

/// 由订单推导 客户 -> 代表编码
///
/// 每个客户取最近一张带代表的订单: 先比较下单时间, 时间相同或缺失时比较订单号。
pub fn client_to_representative_map(
    orders: &[RepresentativeOrder],
) -> HashMap<ClientCode, RepresentativeCode> {
    let mut latest: HashMap<ClientCode, &RepresentativeOrder> = HashMap::new();

    for order in orders {
        if order.representative.is_none() {
            continue;
        }
        let Some(code) = normalize_optional(order.client_code.as_ref()) else {
            continue;
        };

        latest
            .entry(code)
            .and_modify(|current| {
                if is_more_recent(order, current) {
                    *current = order;
                }
            })
            .or_insert(order);
    }

    latest
        .into_iter()
        .filter_map(|(code, order)| order.representative.map(|r| (code, RepresentativeCode(r))))
        .collect()
}

fn is_more_recent(candidate: &RepresentativeOrder, current: &RepresentativeOrder) -> bool {
    match candidate.ordered_at.cmp(&current.ordered_at) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => order_number_key(candidate) > order_number_key(current),
    }
}

/// 数字订单号按数值比较, 否则按文本比较
fn order_number_key(order: &RepresentativeOrder) -> (Option<i64>, &str) {
    let trimmed = order.order_number.trim();
    (trimmed.parse::<i64>().ok(), trimmed)
}

/// 代表编码 -> 显示名
pub fn representative_name_map(
    representatives: &[Representative],
) -> HashMap<RepresentativeCode, String> {
    representatives
        .iter()
        .filter(|r| !r.name.trim().is_empty())
        .map(|r| (RepresentativeCode(r.code), r.name.trim().to_string()))
        .collect()
}

/// 两级查找, 任一环缺失返回 `None`
pub fn resolve_representative_name<'a>(
    code: Option<ClientCode>,
    client_to_rep: &HashMap<ClientCode, RepresentativeCode>,
    rep_names: &'a HashMap<RepresentativeCode, String>,
) -> Option<&'a str> {
    let rep = client_to_rep.get(&code?)?;
    rep_names.get(rep).map(String::as_str)
}
