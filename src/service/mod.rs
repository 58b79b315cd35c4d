pub mod aggregator;
pub mod cache;
pub mod dashboard;
pub mod export;
pub mod ledger;
pub mod normalize;
pub mod representatives;
pub mod risk;

pub use aggregator::{index_separations, process_clients_data, SeparationIndex};
pub use cache::TtlCache;
pub use dashboard::{FinancialService, LedgerSnapshot, SnapshotCache};
pub use ledger::{TitleLedger, TitleTotals};
pub use normalize::normalize_client_code;
pub use risk::classify;
