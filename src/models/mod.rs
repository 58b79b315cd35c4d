pub mod client;
pub mod enriched;
pub mod representative;
pub mod separation;
pub mod title;

pub use client::{Client, ClientCode, ClientRow, ClientSettings, RawClientCode};
pub use enriched::{ClientReport, EnrichedClientRecord, PortfolioSummary, RiskLevel};
pub use representative::{OrderRow, Representative, RepresentativeCode, RepresentativeOrder};
pub use separation::{
    Separation, SeparationAction, SeparationItem, SeparationItemRow, SeparationRow,
    SeparationStatus,
};
pub use title::{Title, TitleRow};
