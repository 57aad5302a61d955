//! organizze-core: Nubank statement normalizer — CSV parsing, installment
//! classification, remaining-balance consolidation.

pub mod classify;
pub mod normalize;
pub mod statement;

pub use classify::{LineItem, classify};
pub use normalize::{
    ImportBatch, ImportOptions, InstallmentPlan, NormalizedTransaction, normalize_record,
    normalize_statement,
};
pub use statement::{RawRecord, parse_statement};
