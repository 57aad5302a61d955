//! organizze-api: async client for the Organizze REST API (v2).

pub mod bulk;
pub mod client;
pub mod transfers;

pub use bulk::{BulkFailure, BulkSummary};
pub use client::{
    AccountParams, Client, CreditCardParams, Credentials, DEFAULT_BASE_URL, TransactionQuery,
};
pub use transfers::{NewTransfer, Tag, TransferPatch};
