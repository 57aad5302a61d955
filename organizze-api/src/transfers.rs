//! Transfers between bank accounts.

use anyhow::Result;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::client::Client;

#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub name: String,
}

/// Payload for `POST /transfers`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransfer {
    /// Destination account.
    pub credit_account_id: i64,
    /// Source account.
    pub debit_account_id: i64,
    pub amount_cents: i64,
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

/// Fields a transfer accepts on update; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransferPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Client {
    pub async fn list_transfers(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Value> {
        let mut pairs = Vec::new();
        if let Some(v) = start_date {
            pairs.push(("start_date", v));
        }
        if let Some(v) = end_date {
            pairs.push(("end_date", v));
        }
        let req = self.request(Method::GET, "/transfers").query(&pairs);
        self.execute(req, "list transfers").await
    }

    pub async fn get_transfer(&self, id: i64) -> Result<Value> {
        self.execute(
            self.request(Method::GET, &format!("/transfers/{id}")),
            "get transfer",
        )
        .await
    }

    pub async fn create_transfer(&self, transfer: &NewTransfer) -> Result<Value> {
        let req = self.request(Method::POST, "/transfers").json(transfer);
        self.execute(req, "create transfer").await
    }

    pub async fn update_transfer(&self, id: i64, patch: &TransferPatch) -> Result<Value> {
        let req = self
            .request(Method::PUT, &format!("/transfers/{id}"))
            .json(patch);
        self.execute(req, "update transfer").await
    }

    pub async fn delete_transfer(&self, id: i64) -> Result<Value> {
        self.execute(
            self.request(Method::DELETE, &format!("/transfers/{id}")),
            "delete transfer",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_transfer_serialization_omits_unset_fields() {
        let t = NewTransfer {
            credit_account_id: 111,
            debit_account_id: 222,
            amount_cents: 50000,
            date: "2026-04-15".to_string(),
            description: None,
            paid: Some(true),
            notes: None,
            tags: None,
        };
        assert_eq!(
            serde_json::to_value(&t).unwrap(),
            json!({
                "credit_account_id": 111,
                "debit_account_id": 222,
                "amount_cents": 50000,
                "date": "2026-04-15",
                "paid": true
            })
        );
    }

    #[test]
    fn test_transfer_patch_carries_tags() {
        let patch = TransferPatch {
            description: Some("Reserva".to_string()),
            tags: Some(vec![Tag {
                name: "mensal".to_string(),
            }]),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({
                "description": "Reserva",
                "tags": [{ "name": "mensal" }]
            })
        );
    }
}
