//! HTTP client for the Organizze REST API.
//!
//! Auth is HTTP basic (email + API token) and the API requires a
//! `User-Agent` identifying the calling app, `<name> (<email>)`.

use anyhow::{Context, Result, bail};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.organizze.com.br/rest/v2";

/// API credential triple. Built by the caller from its configuration;
/// never read from ambient environment here.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub token: String,
    /// App name sent in the User-Agent, per the API's terms.
    pub name: String,
}

pub struct Client {
    http: reqwest::Client,
    base_url: String,
    creds: Credentials,
}

/// Filters for `GET /transactions`. All optional; the API defaults to
/// the current month when no date range is given.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub credit_card_id: Option<i64>,
}

/// Bank account fields for create/update. On create, `name` and
/// `account_type` are required by the API; on update, unset fields are
/// left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `checking`, `savings` or `other`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// Credit card fields for create/update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreditCardParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// visa, mastercard, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// On update: re-open invoices since this date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_invoices_since: Option<String>,
}

impl TransactionQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.start_date {
            pairs.push(("start_date", v.clone()));
        }
        if let Some(v) = &self.end_date {
            pairs.push(("end_date", v.clone()));
        }
        if let Some(v) = self.account_id {
            pairs.push(("account_id", v.to_string()));
        }
        if let Some(v) = self.category_id {
            pairs.push(("category_id", v.to_string()));
        }
        if let Some(v) = self.credit_card_id {
            pairs.push(("credit_card_id", v.to_string()));
        }
        pairs
    }
}

impl Client {
    pub fn new(creds: Credentials) -> Self {
        Self::with_base_url(creds, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(creds: Credentials, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            creds,
        }
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .basic_auth(&self.creds.email, Some(&self.creds.token))
            .header(
                USER_AGENT,
                format!("{} ({})", self.creds.name, self.creds.email),
            )
            .header(CONTENT_TYPE, "application/json")
    }

    pub(crate) async fn execute(
        &self,
        req: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<Value> {
        let resp = req
            .send()
            .await
            .with_context(|| format!("{what} request"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("read {what} response"))?;
        if !status.is_success() {
            bail!("organizze {what}: {status} {body}");
        }
        if body.trim().is_empty() {
            // DELETE and invoice payment can come back with no body
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).with_context(|| format!("parse {what} response"))
    }

    async fn get(&self, path: &str, what: &str) -> Result<Value> {
        self.execute(self.request(Method::GET, path), what).await
    }

    // --- users ---

    pub async fn list_users(&self) -> Result<Value> {
        self.get("/users", "list users").await
    }

    pub async fn get_user(&self, id: i64) -> Result<Value> {
        self.get(&format!("/users/{id}"), "get user").await
    }

    // --- accounts ---

    pub async fn list_accounts(&self) -> Result<Value> {
        self.get("/accounts", "list accounts").await
    }

    pub async fn get_account(&self, id: i64) -> Result<Value> {
        self.get(&format!("/accounts/{id}"), "get account").await
    }

    pub async fn create_account(&self, params: &AccountParams) -> Result<Value> {
        let req = self.request(Method::POST, "/accounts").json(params);
        self.execute(req, "create account").await
    }

    pub async fn update_account(&self, id: i64, params: &AccountParams) -> Result<Value> {
        let req = self
            .request(Method::PUT, &format!("/accounts/{id}"))
            .json(params);
        self.execute(req, "update account").await
    }

    pub async fn delete_account(&self, id: i64) -> Result<Value> {
        self.execute(
            self.request(Method::DELETE, &format!("/accounts/{id}")),
            "delete account",
        )
        .await
    }

    // --- categories ---

    pub async fn list_categories(&self) -> Result<Value> {
        self.get("/categories", "list categories").await
    }

    pub async fn get_category(&self, id: i64) -> Result<Value> {
        self.get(&format!("/categories/{id}"), "get category").await
    }

    pub async fn create_category(&self, name: &str, parent_id: Option<i64>) -> Result<Value> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parent_id: Option<i64>,
        }
        let req = self
            .request(Method::POST, "/categories")
            .json(&Body { name, parent_id });
        self.execute(req, "create category").await
    }

    pub async fn update_category(&self, id: i64, name: &str) -> Result<Value> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
        }
        let req = self
            .request(Method::PUT, &format!("/categories/{id}"))
            .json(&Body { name });
        self.execute(req, "update category").await
    }

    /// Delete a category, reassigning its transactions to
    /// `replacement_id` when given.
    pub async fn delete_category(&self, id: i64, replacement_id: Option<i64>) -> Result<Value> {
        let mut req = self.request(Method::DELETE, &format!("/categories/{id}"));
        if let Some(replacement) = replacement_id {
            #[derive(Serialize)]
            struct Body {
                replacement_id: i64,
            }
            req = req.json(&Body {
                replacement_id: replacement,
            });
        }
        self.execute(req, "delete category").await
    }

    // --- credit cards ---

    pub async fn list_credit_cards(&self) -> Result<Value> {
        self.get("/credit_cards", "list credit cards").await
    }

    pub async fn get_credit_card(&self, id: i64) -> Result<Value> {
        self.get(&format!("/credit_cards/{id}"), "get credit card")
            .await
    }

    pub async fn create_credit_card(&self, params: &CreditCardParams) -> Result<Value> {
        let req = self.request(Method::POST, "/credit_cards").json(params);
        self.execute(req, "create credit card").await
    }

    pub async fn update_credit_card(&self, id: i64, params: &CreditCardParams) -> Result<Value> {
        let req = self
            .request(Method::PUT, &format!("/credit_cards/{id}"))
            .json(params);
        self.execute(req, "update credit card").await
    }

    pub async fn delete_credit_card(&self, id: i64) -> Result<Value> {
        self.execute(
            self.request(Method::DELETE, &format!("/credit_cards/{id}")),
            "delete credit card",
        )
        .await
    }

    pub async fn list_invoices(&self, credit_card_id: i64) -> Result<Value> {
        self.get(
            &format!("/credit_cards/{credit_card_id}/invoices"),
            "list invoices",
        )
        .await
    }

    pub async fn get_invoice(&self, credit_card_id: i64, id: i64) -> Result<Value> {
        self.get(
            &format!("/credit_cards/{credit_card_id}/invoices/{id}"),
            "get invoice",
        )
        .await
    }

    pub async fn pay_invoice(
        &self,
        credit_card_id: i64,
        id: i64,
        amount_cents: Option<i64>,
        date: Option<&str>,
        account_id: Option<i64>,
    ) -> Result<Value> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            amount_cents: Option<i64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            date: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            account_id: Option<i64>,
        }
        let req = self
            .request(
                Method::POST,
                &format!("/credit_cards/{credit_card_id}/invoices/{id}/payments"),
            )
            .json(&Body {
                amount_cents,
                date,
                account_id,
            });
        self.execute(req, "pay invoice").await
    }

    // --- budgets ---

    /// List budget targets; `/budgets`, `/budgets/{year}` or
    /// `/budgets/{year}/{month}` depending on what is given.
    pub async fn list_budgets(&self, year: Option<i32>, month: Option<u32>) -> Result<Value> {
        let path = match (year, month) {
            (Some(y), Some(m)) => format!("/budgets/{y}/{m}"),
            (Some(y), None) => format!("/budgets/{y}"),
            _ => "/budgets".to_string(),
        };
        self.get(&path, "list budgets").await
    }

    // --- transactions ---

    pub async fn list_transactions(&self, query: &TransactionQuery) -> Result<Value> {
        let req = self
            .request(Method::GET, "/transactions")
            .query(&query.to_pairs());
        self.execute(req, "list transactions").await
    }

    pub async fn get_transaction(&self, id: i64) -> Result<Value> {
        self.get(&format!("/transactions/{id}"), "get transaction")
            .await
    }

    /// Create one transaction. The payload is any serializable value in
    /// the API's transaction shape; `organizze-core`'s
    /// `NormalizedTransaction` serializes to exactly that.
    pub async fn create_transaction<T: Serialize>(&self, payload: &T) -> Result<Value> {
        let req = self.request(Method::POST, "/transactions").json(payload);
        self.execute(req, "create transaction").await
    }

    pub async fn update_transaction<T: Serialize>(&self, id: i64, payload: &T) -> Result<Value> {
        let req = self
            .request(Method::PUT, &format!("/transactions/{id}"))
            .json(payload);
        self.execute(req, "update transaction").await
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<Value> {
        self.execute(
            self.request(Method::DELETE, &format!("/transactions/{id}")),
            "delete transaction",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_only_include_set_filters() {
        let q = TransactionQuery {
            start_date: Some("2026-03-01".to_string()),
            credit_card_id: Some(402750),
            ..Default::default()
        };
        assert_eq!(
            q.to_pairs(),
            vec![
                ("start_date", "2026-03-01".to_string()),
                ("credit_card_id", "402750".to_string()),
            ]
        );
        assert!(TransactionQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn test_account_params_rename_type_and_omit_unset() {
        let params = AccountParams {
            name: Some("Conta Corrente".to_string()),
            account_type: Some("checking".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "name": "Conta Corrente", "type": "checking" })
        );
    }

    #[test]
    fn test_credit_card_params_omit_unset() {
        let params = CreditCardParams {
            name: Some("Nubank".to_string()),
            due_day: Some(15),
            closing_day: Some(8),
            limit_cents: Some(500_000),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({
                "name": "Nubank",
                "due_day": 15,
                "closing_day": 8,
                "limit_cents": 500000
            })
        );
    }
}
