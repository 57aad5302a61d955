//! Consolidate classified statement lines into Organizze transaction
//! payloads.
//!
//! An installment fragment is not imported as-is: the line for month k of
//! an n-month purchase is replaced by one forward-looking transaction
//! carrying what is still owed (per-installment amount × remaining
//! months) and a plan of `n - k + 1` monthly installments. The ledger
//! then owns the future months, so later statements' fragments of the
//! same purchase can be dropped on re-import.

use serde::Serialize;

use crate::classify::{LineItem, classify};
use crate::statement::{RawRecord, parse_statement};

/// Run-level settings for one import. Category and card ids are fixed
/// constants supplied by configuration; the core never validates them.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Posting date (`YYYY-MM-DD`) stamped on every emitted transaction.
    pub target_date: String,
    pub category_id: i64,
    pub credit_card_id: i64,
    /// Drop installment fragments with index > 1. Used when re-importing
    /// a later month of a statement series whose first month already
    /// created the plans; assumes index 1 was imported exactly once
    /// before.
    pub skip_later_installments: bool,
}

/// Installment plan sub-object of the transaction payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentPlan {
    /// Remaining installments, counted from the target date.
    pub total: u32,
    pub periodicity: &'static str,
}

/// Transaction-creation payload, shaped exactly as the Organizze
/// `POST /transactions` endpoint expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTransaction {
    pub description: String,
    pub date: String,
    /// Negative for expenses, positive for credits/refunds — the inverse
    /// of the statement's convention.
    pub amount_cents: i64,
    pub category_id: i64,
    pub credit_card_id: i64,
    pub installments: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments_attributes: Option<InstallmentPlan>,
}

/// Output document: `{ "transactions": [...] }`.
#[derive(Debug, Clone, Serialize)]
pub struct ImportBatch {
    pub transactions: Vec<NormalizedTransaction>,
}

/// Invert sign and scale to integer cents, rounding half away from zero.
fn to_amount_cents(amount: f64) -> i64 {
    (amount * -100.0).round() as i64
}

/// Normalize one record, or drop it.
///
/// Dropped: payment-received credit lines (the statement's own
/// full-balance payment, not a trackable expense), and later-indexed
/// installment fragments when `skip_later_installments` is on.
pub fn normalize_record(record: &RawRecord, opts: &ImportOptions) -> Option<NormalizedTransaction> {
    if record.title.to_lowercase().contains("pagamento recebido") {
        return None;
    }

    match classify(record) {
        LineItem::Charge { title, amount } => Some(NormalizedTransaction {
            description: title,
            date: opts.target_date.clone(),
            amount_cents: to_amount_cents(amount),
            category_id: opts.category_id,
            credit_card_id: opts.credit_card_id,
            installments: false,
            installments_attributes: None,
        }),
        LineItem::Installment {
            base_title,
            index,
            total,
            amount,
        } => {
            if opts.skip_later_installments && index > 1 {
                return None;
            }
            let remaining = total - index + 1;
            Some(NormalizedTransaction {
                description: base_title,
                date: opts.target_date.clone(),
                amount_cents: to_amount_cents(amount * remaining as f64),
                category_id: opts.category_id,
                credit_card_id: opts.credit_card_id,
                installments: true,
                installments_attributes: Some(InstallmentPlan {
                    total: remaining,
                    periodicity: "monthly",
                }),
            })
        }
    }
}

/// Parse and normalize a whole statement. Output order follows input
/// order; an empty batch is a valid result.
pub fn normalize_statement(text: &str, opts: &ImportOptions) -> ImportBatch {
    let transactions = parse_statement(text)
        .iter()
        .filter_map(|r| normalize_record(r, opts))
        .collect();
    ImportBatch { transactions }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(skip_later: bool) -> ImportOptions {
        ImportOptions {
            target_date: "2026-04-15".to_string(),
            category_id: 56655796,
            credit_card_id: 402750,
            skip_later_installments: skip_later,
        }
    }

    fn rec(title: &str, amount: f64) -> RawRecord {
        RawRecord {
            date: "01/03/2026".to_string(),
            title: title.to_string(),
            amount,
        }
    }

    #[test]
    fn test_plain_charge_sign_inversion() {
        let t = normalize_record(&rec("Uber", 13.47), &opts(false)).unwrap();
        assert_eq!(t.description, "Uber");
        assert_eq!(t.amount_cents, -1347);
        assert!(!t.installments);
        assert!(t.installments_attributes.is_none());
    }

    #[test]
    fn test_refund_becomes_positive() {
        let t = normalize_record(&rec("Estorno compra", -80.00), &opts(false)).unwrap();
        assert_eq!(t.amount_cents, 8000);
    }

    #[test]
    fn test_installment_remaining_balance() {
        // 150.00/month, 2 of 4 paid out of this statement: 3 months left.
        let t = normalize_record(&rec("Amazon - Parcela 2/4", 150.00), &opts(false)).unwrap();
        assert_eq!(t.description, "Amazon");
        assert_eq!(t.date, "2026-04-15");
        assert_eq!(t.amount_cents, -45000);
        assert!(t.installments);
        assert_eq!(
            t.installments_attributes,
            Some(InstallmentPlan {
                total: 3,
                periodicity: "monthly"
            })
        );
    }

    #[test]
    fn test_first_installment_keeps_full_plan() {
        let t = normalize_record(&rec("Magalu - Parcela 1/10", 99.90), &opts(true)).unwrap();
        assert_eq!(t.amount_cents, -99900);
        assert_eq!(t.installments_attributes.as_ref().unwrap().total, 10);
    }

    #[test]
    fn test_skip_later_installments_filter() {
        let r = rec("Magalu - Parcela 2/10", 99.90);
        assert!(normalize_record(&r, &opts(true)).is_none());
        assert!(normalize_record(&r, &opts(false)).is_some());
    }

    #[test]
    fn test_payment_received_excluded() {
        assert!(normalize_record(&rec("Pagamento recebido", -1234.56), &opts(false)).is_none());
        assert!(normalize_record(&rec("PAGAMENTO RECEBIDO", -10.00), &opts(false)).is_none());
        // even if it carries an installment marker
        assert!(
            normalize_record(&rec("Pagamento recebido - Parcela 1/2", 5.0), &opts(false)).is_none()
        );
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 0.125 and 12.5 are exact in binary; the tie must round away
        // from zero: -12.5 -> -13.
        let t = normalize_record(&rec("Taxa", 0.125), &opts(false)).unwrap();
        assert_eq!(t.amount_cents, -13);
        // and on the credit side: 12.5 -> 13
        let t = normalize_record(&rec("Ajuste", -0.125), &opts(false)).unwrap();
        assert_eq!(t.amount_cents, 13);
    }
}
