//! End-to-end statement import: raw CSV text in, Organizze payload out.

use organizze_core::{ImportOptions, normalize_statement};
use serde_json::json;

fn opts(skip_later: bool) -> ImportOptions {
    ImportOptions {
        target_date: "2026-04-15".to_string(),
        category_id: 56655796,
        credit_card_id: 402750,
        skip_later_installments: skip_later,
    }
}

#[test]
fn test_consolidated_installment_payload_shape() {
    let csv = "date,title,amount\n01/03/2026,\"Amazon - Parcela 2/4\",150.00\n";
    let batch = normalize_statement(csv, &opts(false));
    let doc = serde_json::to_value(&batch).unwrap();

    assert_eq!(
        doc,
        json!({
            "transactions": [{
                "description": "Amazon",
                "date": "2026-04-15",
                "amount_cents": -45000,
                "category_id": 56655796,
                "credit_card_id": 402750,
                "installments": true,
                "installments_attributes": { "total": 3, "periodicity": "monthly" }
            }]
        })
    );
}

#[test]
fn test_plain_charge_omits_plan_attributes() {
    let csv = "date,title,amount\n01/03/2026,Uber,13.47\n";
    let doc = serde_json::to_value(normalize_statement(csv, &opts(false))).unwrap();
    let txn = &doc["transactions"][0];
    assert_eq!(txn["amount_cents"], -1347);
    assert_eq!(txn["installments"], false);
    assert!(txn.get("installments_attributes").is_none());
}

#[test]
fn test_comma_and_semicolon_encodings_agree() {
    let comma = "date,title,amount\n\
                 01/03/2026,\"Magalu - Parcela 1/10\",99.90\n\
                 02/03/2026,Uber,13.47\n";
    let semi = "date;title;amount\n\
                01/03/2026;\"Magalu - Parcela 1/10\";99,90\n\
                02/03/2026;Uber;13,47\n";

    let a = normalize_statement(comma, &opts(false)).transactions;
    let b = normalize_statement(semi, &opts(false)).transactions;
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
}

#[test]
fn test_reimport_of_later_month_emits_nothing_for_series() {
    // A later month's statement: only fragments 2..n of the series are
    // present. With the filter on, none of them may re-enter the ledger.
    let csv = "date,title,amount\n\
               01/04/2026,\"Amazon - Parcela 3/4\",150.00\n\
               01/04/2026,\"Magalu - Parcela 2/10\",99.90\n";
    assert!(normalize_statement(csv, &opts(true)).transactions.is_empty());

    // Filter off: every fragment yields a row.
    assert_eq!(normalize_statement(csv, &opts(false)).transactions.len(), 2);
}

#[test]
fn test_payment_line_and_footer_do_not_disturb_neighbors() {
    let csv = "date,title,amount\n\
               01/03/2026,Pagamento recebido,-2500.00\n\
               02/03/2026,iFood,52.30\n\
               ,,Saldo total da fatura\n\
               03/03/2026,Farmacia,32.80\n";
    let txns = normalize_statement(csv, &opts(false)).transactions;
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[0].description, "iFood");
    assert_eq!(txns[1].description, "Farmacia");
}

#[test]
fn test_empty_statement_yields_empty_batch() {
    let csv = "date,title,amount\n01/03/2026,Pagamento recebido,-900.00\n";
    let batch = normalize_statement(csv, &opts(false));
    assert!(batch.transactions.is_empty());
    let doc = serde_json::to_value(&batch).unwrap();
    assert_eq!(doc, json!({ "transactions": [] }));
}

#[test]
fn test_output_order_follows_input_order() {
    let csv = "date,title,amount\n\
               01/03/2026,Primeiro,1.00\n\
               02/03/2026,Segundo,2.00\n\
               03/03/2026,Terceiro,3.00\n";
    let txns = normalize_statement(csv, &opts(false)).transactions;
    let names: Vec<_> = txns.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, vec!["Primeiro", "Segundo", "Terceiro"]);
}
