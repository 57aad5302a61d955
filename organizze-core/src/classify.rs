//! Classify statement lines: plain charge vs installment fragment.

use regex::Regex;
use std::sync::OnceLock;

use crate::statement::RawRecord;

/// A statement line after classification. Consolidation downstream
/// matches on this closed set instead of re-deriving fields from the
/// title text.
#[derive(Debug, Clone, PartialEq)]
pub enum LineItem {
    Charge {
        title: String,
        amount: f64,
    },
    /// One month's slice of a multi-month purchase, e.g.
    /// `"Magalu - Parcela 2/10"`.
    Installment {
        base_title: String,
        /// 1-based position of this fragment within the plan.
        index: u32,
        total: u32,
        /// Per-installment amount as printed on this line, NOT the
        /// purchase total.
        amount: f64,
    },
}

fn installment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?P<base>.*?)\s*-\s*parcela\s+(?P<index>\d+)\s*/\s*(?P<total>\d+)")
            .expect("invalid installment regex")
    })
}

/// Classify one raw record.
///
/// A `Parcela k/n` marker only produces the installment variant when
/// `1 <= k <= n`; anything else (a zero index, k past the end) is not a
/// plan we can project forward, so the line falls back to a plain charge
/// with its full title.
pub fn classify(record: &RawRecord) -> LineItem {
    if let Some(caps) = installment_re().captures(&record.title) {
        let index: u32 = caps["index"].parse().unwrap_or(0);
        let total: u32 = caps["total"].parse().unwrap_or(0);
        if index >= 1 && index <= total {
            return LineItem::Installment {
                base_title: caps["base"].trim().to_string(),
                index,
                total,
                amount: record.amount,
            };
        }
    }

    LineItem::Charge {
        title: record.title.clone(),
        amount: record.amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str, amount: f64) -> RawRecord {
        RawRecord {
            date: "01/03/2026".to_string(),
            title: title.to_string(),
            amount,
        }
    }

    #[test]
    fn test_plain_charge() {
        let item = classify(&rec("Padaria da Esquina", 25.90));
        assert_eq!(
            item,
            LineItem::Charge {
                title: "Padaria da Esquina".to_string(),
                amount: 25.90
            }
        );
    }

    #[test]
    fn test_installment_fragment() {
        let item = classify(&rec("Magalu - Parcela 2/10", 99.90));
        assert_eq!(
            item,
            LineItem::Installment {
                base_title: "Magalu".to_string(),
                index: 2,
                total: 10,
                amount: 99.90
            }
        );
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        match classify(&rec("Loja X - PARCELA 1/3", 50.0)) {
            LineItem::Installment { index, total, .. } => {
                assert_eq!((index, total), (1, 3));
            }
            other => panic!("expected installment, got {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_around_hyphen_tolerated() {
        match classify(&rec("Loja Y  -  Parcela 3/6", 20.0)) {
            LineItem::Installment { base_title, .. } => {
                assert_eq!(base_title, "Loja Y");
            }
            other => panic!("expected installment, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_index_falls_back_to_charge() {
        // k > n and k = 0 are not projectable plans
        assert!(matches!(
            classify(&rec("Loja Z - Parcela 5/4", 10.0)),
            LineItem::Charge { .. }
        ));
        assert!(matches!(
            classify(&rec("Loja Z - Parcela 0/4", 10.0)),
            LineItem::Charge { .. }
        ));
    }

    #[test]
    fn test_hyphen_without_marker_is_charge() {
        assert!(matches!(
            classify(&rec("Pão - de - Açúcar", 88.0)),
            LineItem::Charge { .. }
        ));
    }
}
