//! Evidence-type vocabulary for ledger lines.
//!
//! Codes are what the API persists; labels are what operators type into
//! sheets. The table is closed: a non-empty label outside it is a
//! row-level error, never a passthrough.

/// (label, code) pairs, in the order the ERP presents them.
pub const EVIDENCE_TYPES: &[(&str, &str)] = &[
    ("증빙없음", "0"),
    ("세금계산서", "1"),
    ("계산서(면세)", "2"),
    ("신용/체크카드 매출전표", "3"),
    ("현금영수증", "4"),
    ("원천징수영수증/지급명세서", "5"),
    ("지로용지 및 청구서", "6"),
];

pub fn code_for_label(label: &str) -> Option<&'static str> {
    EVIDENCE_TYPES.iter().find(|(l, _)| *l == label).map(|(_, c)| *c)
}

pub fn label_for_code(code: &str) -> Option<&'static str> {
    EVIDENCE_TYPES.iter().find(|(_, c)| *c == code).map(|(l, _)| *l)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_for_label() {
        assert_eq!(code_for_label("세금계산서"), Some("1"));
        assert_eq!(code_for_label("지로용지 및 청구서"), Some("6"));
        assert_eq!(code_for_label("알수없음"), None);
        assert_eq!(code_for_label(""), None);
    }

    #[test]
    fn test_label_for_code() {
        assert_eq!(label_for_code("0"), Some("증빙없음"));
        assert_eq!(label_for_code("4"), Some("현금영수증"));
        assert_eq!(label_for_code("7"), None);
    }
}
