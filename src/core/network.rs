//! Network-operator labels derived from mobile network codes
//!
//! Indian operator MNC blocks. Codes outside the known blocks fall back to
//! a generic tower label so the report always carries something displayable.

/// Human-readable operator label for a mobile network code
pub fn operator_label(mnc: u16) -> String {
    match mnc {
        6 | 86 | 89 | 857 | 863 => "Jio 4G".to_string(),
        10 | 31 | 40 | 45 | 49 | 70 | 92 | 93 | 94 | 95 | 96 | 97 | 98 => "Airtel".to_string(),
        11 | 20 | 84 | 88 => "Vi (Vodafone-Idea)".to_string(),
        53 | 54 | 55 | 56 | 57 | 58 | 59 | 64 | 66 | 71 | 72 | 73 | 74 | 75 | 76 | 80 => {
            "BSNL".to_string()
        }
        1 | 3 => "MTNL".to_string(),
        other => format!("Tower {}", other),
    }
}
