// ==========================================
// Exam Center - i18n
// ==========================================
// rust-i18n, Turkish (default) and English
// The rust_i18n::i18n! macro is invoked in lib.rs
// ==========================================

use crate::domain::types::{CapacityStatus, DistributionStatus};

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switch language ("tr" or "en")
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Translate a key
///
/// # Example
/// ```no_run
/// use exam_center::i18n::t;
/// let msg = t("distribution.valid");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate a key and fill `%{name}` placeholders
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// "50 öğrenci yerleştirildi" style summary of a save
pub fn placement_saved_message(count: usize) -> String {
    t_with_args("placement.saved", &[("count", &count.to_string())])
}

/// "1 fazla" / "3 eksik" style indicator of a distribution
pub fn distribution_message(status: &DistributionStatus) -> String {
    match status {
        DistributionStatus::Valid => t("distribution.valid"),
        DistributionStatus::Shortfall { missing } => {
            t_with_args("distribution.shortfall", &[("count", &missing.to_string())])
        }
        DistributionStatus::Surplus { extra } => {
            t_with_args("distribution.surplus", &[("count", &extra.to_string())])
        }
    }
}

/// Capacity indicator of a work item
pub fn capacity_message(status: &CapacityStatus, has_halls: bool) -> String {
    if !has_halls {
        return t("capacity.none");
    }
    match status {
        CapacityStatus::Sufficient { spare } => {
            t_with_args("capacity.sufficient", &[("count", &spare.to_string())])
        }
        CapacityStatus::Insufficient { shortfall } => {
            t_with_args("capacity.insufficient", &[("count", &shortfall.to_string())])
        }
    }
}
