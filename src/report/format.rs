//! Cell formatting shared by both report layouts.

use chrono::NaiveDateTime;

use accord_core::Label;

use crate::agreement::Coefficient;

pub(crate) const NAN: &str = "NaN";

/// Label text; an empty value is shown as `"empty"`.
pub(crate) fn label(label: &Label) -> String {
    match label {
        Label::Observed(v) if v.is_empty() => "\"empty\"".to_string(),
        other => other.to_string(),
    }
}

/// Four decimals; negative values print as `0` to set them apart from `0.0000`.
pub(crate) fn clamped(c: Coefficient) -> String {
    match c {
        Coefficient::Undefined => NAN.to_string(),
        Coefficient::Defined(v) if v.is_nan() => NAN.to_string(),
        Coefficient::Defined(v) if v < 0.0 => "0".to_string(),
        Coefficient::Defined(v) => format!("{v:.4}"),
    }
}

/// Four decimals, sign kept.
pub(crate) fn signed(c: Coefficient) -> String {
    match c {
        Coefficient::Defined(v) if !v.is_nan() => format!("{v:.4}"),
        _ => NAN.to_string(),
    }
}

/// The `Output created:` line and the blank line after it.
pub(crate) fn header(created: &NaiveDateTime) -> String {
    format!("Output created: {}\n\n", created.format("%m/%d/%y %H:%M:%S"))
}

/// The files-involved line.
pub(crate) fn files_line(current_document: bool, file_count: usize) -> String {
    if current_document {
        "Number of files involved: 1 (current transcription)\n".to_string()
    } else {
        format!("Number of files involved: {file_count}\n")
    }
}
