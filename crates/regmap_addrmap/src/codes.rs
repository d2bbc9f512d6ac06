//! Diagnostic codes and helper functions for address-map guard findings.
//!
//! Error codes `E301`--`E305` cover conditions that make the address map
//! unsafe to generate from. Warning code `W301` covers advisory parameter
//! range violations.

use regmap_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Two register-set instances' address ranges intersect.
pub const E301: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 301,
};

/// A repeated instance's replica spacing is smaller than its addressed
/// space.
pub const E302: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 302,
};

/// A register's absolute address is not aligned to its width.
pub const E303: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 303,
};

/// Two registers flatten to the same absolute address.
pub const E304: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 304,
};

/// A parameterized quantity failed to resolve.
pub const E305: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 305,
};

/// A parameter value lies outside its declared range.
pub const W301: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 301,
};

/// Creates a diagnostic for overlapping address spans.
pub fn error_overlap(
    first: &str,
    first_range: (u64, u64),
    second: &str,
    second_range: (u64, u64),
) -> Diagnostic {
    Diagnostic::error(
        E301,
        format!(
            "address ranges overlap: {first} [0x{:x}, 0x{:x}) and {second} [0x{:x}, 0x{:x})",
            first_range.0, first_range.1, second_range.0, second_range.1
        ),
    )
    .with_origin(first)
    .with_help("adjust instance offsets so the ranges are disjoint")
}

/// Creates a diagnostic for a replica spacing smaller than the addressed
/// space.
pub fn error_repeat_spacing(path: &str, repeat_offset: u64, address_size: u64) -> Diagnostic {
    Diagnostic::error(
        E302,
        format!(
            "replica spacing 0x{repeat_offset:x} is smaller than the addressed space 0x{address_size:x}"
        ),
    )
    .with_origin(path)
    .with_note("repeated instances must be spaced at least as far apart as the address space each replica uses")
}

/// Creates a diagnostic for a misaligned register address.
pub fn error_misaligned(path: &str, token: &str, address: u64, width: u32) -> Diagnostic {
    Diagnostic::error(
        E303,
        format!("register '{token}' at 0x{address:x} is not aligned to its {width}-bit width"),
    )
    .with_origin(path)
}

/// Creates a diagnostic for two registers at the same absolute address.
pub fn error_duplicate_address(first: &str, second: &str, address: u64) -> Diagnostic {
    Diagnostic::error(
        E304,
        format!("registers {first} and {second} share absolute address 0x{address:x}"),
    )
    .with_origin(first)
}

/// Creates a diagnostic for an unresolvable parameterized quantity.
pub fn error_unresolved(path: &str, detail: &str) -> Diagnostic {
    Diagnostic::error(E305, format!("cannot resolve parameter: {detail}"))
        .with_origin(path)
        .with_help("check that the referenced parameter is defined by the project")
}

/// Creates a warning for a parameter value outside its declared range.
pub fn warn_out_of_range(name: &str, value: u64, min_val: u64, max_val: u64) -> Diagnostic {
    Diagnostic::warning(
        W301,
        format!(
            "parameter '{name}' value {value} lies outside its range [{min_val}, {max_val}]"
        ),
    )
}
