//! Permission code mapping
//!
//! Raw permission codes are stored as integers (or integer strings). Only
//! three values are known; everything else maps to [`PermissionLevel::Unknown`].

use crate::overview::types::PermissionLevel;
use crate::repository::PropertyValue;

/// Read and write
pub const CODE_ALL: i64 = 63;
/// Read only
pub const CODE_READ: i64 = 8;
/// Deny
pub const CODE_NONE: i64 = 0;

impl PermissionLevel {
    /// Level for a numeric code
    pub const fn from_code(code: i64) -> Self {
        match code {
            CODE_ALL => PermissionLevel::All,
            CODE_READ => PermissionLevel::Read,
            CODE_NONE => PermissionLevel::None,
            _ => PermissionLevel::Unknown,
        }
    }
}

/// Level for a stored code, absent or non-numeric codes included
pub fn level_for(code: Option<&PropertyValue>) -> PermissionLevel {
    code.and_then(PropertyValue::as_i64)
        .map_or(PermissionLevel::Unknown, PermissionLevel::from_code)
}

/// Display label for a stored code
pub fn label_for(code: Option<&PropertyValue>) -> &'static str {
    level_for(code).label()
}
