//! Stable error kinds for validation failures
//!
//! Codes are grouped by schema variant:
//! - Array 100s
//! - Boolean 200s
//! - Date 300s
//! - Integer 400s
//! - String 500s
//! - Decimal 600s
//!
//! Codes never change once published; new kinds take the next free code
//! in their group.

use std::fmt;

/// Kind of a validation failure, carrying a stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// Input is not an array or object
    ArrInvalid,
    /// Array keys are not the dense 0..n-1 index range
    ArrScalar,
    /// Two elements compare loosely equal
    ArrUnique,
    /// Fewer elements than required
    ArrMin,
    /// More elements than allowed
    ArrMax,

    /// Input is not a recognised boolean form
    BoolInvalid,

    /// Input does not strictly parse with the date format
    DateInvalid,
    /// Date is not strictly before the bound
    DateBefore,
    /// Date is not strictly after the bound
    DateAfter,

    /// Input is not an exact integer
    IntInvalid,
    /// Below the minimum
    IntMin,
    /// Above the maximum
    IntMax,
    /// Differs from the expected value
    IntEquals,
    /// Equals a forbidden value
    IntNotEquals,
    /// Not one of the allowed values
    IntOneOf,
    /// One of the forbidden values
    IntNotOneOf,

    /// Input cannot be coerced to a string
    StrInvalid,
    /// Shorter than the minimum length
    StrMin,
    /// Longer than the maximum length
    StrMax,
    /// Not one of the allowed values
    StrOneOf,
    /// One of the forbidden values
    StrNotOneOf,
    /// Not a valid email address
    StrEmail,
    /// Not a valid IP address
    StrIp,
    /// Not a valid URL
    StrUrl,
    /// URL scheme is not https
    StrUrlNotHttps,
    /// Does not match the pattern
    StrRegex,

    /// Input is not a plain decimal
    DecInvalid,
    /// Below the minimum
    DecMin,
    /// Above the maximum
    DecMax,
}

impl ErrorKind {
    /// Every kind, in code order.
    pub const ALL: [ErrorKind; 29] = [
        ErrorKind::ArrInvalid,
        ErrorKind::ArrScalar,
        ErrorKind::ArrUnique,
        ErrorKind::ArrMin,
        ErrorKind::ArrMax,
        ErrorKind::BoolInvalid,
        ErrorKind::DateInvalid,
        ErrorKind::DateBefore,
        ErrorKind::DateAfter,
        ErrorKind::IntInvalid,
        ErrorKind::IntMin,
        ErrorKind::IntMax,
        ErrorKind::IntEquals,
        ErrorKind::IntNotEquals,
        ErrorKind::IntOneOf,
        ErrorKind::IntNotOneOf,
        ErrorKind::StrInvalid,
        ErrorKind::StrMin,
        ErrorKind::StrMax,
        ErrorKind::StrOneOf,
        ErrorKind::StrNotOneOf,
        ErrorKind::StrEmail,
        ErrorKind::StrIp,
        ErrorKind::StrUrl,
        ErrorKind::StrUrlNotHttps,
        ErrorKind::StrRegex,
        ErrorKind::DecInvalid,
        ErrorKind::DecMin,
        ErrorKind::DecMax,
    ];

    /// Returns the stable numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorKind::ArrInvalid => 101,
            ErrorKind::ArrScalar => 102,
            ErrorKind::ArrUnique => 103,
            ErrorKind::ArrMin => 104,
            ErrorKind::ArrMax => 105,
            ErrorKind::BoolInvalid => 201,
            ErrorKind::DateInvalid => 301,
            ErrorKind::DateBefore => 302,
            ErrorKind::DateAfter => 303,
            ErrorKind::IntInvalid => 401,
            ErrorKind::IntMin => 402,
            ErrorKind::IntMax => 403,
            ErrorKind::IntEquals => 404,
            ErrorKind::IntNotEquals => 405,
            ErrorKind::IntOneOf => 406,
            ErrorKind::IntNotOneOf => 407,
            ErrorKind::StrInvalid => 501,
            ErrorKind::StrMin => 502,
            ErrorKind::StrMax => 503,
            ErrorKind::StrOneOf => 504,
            ErrorKind::StrNotOneOf => 505,
            ErrorKind::StrEmail => 506,
            ErrorKind::StrIp => 507,
            ErrorKind::StrUrl => 508,
            ErrorKind::StrUrlNotHttps => 509,
            ErrorKind::StrRegex => 510,
            ErrorKind::DecInvalid => 601,
            ErrorKind::DecMin => 602,
            ErrorKind::DecMax => 603,
        }
    }

    /// Looks up a kind by its numeric code
    pub fn from_code(code: u16) -> Option<ErrorKind> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }

    /// Returns the schema variant this kind belongs to
    pub fn variant(&self) -> &'static str {
        match self.code() / 100 {
            1 => "array",
            2 => "boolean",
            3 => "date",
            4 => "integer",
            5 => "string",
            _ => "decimal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
