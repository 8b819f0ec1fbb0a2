//! Fixed pipeline defaults.

/// Country calling code prefixed to bare 10-digit mobile numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Calling-code digits recognized at the front of 12-digit numbers.
pub const COUNTRY_CALLING_DIGITS: &str = "91";

/// City assigned when the location cell is blank.
pub const DEFAULT_CITY: &str = "Bangalore";

/// Hard cap on data rows kept from an uploaded file.
pub const MAX_UPLOAD_ROWS: usize = 500;

/// Length of generated employee passwords.
pub const PASSWORD_LENGTH: usize = 12;

/// Symbols allowed in generated passwords.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

/// Default cap on the serialized submission payload (1 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;
