//! Request/response data model
//!
//! All user input is validated against a resolved table layout when
//! building these types. Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod value;
pub mod record;
pub mod key;

pub use validation::ValidationError;
pub use value::{parse_timestamp, Value, TIMESTAMP_FORMAT};
pub use record::Record;
pub use key::NaturalKey;
