//! Release-safety rules for the pseudon pipeline: the whitelist of allowed
//! attribute values, the quarantine rule engine, and the whitelist-driven
//! attribute filter.

pub mod attribute_filter;
pub mod quarantine;
pub mod whitelist;

pub use attribute_filter::filter_data_set;
pub use quarantine::{QuarantineReason, ScreeningConfig, check_data_set};
pub use whitelist::{AllowedValues, Whitelist, WhitelistError, normalize};
