//! Core data model for the pseudon DICOM pseudonymization tools: data element
//! tags, value representations, data element values, data sets, and the
//! shared error reporting trait.

pub mod data_element_tag;
pub mod data_element_value;
pub mod data_error;
pub mod data_set;
pub mod dictionary;
pub mod error;
pub mod value_representation;

pub use data_element_tag::DataElementTag;
pub use data_element_value::{DataElementValue, ValueData};
pub use data_error::DataError;
pub use data_set::DataSet;
pub use error::{PseudonError, print_error_lines};
pub use value_representation::ValueRepresentation;
