pub mod address_field;
pub mod field_error;
pub mod step_header;
pub mod summary;
