//! Agreement data structures, agreement files and per-customer line item storage

mod data;
pub mod file;
pub mod store;

pub use data::{
    validate_line_items, AgreementContext, AgreementParams, BillingModel, LineItem, LineItemRecord,
};
pub use file::AgreementFile;
pub use store::{load_line_items_from_reader, write_line_items, CustomerStore, DEFAULT_STORE_DIR};
