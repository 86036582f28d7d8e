use thiserror::Error;

pub mod account;
pub mod patch;
pub mod record;
pub mod store;

pub use account::{AccountStore, DEFAULT_ACCOUNT_KEYS};
pub use patch::{patch_record, FieldPatch};
pub use record::{get_field, set_field, CharField, FieldDescriptor, CHAR_FIELDS};
pub use store::RecordStore;

#[derive(Debug, Error)]
pub enum MaintError {
    #[error("record not found for key `{0}`")]
    NotFound(String),
    #[error(
        "field `{field}` at offset {offset:#x} ({width} bytes) lies outside the {len}-byte record"
    )]
    OutOfRange {
        field: &'static str,
        offset: usize,
        width: usize,
        len: usize,
    },
    #[error("value {value} does not fit in the {width}-byte field `{field}`")]
    ValueOutOfBounds {
        field: &'static str,
        width: usize,
        value: u64,
    },
    #[error("no row was updated for key `{0}`")]
    StoreWrite(String),
    #[error("account `{0}` already exists")]
    AccountExists(String),
    #[error("corrupt credentials stored for account `{0}`")]
    BadCredentials(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, MaintError>;
