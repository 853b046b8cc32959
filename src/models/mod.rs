pub mod key;
pub mod operation;
pub mod user;
