pub mod aead;
pub mod digest;
