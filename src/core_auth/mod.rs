pub mod core_auth;
pub mod helper;
pub mod store;

pub use store::CredentialStore;
