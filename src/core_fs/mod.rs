// Path confinement under the server root
pub mod resolver;

pub use resolver::{confirm_within_root, resolve_path};
