// Data-phase I/O: file streaming and directory listings
pub mod listing;
pub mod transfer;

pub use listing::{read_listing, ListEntry};
pub use transfer::{receive_file, send_file, send_listing};
