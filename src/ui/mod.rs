pub mod banner;
pub mod icons;

pub use banner::{BIN, print_copy_report, print_failure, print_help, print_usage};
