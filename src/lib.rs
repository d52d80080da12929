pub mod compose;
pub mod config;
pub mod errors;
pub mod init;
pub mod logging;
pub mod router;
pub mod routes;
pub mod runner;
pub mod templates;
pub mod ui;
pub mod util;
