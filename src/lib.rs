pub mod error;
pub mod fetch;
pub mod mode;
pub mod output;
pub mod process;
pub mod routes;
