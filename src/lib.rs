pub mod db;

pub mod channels;
pub mod products;
pub mod reconciliation;

pub mod errors;
pub mod schema;
pub mod secrets;

pub use reconciliation::*;
