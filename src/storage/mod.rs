pub mod julian;
pub mod schema;
