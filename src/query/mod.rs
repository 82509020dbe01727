pub mod bounds;
pub mod builder;
pub mod request;
pub mod reshape;
pub mod rows;
