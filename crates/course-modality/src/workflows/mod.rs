pub mod applications;
pub mod faculty;
mod http;
pub mod records;
