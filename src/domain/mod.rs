pub mod entity;
pub mod error;
pub mod page;
pub mod value;
