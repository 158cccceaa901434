pub mod connect;
pub mod error;
pub mod mapping;
pub mod model;
pub mod mutate;
pub mod node;
pub mod tree;
pub mod types;
