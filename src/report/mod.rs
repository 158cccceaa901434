pub mod export;
pub mod recommend;
