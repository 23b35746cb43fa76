pub mod config;
pub mod display;
pub mod error;
pub mod library;
pub mod lotto;
pub mod lotto_picture;
pub mod scorer;
pub mod storage;
pub mod store;
pub mod upload;
