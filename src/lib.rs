pub mod client;
pub mod entities;
pub mod feed;
pub mod utils;
