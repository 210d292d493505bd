pub mod books;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod music;
pub mod shows;
pub mod ticket;
