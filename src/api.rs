pub mod catalog;
mod client;
