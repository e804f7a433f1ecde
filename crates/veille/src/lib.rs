pub mod config;
pub mod console;
pub mod html;
pub mod server;
