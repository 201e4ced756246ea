mod config;
mod connection;
mod identity;
