mod error;
mod logger;
