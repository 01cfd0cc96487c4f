pub mod config;
pub mod engines;
pub mod error;
pub mod server;
pub mod value;

pub use config::{ConfigError, ServerConfig};
pub use engines::{KvsEngine, MemoryStore};
pub use error::{KvsError, Result};
pub use server::KvServer;
pub use value::Value;
