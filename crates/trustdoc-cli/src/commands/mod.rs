//! Command implementations.

pub mod config;
pub mod process;
pub mod resolve;
pub mod template;

pub use self::config::execute_config;
pub use self::process::execute_process;
pub use self::resolve::{execute_citations, execute_resolve};
pub use self::template::execute_template;
