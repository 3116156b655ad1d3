pub mod autoload;
pub mod config;
pub mod debug;
pub mod error;
pub mod host;
pub mod loader;
pub mod registry;

pub use autoload::{Autoloader, Candidate, candidates};
pub use config::{AutoloadConfig, DEFAULT_EXTENSION, PathRegistration, ProbeMode};
pub use error::{AutoloadError, LoadError};
pub use host::{AutoloadHandle, ClassResolver, FnResolver, HookOptions, ResolverChain};
pub use loader::{MemoryLoader, ScriptLoader, SourceLoader};
pub use registry::{DEFAULT_PRIORITY, PathEntry, PathKey, PathList, Registry};
