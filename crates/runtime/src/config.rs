//! Runtime configuration
//!
//! Limits, project layout conventions and host-provided builtins. Hosts build
//! a config in code with the `with_*` methods or read one from TOML:
//!
//! ```toml
//! stack_limit = 512
//! project_dir = "src"
//! runtime_file = "main.pith"
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use pith_runtime::{Runtime, RuntimeConfig};
//!
//! fn beep(rt: &mut Runtime) -> Result<(), String> {
//!     rt.push(Value::from("beep"))
//! }
//!
//! let config = RuntimeConfig::new()
//!     .with_stack_limit(512)
//!     .with_builtin("beep", beep);
//! let mut rt = Runtime::with_config(config);
//! ```

use crate::runtime::Runtime;
use pith_core::DEFAULT_STACK_LIMIT;
use serde::Deserialize;
use std::fmt;

/// Maximum number of tokens in one loaded source unit
pub const DEFAULT_TOKEN_LIMIT: usize = 4096;

/// Signature shared by every builtin word
pub type BuiltinFn = fn(&mut Runtime) -> Result<(), String>;

/// A builtin word supplied by the host
#[derive(Clone)]
pub struct ExternalBuiltin {
    /// The name used in Pith code (e.g. "beep")
    pub name: String,

    /// Implementation, called exactly like a library builtin
    pub func: BuiltinFn,
}

impl ExternalBuiltin {
    pub fn new(name: impl Into<String>, func: BuiltinFn) -> Self {
        ExternalBuiltin {
            name: name.into(),
            func,
        }
    }
}

impl fmt::Debug for ExternalBuiltin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalBuiltin").field("name", &self.name).finish()
    }
}

/// Configuration for a [`Runtime`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Operand stack depth before "Stack overflow"
    pub stack_limit: usize,

    /// Tokens per loaded source unit before "Too many tokens"
    pub token_limit: usize,

    /// Source file extension, without the dot
    pub extension: String,

    /// Directory inside a project that holds the runtime file
    pub project_dir: String,

    /// Entry file loaded from `project_dir`
    pub runtime_file: String,

    /// Verbose tracing of loads and lifecycle phases
    pub debug: bool,

    /// Host builtins, registered after the library table
    ///
    /// A host builtin with the same name as a library word replaces it.
    #[serde(skip)]
    pub builtins: Vec<ExternalBuiltin>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            stack_limit: DEFAULT_STACK_LIMIT,
            token_limit: DEFAULT_TOKEN_LIMIT,
            extension: "pith".to_string(),
            project_dir: "pith".to_string(),
            runtime_file: "runtime.pith".to_string(),
            debug: false,
            builtins: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        RuntimeConfig::default()
    }

    /// Parse a TOML document; every key is optional
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse runtime config: {}", e))
    }

    pub fn with_stack_limit(mut self, limit: usize) -> Self {
        self.stack_limit = limit;
        self
    }

    pub fn with_token_limit(mut self, limit: usize) -> Self {
        self.token_limit = limit;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_project_dir(mut self, dir: impl Into<String>) -> Self {
        self.project_dir = dir.into();
        self
    }

    pub fn with_runtime_file(mut self, file: impl Into<String>) -> Self {
        self.runtime_file = file.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Add a host builtin (builder pattern)
    pub fn with_builtin(mut self, name: impl Into<String>, func: BuiltinFn) -> Self {
        self.builtins.push(ExternalBuiltin::new(name, func));
        self
    }

    /// Names of all host builtins
    pub fn builtin_names(&self) -> Vec<&str> {
        self.builtins.iter().map(|b| b.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nop(_rt: &mut Runtime) -> Result<(), String> {
        Ok(())
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.stack_limit, 256);
        assert_eq!(config.token_limit, 4096);
        assert_eq!(config.extension, "pith");
        assert_eq!(config.project_dir, "pith");
        assert_eq!(config.runtime_file, "runtime.pith");
        assert!(!config.debug);
    }

    #[test]
    fn test_config_builder() {
        let config = RuntimeConfig::new()
            .with_stack_limit(16)
            .with_token_limit(100)
            .with_debug(true)
            .with_builtin("nop-a", nop)
            .with_builtin("nop-b", nop);
        assert_eq!(config.stack_limit, 16);
        assert_eq!(config.token_limit, 100);
        assert!(config.debug);
        assert_eq!(config.builtin_names(), vec!["nop-a", "nop-b"]);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = RuntimeConfig::from_toml(
            r#"
stack_limit = 512
runtime_file = "main.pith"
"#,
        )
        .unwrap();
        assert_eq!(config.stack_limit, 512);
        assert_eq!(config.runtime_file, "main.pith");
        assert_eq!(config.project_dir, "pith");
    }

    #[test]
    fn test_from_toml_empty() {
        let config = RuntimeConfig::from_toml("").unwrap();
        assert_eq!(config.stack_limit, DEFAULT_STACK_LIMIT);
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let err = RuntimeConfig::from_toml("stack_size = 3").unwrap_err();
        assert!(err.starts_with("Failed to parse runtime config"));
    }

    #[test]
    fn test_from_toml_rejects_wrong_type() {
        assert!(RuntimeConfig::from_toml("debug = \"yes\"").is_err());
    }
}
