pub mod aws;
pub mod exit;
pub mod git;
pub mod os;
pub mod path;
pub mod session;
pub mod text;
pub mod time;

pub use aws::*;
pub use exit::*;
pub use git::*;
pub use os::*;
pub use path::*;
pub use session::*;
pub use text::*;
pub use time::*;

use crate::config::Properties;
use crate::env::Environment;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Identifies which writer implementation a segment binds to.
///
/// Unrecognized tags deserialize into `Unknown` instead of failing the whole
/// configuration parse; they are rejected later, when the segment is bound
/// against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SegmentType {
    Aws,
    Exit,
    Git,
    Os,
    Path,
    Session,
    Text,
    Time,
    Unknown(String),
}

impl SegmentType {
    /// The tag used in configuration files and template references.
    pub fn tag(&self) -> &str {
        match self {
            SegmentType::Aws => "aws",
            SegmentType::Exit => "exit",
            SegmentType::Git => "git",
            SegmentType::Os => "os",
            SegmentType::Path => "path",
            SegmentType::Session => "session",
            SegmentType::Text => "text",
            SegmentType::Time => "time",
            SegmentType::Unknown(tag) => tag,
        }
    }
}

impl From<String> for SegmentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "aws" => SegmentType::Aws,
            "exit" => SegmentType::Exit,
            "git" => SegmentType::Git,
            "os" => SegmentType::Os,
            "path" => SegmentType::Path,
            "session" => SegmentType::Session,
            "text" => SegmentType::Text,
            "time" => SegmentType::Time,
            _ => SegmentType::Unknown(value),
        }
    }
}

impl From<&str> for SegmentType {
    fn from(value: &str) -> Self {
        SegmentType::from(value.to_string())
    }
}

impl From<SegmentType> for String {
    fn from(value: SegmentType) -> Self {
        value.tag().to_string()
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A segment's data source.
///
/// Writers gather raw data from the environment and expose it as JSON for
/// the template layer; they never touch colors or composition. Binding a
/// writer is separate from populating it, so construction must stay cheap
/// and side-effect free.
pub trait SegmentWriter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Template used when the segment definition does not carry one.
    fn default_template(&self) -> &'static str;

    /// Gather this writer's data. Returns whether the segment produced
    /// content worth showing.
    fn populate(&mut self, properties: &Properties) -> Result<bool>;

    /// The fields this writer exposes to templates.
    fn template_data(&self) -> Value;
}

impl fmt::Debug for dyn SegmentWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentWriter")
            .field("name", &self.name())
            .finish()
    }
}

pub type WriterFactory = fn(Arc<dyn Environment>) -> Box<dyn SegmentWriter>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// The configuration named a type tag no writer is registered for.
    #[error("unknown segment type: {0}")]
    UnknownSegmentType(String),
}

/// Maps segment-type tags to writer constructors.
///
/// Built once at startup and passed explicitly wherever binding happens;
/// registering a factory for an existing tag replaces it, which is how
/// embedders swap in custom writers.
pub struct WriterRegistry {
    factories: HashMap<SegmentType, WriterFactory>,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with every built-in writer installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SegmentType::Aws, |env| Box::new(AwsWriter::new(env)));
        registry.register(SegmentType::Exit, |env| Box::new(ExitWriter::new(env)));
        registry.register(SegmentType::Git, |env| Box::new(GitWriter::new(env)));
        registry.register(SegmentType::Os, |env| Box::new(OsWriter::new(env)));
        registry.register(SegmentType::Path, |env| Box::new(PathWriter::new(env)));
        registry.register(SegmentType::Session, |env| Box::new(SessionWriter::new(env)));
        registry.register(SegmentType::Text, |env| Box::new(TextWriter::new(env)));
        registry.register(SegmentType::Time, |env| Box::new(TimeWriter::new(env)));
        registry
    }

    pub fn register(&mut self, kind: SegmentType, factory: WriterFactory) {
        self.factories.insert(kind, factory);
    }

    pub fn is_registered(&self, kind: &SegmentType) -> bool {
        self.factories.contains_key(kind)
    }

    /// Instantiate the writer for `kind` with its environment handle set.
    /// The writer is created, not populated.
    pub fn bind(
        &self,
        kind: &SegmentType,
        env: Arc<dyn Environment>,
    ) -> Result<Box<dyn SegmentWriter>, RegistryError> {
        match self.factories.get(kind) {
            Some(factory) => Ok(factory(env)),
            None => Err(RegistryError::UnknownSegmentType(kind.tag().to_string())),
        }
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
