use std::fmt;

use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    #[error("compiling {stage} shader of '{program}' failed:\n{log}")]
    Compile {
        program: &'static str,
        stage: ShaderStage,
        log: String,
    },
    #[error("linking '{program}' failed:\n{log}")]
    Link { program: &'static str, log: String },
}
