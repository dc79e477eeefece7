use thiserror::Error;

/// Which shader stage failed to compile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        })
    }
}

/// Failure of the compile/link contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShaderError {
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: StageKind, log: String },
    #[error("failed to link program:\n{log}")]
    Link { log: String },
}
