//! Business services: code generation and email dispatch.

pub mod dispatch;
pub mod generator;

// Re-export commonly used types
pub use dispatch::{
    BatchReport, DefaultErrorClassifier, Disposition, DispositionCounts, EmailDispatcher,
    EmailDispatcherConfig, EmailServiceTrait, ErrorClassifier, FailureKind, WorkerPool,
    WorkerPoolConfig,
};
pub use generator::{CodeGeneratorConfig, CodeGeneratorService};
