pub mod audio;
pub mod feed;
mod llm;
mod pipeline;
mod server;
pub mod telegram;
pub mod tracing;

pub use llm::openai;
pub use llm::{summarizer::Summarizer, transcriber::Transcriber};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput, PipelineRunner};
pub use server::{builder::ServerBuilder, Server, ServerConfig};
