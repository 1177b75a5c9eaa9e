use std::{fmt::Debug, future::Future, path::Path};

pub trait Transcriber {
    type Error: Debug;

    fn transcribe(
        &self,
        audio_path: &Path,
        model: &str,
        language: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
