use std::{fmt::Debug, future::Future};

pub trait Summarizer {
    type Error: Debug;

    fn summarize(
        &self,
        transcript: &str,
        model: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
