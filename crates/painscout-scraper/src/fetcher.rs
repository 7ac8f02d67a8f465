use std::future::Future;

use painscout_core::PageContent;

use crate::error::FetchError;

/// Capability to fetch one page. Timeouts, retries, rendering and proxying are
/// the implementation's concern.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<PageContent, FetchError>> + Send;
}

impl<T: PageFetcher> PageFetcher for std::sync::Arc<T> {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<PageContent, FetchError>> + Send {
        (**self).fetch(url)
    }
}
