use thiserror::Error;

/// Library error type for carousel construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The configured image list is empty, so no page can be current.
    #[error("carousel requires at least one image")]
    NoImages,

    /// The advance interval must be a positive number of milliseconds.
    #[error("advance-interval-ms must be greater than zero")]
    ZeroInterval,

    /// The configured starting page does not exist.
    #[error("initial-index {index} is out of range for {count} images")]
    InitialIndexOutOfRange { index: usize, count: usize },

    /// The paged view disagrees with the configuration about how many pages exist.
    #[error("page host reports {host} pages but {configured} images are configured")]
    ItemCountMismatch { host: usize, configured: usize },

    /// The indicator row does not have one indicator per page.
    #[error("indicator set has {indicators} entries for {pages} pages")]
    IndicatorCountMismatch { indicators: usize, pages: usize },
}
