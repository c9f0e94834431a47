//! Review-page extraction.
//!
//! A review page is rendered client-side and fills in over several seconds
//! after load. [`Extractor`] polls a [`PageSource`] until the review block
//! appears (or a timeout passes), then parses the markup field by field into
//! a [`chess::GameRecord`].
//!
//! ```no_run
//! use extractor::{Extractor, ExtractorConfig, PageSource, SnapshotDirSource, TokioWait};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pages = SnapshotDirSource::new("pages");
//! pages.open("165168859868").await?;
//! let extractor = Extractor::new(ExtractorConfig::default(), TokioWait);
//! let record = extractor.extract(&pages, "165168859868").await?;
//! println!("{:?} vs {:?}", record.white_username, record.black_username);
//! # Ok(())
//! # }
//! ```

mod error;
mod extract;
mod field;
mod snapshot;
mod source;
mod traits;
mod wait;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use error::{ExtractionError, PageError};
pub use extract::{
    extract_from_html, extract_manual_html, Extractor, ExtractorConfig, DEFAULT_POLL_INTERVAL,
    DEFAULT_REVIEW_TIMEOUT,
};
pub use field::Field;
pub use snapshot::ReviewSnapshot;
pub use source::{review_url, SnapshotDirSource};
pub use traits::{PageSource, TokioWait, Wait};
pub use wait::wait_for_review;

#[cfg(any(test, feature = "mock"))]
pub use mock::{InstantWait, MockCall, MockPageSource};
