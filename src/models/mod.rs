pub mod collection;
pub mod uploader;

pub use collection::{AppendOutcome, ResultCollection};
pub use uploader::{clean_title, CandidateVideo, TopVideo, UploaderRecord, UploaderRef};
