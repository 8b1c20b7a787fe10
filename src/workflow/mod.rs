pub mod item_ctx;
pub mod result_page_walker;
pub mod session;

pub use item_ctx::ItemCtx;
pub use result_page_walker::{PageSummary, ResultPageWalker, SlotOutcome};
pub use session::CrawlSession;
