pub mod error;
pub mod hash;
pub mod html;
pub mod index;
pub mod persist;
pub mod queue;
pub mod set;
pub mod slots;
pub mod tokenizer;
pub mod url_policy;

pub use error::{ArgError, StoreError, EXIT_IO, EXIT_USAGE};
pub use index::{DocId, InvertedIndex, Page, Posting};
pub use persist::{load_index, save_index, PageStore};
pub use queue::ConcurrentQueue;
pub use set::ConcurrentSet;
pub use slots::Slots;
pub use url_policy::UrlPolicy;
