mod load;
mod parse;

pub use load::{Dataset, DatasetRecord, load_dataset};
pub(crate) use parse::split_tokens;
