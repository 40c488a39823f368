//! Resource-level descriptions of reads and writes, as handed over by the
//! document layer. Field names here are resource field names, never columns.

mod filter;
mod query;
mod write;

pub use filter::{FilterExpression, FilterOperand, LiteralValue};
pub use query::{DescriptionError, Pagination, QueryDescription, SortElement, SortTarget};
pub use write::WriteOperation;
