//! Document export domain: pagination and artifact naming.

mod filename;
mod pagination;

pub use filename::artifact_base_name;
pub use pagination::{PageGeometry, PagePlan, PaginationError, TailPolicy};
