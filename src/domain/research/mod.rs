//! Market research domain: product ideas, analysis results and history.

mod analysis_result;
mod form;
mod history;
mod product_idea;

pub use analysis_result::AnalysisResult;
pub use form::{ResearchForm, SessionCredentials};
pub use history::{truncate_to_display_limit, HistoryCache, HISTORY_DISPLAY_LIMIT};
pub use product_idea::{ProductIdea, ProductIdeaDraft};
