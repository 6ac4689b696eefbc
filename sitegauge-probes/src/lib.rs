pub mod content;
pub mod error;
pub mod fetch;
pub mod performance;
pub mod report;
pub mod seo;
pub mod technical;

pub use error::ProbeError;
pub use performance::PageSpeedClient;
pub use report::{
    ContentReport, PageSpeedReport, ProbeResult, SeoReport, TechnicalReport,
};
