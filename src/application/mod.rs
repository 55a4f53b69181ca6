pub mod use_cases;

pub use use_cases::browse::BrowseUseCase;
pub use use_cases::seed::{SeedReport, SeedUseCase, TableLoad};
