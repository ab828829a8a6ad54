pub mod config;
pub mod enumerate;
pub mod report;
pub mod wordlist;

pub use enumerate::{EnumOptions, EnumOutcome, EnumRun};
pub use report::ReportFormat;
pub use wordlist::load_wordlist;
