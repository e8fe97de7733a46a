//! Core business logic abstractions

pub mod check;
pub mod config;
pub mod format;
pub mod log;
pub mod options;
pub mod price;
pub mod profit;
pub mod submission;
pub mod validation;
pub mod view;

// Re-export main types for cleaner imports
pub use check::{CheckError, check, compute_profit};
pub use format::{CurrencyFormatter, EnUsFormatter, format_currency};
pub use price::{FetchError, PriceProvider, PriceQuote};
pub use profit::{DomainError, ProfitResult};
pub use validation::{FormCandidate, FormInput, ValidationErrors, Validator};
