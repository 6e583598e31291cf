// Analyzer module: the device compatibility matcher and catalog filters.

pub mod browse;
pub mod compatibility;
pub mod dimensions;
pub mod tiers;

#[cfg(test)]
mod tests;

pub use browse::filter_products;
pub use compatibility::{Matcher, MatcherImpl};
