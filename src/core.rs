pub mod aggregate;
pub mod evaluator;
pub mod export;
pub mod filter;
pub mod hours;
pub mod pipeline;
pub mod plan;
pub mod ranking;
pub mod weekday;
