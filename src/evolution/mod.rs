pub mod evaluator;
pub mod launcher;
pub mod options;
pub mod record;

pub use evaluator::{DistributedEvaluator, Evaluator, TradeFloor};
pub use launcher::{SearchLauncher, SearchOutcome};
pub use options::{LogLevel, SearchOptions};
pub use record::GenerationRecord;
