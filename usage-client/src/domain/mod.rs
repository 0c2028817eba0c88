pub mod levels;
pub mod usage_record;

pub use levels::{ActivityLevel, ClassificationResult, Color, Indicator, RegularityLevel, Status};
pub use usage_record::{round3, UsageRecord, UtilityKind};
