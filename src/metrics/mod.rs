//! Metric records and their dedup identity.

mod key_encoder;
mod types;

pub use key_encoder::{MetricKeyEncoder, PAIR_DELIMITER, SEGMENT_DELIMITER, TAG_DELIMITER};
pub use types::{FieldSet, FieldValue, MetricRecord, TagSet};
