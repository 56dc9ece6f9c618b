//! Request extractors that reject through the envelope error path.

pub mod validated_json;

pub use validated_json::ValidatedJson;
