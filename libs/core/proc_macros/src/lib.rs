// Re-export proc macros when their features are enabled
#[cfg(feature = "envelope_derive")]
pub use envelope_derive::Flatten;
