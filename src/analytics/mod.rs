pub mod events;

pub use events::{AnalyticsEvent, EventSink, JsonlSink, MemorySink};
