//! Water-quality dashboard backend.
//!
//! The core is two pure pieces: [`classify`] maps a metric value to a
//! dashboard status, and [`aggregate`] turns a snapshot of irregular readings
//! into a fixed 289-slot, 5-minute series over the trailing 24 hours. The
//! rest of the crate is host plumbing around them: reading stores, the
//! optional summarizer, configuration and the HTTP routes.
//!
//! Modules talk to each other only through the re-exports below (EMBP), so
//! `routes/*.rs` and `store/*.rs` import from the crate root rather than from
//! sibling files.

pub mod config;
pub mod models;
pub mod routes;
pub mod schema;
pub mod status;
pub mod store;
pub mod summarizer;
pub mod trend;

pub use config::{Config, SourceConfig};
pub use models::{Metric, MetricSettings, Reading, SeriesPoint, Severity, Status, UnknownMetric};
pub use routes::{router, AppState};
pub use status::{classify, ClassifyError};
pub use store::{FirebaseStore, MemoryStore, PgStore, ReadingSource};
pub use summarizer::Summarizer;
pub use trend::{aggregate, bucket_key, TrendChart, TrendWindow, BUCKET_SECS, WINDOW_SLOTS};
