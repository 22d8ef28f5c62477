//! HRV Dashboard - heart rate and RMSSD charts annotated by experimental condition.
//!
//! This library fetches a subject's per-minute heart rate (HR) and RMSSD
//! recording, splits it into contiguous condition segments, and renders two
//! annotated charts plus a descriptive summary.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        HRV Dashboard                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │    Fetch    │──▶│    Data     │──▶│  Segments   │       │
//! │  │ (HTTP/file) │   │   (CSV)     │   │ (one pass)  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                           │                 │               │
//! │                           ▼                 ▼               │
//! │                    ┌─────────────┐   ┌─────────────┐       │
//! │                    │   Summary   │   │ HR / RMSSD  │       │
//! │                    │  (describe) │   │ SVG charts  │       │
//! │                    └─────────────┘   └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use hrv_dashboard::{data, segment};
//!
//! let csv = "HR,RMSSD,Condition\n70,0.05,R\n71,0.05,R\n90,0.02,T\n";
//! let recording = data::parse_recording_str(data::Source::Inline, csv).unwrap();
//!
//! let segments = segment(recording.records());
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[1].start_index, 2);
//! ```

pub mod config;
pub mod core;
pub mod dashboard;
pub mod data;
pub mod fetch;
pub mod render;
pub mod subject;

#[cfg(feature = "server")]
pub mod server;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use self::core::{segment, Segment, Summary};
pub use dashboard::{Dashboard, DashboardError};
pub use data::{Condition, LoadError, Record, Recording, Source};
pub use fetch::{BlockingDataClient, DataClient, FetchError};
pub use subject::{SubjectError, SubjectId};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
