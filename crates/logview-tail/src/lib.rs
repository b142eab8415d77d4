//! Log Tailing Engine
//!
//! Follows a single growing log file and streams its lines to a consumer:
//! - Initial tail read of the last N lines (estimated by bytes, not a full scan)
//! - Incremental reads of appended bytes only
//! - Truncation/rotation detection with automatic re-read
//! - Case-insensitive include/exclude filter over history and live lines
//! - Batched delivery on a fixed cadence instead of per line
//!
//! # Example
//!
//! ```no_run
//! use logview_tail::{spawn_tail_worker, FilterMode, TailEvent, TailSettings};
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> Result<(), logview_tail::TailError> {
//! let (tx, mut rx) = mpsc::unbounded_channel::<TailEvent>();
//! let (handle, _worker) = spawn_tail_worker(tx, TailSettings::default());
//!
//! handle.set_log_file("service.log")?;
//! handle.set_filter("error", FilterMode::Include)?;
//!
//! while let Some(event) = rx.recv().await {
//!     if let TailEvent::Batch(lines) = event {
//!         for line in lines {
//!             println!("{line}");
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod buffer;
mod cursor;
mod error;
mod filter;
mod notifier;
mod reader;
mod session;
mod settings;
mod sink;
mod worker;

pub use buffer::LineBuffer;
pub use cursor::FileCursor;
pub use error::{Result, TailError};
pub use filter::{FilterMode, FilterState};
pub use notifier::ChangeNotifier;
pub use reader::{CycleOutcome, ReaderState, TailReader};
pub use session::{TRUNCATION_MARKER, TailSession};
pub use settings::TailSettings;
pub use sink::{TailEvent, TailSink};
pub use worker::{TailHandle, spawn_tail_worker};
