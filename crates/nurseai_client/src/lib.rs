//! Client-side retry workflow for rate-limited suggestions.
//!
//! The backend retries transient failures only for as long as a single HTTP
//! exchange lasts. When the external service stays busy past that, the
//! backend answers `rate_limited` and this crate takes over: the
//! [`RetryCoordinator`] persists a [`RetryTicket`], counts down to the next
//! allowed attempt, and re-invokes the backend when the user asks, up to a
//! fixed number of attempts within a fixed window.
//!
//! # Example
//!
//! ```
//! use nurseai_client::{
//!     GenerationBackend, ManualClock, MemoryTicketStore, RetryCoordinator, RetryNotice,
//! };
//! use nurseai_core::{ClientRetryConfig, GenerationOutcome, SuggestionRecord, TargetId};
//! use nurseai_error::NurseAiResult;
//! use nurseai_extraction::SuggestionExtractor;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct AlwaysReady;
//!
//! #[async_trait::async_trait]
//! impl GenerationBackend for AlwaysReady {
//!     async fn generate(
//!         &self,
//!         target_id: &TargetId,
//!     ) -> NurseAiResult<GenerationOutcome<SuggestionRecord>> {
//!         Ok(GenerationOutcome::success(SuggestionRecord::new(target_id.clone(), "1. Summary")))
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let clock = ManualClock::default();
//! let coordinator = RetryCoordinator::new(
//!     Arc::new(AlwaysReady),
//!     Arc::new(MemoryTicketStore::new()),
//!     Arc::new(clock.clone()),
//!     Arc::new(SuggestionExtractor::bundled()?),
//!     ClientRetryConfig::default(),
//! );
//!
//! coordinator.on_rate_limited(TargetId::from("cap-1"), 60).await?;
//! assert!(matches!(coordinator.retry_now().await?, RetryNotice::PleaseWait { .. }));
//!
//! clock.advance(Duration::from_secs(60));
//! assert!(coordinator.retry_now().await?.is_completed());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod clock;
mod coordinator;
mod notice;
mod store;
mod ticket;

pub use backend::{GenerationBackend, HttpGenerationBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::RetryCoordinator;
pub use notice::{LIMIT_REACHED_MESSAGE, RetryNotice};
pub use store::{FileTicketStore, MemoryTicketStore, TICKET_FILE_NAME, TicketStore};
pub use ticket::{RetryState, RetryTicket};
