// src/compose/mod.rs

//! Composition primitives over a uniform unit of work.
//!
//! Everything runnable (a transform, a composite, the watch loop) is a
//! [`Step`]. Steps never return errors: failures are data inside the
//! [`RunReport`] so composites can decide what to do with them.
//!
//! - [`Parallel`] starts all members at once and completes when every member
//!   has completed. Siblings are never cancelled.
//! - [`Sequence`] starts each member after the previous one has completed,
//!   honouring a [`SequencePolicy`](crate::types::SequencePolicy).

use std::future::Future;
use std::pin::Pin;

pub mod parallel;
pub mod report;
pub mod sequence;

pub use parallel::Parallel;
pub use report::RunReport;
pub use sequence::Sequence;

pub type StepFuture<'a> = Pin<Box<dyn Future<Output = RunReport> + Send + 'a>>;

/// A named asynchronous unit of work.
pub trait Step: Send + Sync {
    fn name(&self) -> &str;

    /// Run the step to completion.
    fn run(&self) -> StepFuture<'_>;
}
