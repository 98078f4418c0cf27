//! Execution substrate for in-process SIMT compute.
//!
//! Models the parts of an accelerator that data-parallel kernels are written
//! against: a capability profile ([`DeviceProfile`]), device-visible buffers
//! ([`DeviceBuffer`]), a work-group dispatcher backed by a thread pool
//! ([`Executor`]), lock-step sub-group collectives ([`collectives`]), and
//! one-shot completion handles for asynchronous submissions ([`Submission`]).
//!
//! Kernels are written as explicit state machines: one invocation per
//! work-group, with work-items simulated in super-steps delimited where the
//! hardware would place a group barrier. Sub-group collectives operate on
//! lane arrays, mirroring ballot/scan/broadcast group operations.

pub mod buffer;
pub mod collectives;
pub mod completion;
pub mod device;
pub mod executor;

pub use buffer::DeviceBuffer;
pub use completion::{submit, Submission, SubmissionLost};
pub use device::DeviceProfile;
pub use executor::{Executor, ExecutorError};
