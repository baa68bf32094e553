//! Visual-interaction (VI) transitions: records, scheduling and timing.

mod freeze;
mod idle;
mod policy;
mod record;
mod scheduler;

pub use freeze::FreezeController;
pub use idle::{IdleQueue, IdleTask};
pub use policy::TransitionPolicy;
pub use record::{NoopTransition, RunOutcome, Timing, Transition, ViContext, ViMeta, ViRecord};
pub use scheduler::ViScheduler;
