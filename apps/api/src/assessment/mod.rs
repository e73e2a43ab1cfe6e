//! The assessment wizard core: the aggregate record, the per-step
//! completion policy, the debounced state manager and the navigation
//! state machine.

pub mod completion;
pub mod handlers;
pub mod record;
pub mod session;
pub mod wizard;
