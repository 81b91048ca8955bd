//! Dataset invalidation and refetch, plus the in-process signal bus that
//! tells listeners when prompts changed elsewhere.

pub mod bus;
pub mod coordinator;

pub use bus::{RefreshBus, RefreshSignal};
pub use coordinator::{DatasetLoader, DatasetState, ListenerHandle, RefreshCoordinator};
