//! Event hooks
//!
//! The dispatch core: one router that receives host events and derives
//! tracker actions from them, using the collaborator seams it was
//! constructed with.

pub mod router;

pub use router::{strip_change_id, HookRouter};
