//! Process-lifecycle hook entry points
//!
//! Hooks are standalone binaries fired by the agent host. They report only
//! to stderr and always exit successfully so they can never block the host.

pub mod stop;
