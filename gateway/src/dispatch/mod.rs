//! Dispatch: delivering actions to external channels
//!
//! The [`ChannelRouter`] owns one [`Sink`](vahti_core::Sink) per
//! [`ActionTarget`](vahti_core::ActionTarget) and turns each action into a
//! [`DispatchLog`](vahti_core::DispatchLog). [`LogChannel`] is the simulated
//! sink used when no real integration is wired in.

pub mod channels;
mod router;

pub use channels::LogChannel;
pub use router::ChannelRouter;
