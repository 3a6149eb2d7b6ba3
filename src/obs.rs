//! Optional observability helpers for relay flows.
//!
//! Enable the `tracing` feature (on by default) to emit structured spans named
//! `awqat_relay.flow` with the `flow` (lifecycle stage) and `stage` (call site) fields.

mod tracing;

pub use tracing::*;

// self
use crate::_prelude::*;

/// Lifecycle flows observed by the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Cold-cache or fallback login against `Auth/Login`.
	Login,
	/// Refresh against `Auth/RefreshToken/{refreshToken}`.
	Refresh,
	/// The ensure-token decision loop.
	Ensure,
	/// An authenticated relay call.
	Call,
}
impl FlowKind {
	/// Returns a stable label suitable for span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Login => "login",
			FlowKind::Refresh => "refresh",
			FlowKind::Ensure => "ensure",
			FlowKind::Call => "call",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
