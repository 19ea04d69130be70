// [crates/windi-virtue-token/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WINDI VIRTUE TOKEN & RBAC (COMPONENT C)
 * CLASIFICACIÓN: ACCESS CONTROL LAYER
 * RESPONSABILIDAD: ISSUE BEARER CREDENTIALS, ENFORCE VISIBILITY
 *
 * No visibility decision is ever delegated to the client: every read
 * path that touches the Bridge's aggregator passes through the filter
 * in this crate before a byte is serialized to a caller.
 * =================================================================
 */

pub mod error;
pub mod filter;
pub mod issuer;
pub mod policy;
pub mod token;

pub use error::{Result, TokenError};
pub use filter::{filter_dashboard, filter_signals, FilteredDashboard, FilteredSignal, TokenMeta};
pub use issuer::{IssuanceLogEntry, TokenIssuer};
pub use policy::{
    default_signals, default_temporal_scope_hours, derived_shelves, visibility_mode, SLevel, Visibility,
};
pub use token::{complete_draft, SignedToken, SignedTokenHeader, TokenDraft, VirtueToken};
