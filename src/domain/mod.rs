pub mod entry;
pub mod goal;
pub mod owner;
pub mod user;

pub use entry::{EntryKind, LedgerEntry, UnknownEntryKind};
pub use goal::Goal;
pub use owner::{OwnerRef, UserSummary};
pub use user::{User, UserProfile};
