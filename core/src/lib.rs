// tattva/src/lib.rs

//! Tattva: the interaction core of a small marketplace admin dashboard.
//!
//! Two collections (products and categories) live in a hosted document
//! store. For each one the dashboard keeps:
//!  - an `EntityList`, a full re-read of the collection in creation order;
//!  - an `EditSession`, the unsaved drafts of rows in edit mode;
//!  - a `MutationDispatcher`, running create/update/delete as step flows
//!    (`validate`/`confirm`, `write`, `patch_local` | `refetch`, `notify`)
//!    with before/on/after hooks.
//!
//! `Dashboard` composes both workspaces with the navigation `Shell`, the
//! static demo orders, headline stats and the notification queue.
//!
//! Typical use:
//!  1. Pick a `RecordStore` (`InMemoryStore`, or a database-backed one).
//!  2. `Dashboard::builder(store)`, optionally with a product snapshot cache,
//!     an `EditPolicy` and a `SyncStrategy`, then `build()`.
//!  3. Attach any extra hooks through `products_mut().dispatcher_mut()`.
//!  4. `mount().await`, then drive edits and mutations.

pub mod cache;
pub mod core;
pub mod dashboard;
pub mod dispatch;
pub mod edit;
pub mod error;
pub mod flow;
pub mod list;
pub mod model;
pub mod notify;
pub mod shell;
pub mod stats;
pub mod store;
pub mod workspace;

// --- Re-exports for the Public API ---

pub use crate::core::{FlowControl, FlowOutcome, SharedState, StepDef};
pub use crate::flow::Flow;

pub use crate::store::{DocumentId, Fault, Fields, InMemoryStore, RecordStore, StoreError, StoreOp, StoredDocument};

pub use crate::model::{
  Category, CategoryDraft, CategoryStatus, Draft, Entity, NewCategory, NewProduct, NewRecord, Order, OrderStatus,
  Product, ProductDraft, ProductStatus,
};

pub use crate::cache::{JsonFileCache, MemoryCache, SnapshotCache};
pub use crate::dashboard::{CatalogEntity, Dashboard, DashboardBuilder, MountSummary};
pub use crate::dispatch::{Confirm, MutationDispatcher, MutationOutcome, SyncStrategy};
pub use crate::edit::{EditPolicy, EditSession, RowMode};
pub use crate::list::{EntityList, ListSource};
pub use crate::notify::{Notification, NotificationCenter, NotificationLevel, Notifier};
pub use crate::shell::{FormKind, Panel, Shell, View};
pub use crate::stats::{DashboardStats, StatCard, Trend};
pub use crate::workspace::EntityWorkspace;

pub use crate::error::{TattvaError, TattvaResult, ValidationError};
