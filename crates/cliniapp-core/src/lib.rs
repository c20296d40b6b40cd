//! CliniApp Core Library
//!
//! Single-location clinic front-desk tracker: a patient roster, a growable
//! set of treatment chairs, and the history of chair-occupancy sessions.
//!
//! # Architecture
//!
//! ```text
//!            UI / host app
//!                 │
//!        ┌────────▼────────┐
//!        │   ClinicStore   │  in-memory collections, all mutations
//!        │ (session ledger)│
//!        └───┬────────┬────┘
//!            │        │
//!     ┌──────▼──┐  ┌──▼───────────┐
//!     │ KvStore │  │ UsageReporter│  daily text/CSV/tab reports
//!     │ backend │  └──────────────┘
//!     └─────────┘
//! ```
//!
//! Mutations update memory first, then persist whole collections as JSON
//! under fixed keys; a failed write surfaces immediately and memory is not
//! rolled back. The store takes its storage backend and clock as explicit
//! dependencies, so there are no singletons and "today" is always derived
//! from the injected [`clock::Clock`].
//!
//! # Modules
//!
//! - [`models`]: domain types (Patient, Chair, VisitRecord)
//! - [`storage`]: key-value persistence trait with memory and SQLite backends
//! - [`store`]: the domain store and backup (export/import/reset)
//! - [`validation`]: RUT check digit, phone/email checks, patient form
//! - [`report`]: daily chair-usage reports

pub mod clock;
pub mod models;
pub mod report;
pub mod storage;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use models::{Chair, ChairState, IdDocumentKind, NewPatient, Patient, PatientPatch, VisitRecord};
pub use report::UsageReporter;
pub use storage::{KvStore, MemoryStore, SqliteStore, StorageError};
pub use store::{BackupPayload, ClinicStats, ClinicStore, Release, StoreError, StoreResult};
