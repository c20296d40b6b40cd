//! The clinic domain store.
//!
//! [`ClinicStore`] owns the in-memory collections (patients, chairs, visit
//! history) and mediates every mutation. Each operation updates memory first,
//! then persists the affected collections to the injected [`KvStore`]. A
//! persistence failure propagates to the caller with memory already mutated;
//! there is no rollback, so the store and the backing storage can diverge
//! after a failed write.
//!
//! The store is constructed explicitly with its storage and clock
//! dependencies and passed by reference to consumers; callers are expected to
//! serialize mutations (the store takes `&mut self`).

mod backup;
mod chairs;
mod patients;

pub use backup::{BackupMetadata, BackupPayload, BACKUP_VERSION};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::models::{Chair, Patient, VisitRecord};
use crate::storage::{KvStore, StorageError};

const KEY_PATIENTS: &str = "cliniapp_patients";
const KEY_CHAIRS: &str = "cliniapp_chairs";
const KEY_VISIT_HISTORY: &str = "cliniapp_visit_history";
const KEY_PATIENT_COUNTER: &str = "cliniapp_patient_counter";

/// Number of chairs seeded on first run.
pub const SEED_CHAIR_COUNT: u32 = 6;

/// Domain store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("patient not found: {0}")]
    PatientNotFound(String),

    #[error("chair not found: {0}")]
    ChairNotFound(String),

    #[error("chair {0} is occupied")]
    ChairOccupied(String),

    #[error("patient {patient_id} already occupies chair {chair_id}")]
    PatientAlreadySeated { patient_id: String, chair_id: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid import payload: {0}")]
    ImportFormat(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Derived clinic-wide statistics. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicStats {
    pub total_patients: usize,
    pub total_chairs: usize,
    pub occupied_chairs: usize,
    pub free_chairs: usize,
    /// Mean session length over all history, rounded to the nearest minute
    pub average_session_minutes: i64,
    /// Visits whose session started on the current calendar date
    pub patients_today: usize,
}

/// Result of releasing a chair. Releasing a free chair yields no patient and
/// a zero duration, and writes no history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    pub patient: Option<Patient>,
    pub duration_minutes: i64,
}

/// The clinic session ledger.
pub struct ClinicStore<S: KvStore> {
    storage: S,
    clock: Box<dyn Clock>,
    loading: bool,
    patients: Vec<Patient>,
    chairs: Vec<Chair>,
    visit_history: Vec<VisitRecord>,
    visit_counter: u64,
}

impl<S: KvStore> ClinicStore<S> {
    /// Create an empty store over `storage` using the system clock. Call
    /// [`ClinicStore::load`] (or use [`ClinicStore::open`]) before reading.
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }

    /// Create a store with an explicit clock.
    pub fn with_clock(storage: S, clock: impl Clock + 'static) -> Self {
        Self {
            storage,
            clock: Box::new(clock),
            loading: false,
            patients: Vec::new(),
            chairs: Vec::new(),
            visit_history: Vec::new(),
            visit_counter: 0,
        }
    }

    /// Create a store and load all collections from storage.
    pub fn open(storage: S) -> StoreResult<Self> {
        let mut store = Self::new(storage);
        store.load()?;
        Ok(store)
    }

    /// (Re)read all collections from storage. When the chairs key is absent,
    /// seeds `silla-1..6` in free state and persists the seed.
    pub fn load(&mut self) -> StoreResult<()> {
        self.loading = true;
        let result = self.load_inner();
        self.loading = false;
        result
    }

    fn load_inner(&mut self) -> StoreResult<()> {
        self.patients = match self.storage.get(KEY_PATIENTS)? {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        match self.storage.get(KEY_CHAIRS)? {
            Some(json) => self.chairs = serde_json::from_str(&json)?,
            None => {
                self.chairs = seed_chairs();
                self.persist_chairs()?;
                debug!(count = SEED_CHAIR_COUNT, "seeded initial chairs");
            }
        }

        self.visit_history = match self.storage.get(KEY_VISIT_HISTORY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        // The counter is stored as a bare decimal, which parses as JSON.
        self.visit_counter = match self.storage.get(KEY_PATIENT_COUNTER)? {
            Some(raw) => serde_json::from_str(raw.trim())?,
            None => 0,
        };

        debug!(
            patients = self.patients.len(),
            chairs = self.chairs.len(),
            visits = self.visit_history.len(),
            "loaded clinic data"
        );
        Ok(())
    }

    /// Whether a [`ClinicStore::load`] is currently in progress.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn chairs(&self) -> &[Chair] {
        &self.chairs
    }

    pub fn visit_history(&self) -> &[VisitRecord] {
        &self.visit_history
    }

    /// All closed sessions for one patient. No ordering contract; callers
    /// sort for display.
    pub fn patient_history(&self, patient_id: &str) -> Vec<VisitRecord> {
        self.visit_history
            .iter()
            .filter(|v| v.patient_id == patient_id)
            .cloned()
            .collect()
    }

    /// Derive current clinic statistics from the in-memory snapshot.
    pub fn clinic_stats(&self) -> ClinicStats {
        let today = self.clock.today();
        let occupied = self.chairs.iter().filter(|c| c.is_occupied()).count();

        let average_session_minutes = if self.visit_history.is_empty() {
            0
        } else {
            let total: i64 = self.visit_history.iter().map(|v| v.duration_minutes).sum();
            (total as f64 / self.visit_history.len() as f64).round() as i64
        };

        ClinicStats {
            total_patients: self.patients.len(),
            total_chairs: self.chairs.len(),
            occupied_chairs: occupied,
            free_chairs: self.chairs.len() - occupied,
            average_session_minutes,
            patients_today: self
                .visit_history
                .iter()
                .filter(|v| v.started_at.date_naive() == today)
                .count(),
        }
    }

    pub(crate) fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Current calendar date according to the injected clock.
    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    pub(crate) fn persist_patients(&mut self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.patients)?;
        self.storage.set(KEY_PATIENTS, &json)?;
        Ok(())
    }

    pub(crate) fn persist_chairs(&mut self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.chairs)?;
        self.storage.set(KEY_CHAIRS, &json)?;
        Ok(())
    }

    pub(crate) fn persist_history(&mut self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.visit_history)?;
        self.storage.set(KEY_VISIT_HISTORY, &json)?;
        Ok(())
    }

    pub(crate) fn persist_counter(&mut self) -> StoreResult<()> {
        self.storage
            .set(KEY_PATIENT_COUNTER, &self.visit_counter.to_string())?;
        Ok(())
    }
}

fn seed_chairs() -> Vec<Chair> {
    (1..=SEED_CHAIR_COUNT).map(Chair::new).collect()
}
