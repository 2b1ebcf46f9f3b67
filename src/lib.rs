pub mod adapter;
pub mod audit;
pub mod catalogue;
pub mod error;
pub mod normalize;
pub mod resolver;
pub mod taxonomy;
pub mod types;
pub mod validator;

pub use audit::{
    AuditOptions, AuditReport, AuditSummary, Auditor, ExternalRecord, ExternalRecordSource,
    ExternalRow, RejectedRow, run_audit,
};
pub use catalogue::CatalogueStore;
pub use error::{CatalogueError, SourceError};
pub use resolver::{LocationOption, LocationResolver};
pub use taxonomy::{CanonicalMethod, canonicalize, supported_labels};
pub use types::{RawLocationRecord, SpeciesId, SpeciesRecord, SpeciesSummary};
pub use validator::{EncounterQuery, ValidationOutcome, Validator};
