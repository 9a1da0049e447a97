//! Battery unit records and lifetime extraction.
//!
//! Reads one degradation record per unit from a record store, validates it
//! into a [`UnitRecord`], and reduces each capacity curve to a single
//! lifetime: the first cycle index at which capacity falls below a fraction
//! of its initial value.
//!
//! # Modules
//!
//! - [`load_unit_record`] — column lookup and validation
//! - [`compute_lifetime`] — threshold-crossing scan
//! - [`extract_lifetimes`] — batch over numbered units, skipping missing records
//! - [`MatDirectory`] — record store over a directory of MAT v5 files

mod lifetime;
mod mat;
mod record;

pub use lifetime::{compute_lifetime, extract_lifetimes, extract_lifetimes_from, LifetimeSample};
pub use mat::{MatDirectory, MatRecord};
pub use record::{
    load_unit_record, MemoryRecord, MemoryStore, RecordSource, RecordStore, UnitRecord, CAPACITY,
    CYCLE, IMPEDANCE,
};
