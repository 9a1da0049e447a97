//! Unit records and the stores they are read from.
//!
//! A record store maps an identifier such as `B0001` to a record source; a
//! record source exposes named numeric columns. [`load_unit_record`] turns a
//! source into a validated [`UnitRecord`].

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Column holding the cycle index.
pub const CYCLE: &str = "cycle";
/// Column holding the measured capacity.
pub const CAPACITY: &str = "capacity";
/// Optional column holding the measured impedance.
pub const IMPEDANCE: &str = "impedance";

/// Degradation time series of one unit.
///
/// All three sequences have the same length and `cycle` is non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRecord {
    /// Cycle index per observation.
    pub cycle: Vec<f64>,
    /// Capacity per observation.
    pub capacity: Vec<f64>,
    /// Impedance per observation (zeros when the source has none).
    pub impedance: Vec<f64>,
}

impl UnitRecord {
    /// Number of observations.
    pub fn len(&self) -> usize {
        self.capacity.len()
    }

    /// True if the record has no observations.
    pub fn is_empty(&self) -> bool {
        self.capacity.is_empty()
    }

    /// First capacity reading, if any.
    pub fn initial_capacity(&self) -> Option<f64> {
        self.capacity.first().copied()
    }
}

/// One unit's named columns.
pub trait RecordSource {
    /// Identifier used in error messages.
    fn id(&self) -> &str;

    /// Values of the named column, or `None` if the source does not have it.
    fn column(&self, name: &str) -> Result<Option<Vec<f64>>>;
}

/// A collection of records addressed by identifier.
pub trait RecordStore {
    /// Record type handed out by [`RecordStore::open`].
    type Record: RecordSource;

    /// Opens the record for `id`, failing with [`Error::NotFound`] if absent.
    fn open(&self, id: &str) -> Result<Self::Record>;
}

/// Reads and validates a unit record.
///
/// `cycle` and `capacity` are required. A missing `impedance` column is
/// replaced by zeros of the same length as `capacity`.
///
/// # Errors
///
/// - [`Error::MissingField`] if `cycle` or `capacity` is absent.
/// - [`Error::Malformed`] if column lengths differ or cycles decrease.
///
/// # Examples
///
/// ```
/// use u_battery::loader::{load_unit_record, MemoryRecord};
///
/// let rec = MemoryRecord::new("B0001")
///     .with_column("cycle", vec![1.0, 2.0, 3.0])
///     .with_column("capacity", vec![2.0, 1.9, 1.5]);
/// let unit = load_unit_record(&rec).unwrap();
/// assert_eq!(unit.impedance, vec![0.0, 0.0, 0.0]);
/// ```
pub fn load_unit_record<S: RecordSource + ?Sized>(source: &S) -> Result<UnitRecord> {
    let unit = source.id();
    let cycle = required(source, CYCLE)?;
    let capacity = required(source, CAPACITY)?;

    if cycle.len() != capacity.len() {
        return Err(Error::malformed(
            unit,
            format!(
                "cycle has {} values but capacity has {}",
                cycle.len(),
                capacity.len()
            ),
        ));
    }

    let impedance = match source.column(IMPEDANCE)? {
        Some(values) if values.len() == capacity.len() => values,
        Some(values) => {
            return Err(Error::malformed(
                unit,
                format!(
                    "impedance has {} values but capacity has {}",
                    values.len(),
                    capacity.len()
                ),
            ))
        }
        None => vec![0.0; capacity.len()],
    };

    if let Some(pos) = cycle.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::malformed(
            unit,
            format!("cycle decreases at position {}", pos + 1),
        ));
    }

    Ok(UnitRecord {
        cycle,
        capacity,
        impedance,
    })
}

fn required<S: RecordSource + ?Sized>(source: &S, field: &str) -> Result<Vec<f64>> {
    source.column(field)?.ok_or_else(|| Error::MissingField {
        field: field.to_string(),
        unit: source.id().to_string(),
    })
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// A record held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecord {
    id: String,
    columns: BTreeMap<String, Vec<f64>>,
}

impl MemoryRecord {
    /// Creates an empty record.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            columns: BTreeMap::new(),
        }
    }

    /// Adds or replaces a column.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.insert(name.into(), values);
        self
    }
}

impl RecordSource for MemoryRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn column(&self, name: &str) -> Result<Option<Vec<f64>>> {
        Ok(self.columns.get(name).cloned())
    }
}

/// A record store held in memory, keyed by record identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, MemoryRecord>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record under its own identifier.
    pub fn insert(&mut self, record: MemoryRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    type Record = MemoryRecord;

    fn open(&self, id: &str) -> Result<MemoryRecord> {
        self.records.get(id).cloned().ok_or_else(|| Error::NotFound {
            unit: id.to_string(),
        })
    }
}
