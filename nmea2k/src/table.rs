use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use tracing::debug;

use crate::definitions;
use crate::field::Field;
use crate::pgn::Pgn;

/// Largest PGN an 18 bit parameter group number can hold
pub const MAX_PGN: u32 = 0x1FFFF;

static BUILTIN: LazyLock<PgnTable> = LazyLock::new(|| PgnTable::new(definitions::builtin_pgns()));

/// Immutable list of PGN definitions sorted by PGN number.
///
/// PGN numbers are not unique keys: all variants of one PGN sit next to each
/// other, in the order in which they should be tried.
#[derive(Debug, Clone, Default)]
pub struct PgnTable {
    pgns: Vec<Pgn>,
}

impl PgnTable {
    /// Builds a table from definitions that are already sorted by PGN.
    pub fn new(pgns: Vec<Pgn>) -> Self {
        debug_assert!(
            pgns.windows(2).all(|w| w[0].pgn <= w[1].pgn),
            "PGN table must be sorted by PGN number"
        );
        Self { pgns }
    }

    /// The definitions compiled into this crate.
    pub fn builtin() -> &'static PgnTable {
        &BUILTIN
    }

    /// Parses a JSON array of PGN definitions. Entries are ordered by PGN;
    /// variants of the same PGN keep their order from the file.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let mut pgns: Vec<Pgn> = serde_json::from_str(json)?;
        pgns.sort_by_key(|p| p.pgn);
        Ok(Self::new(pgns))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path.as_ref())?;
        let table = Self::from_json_str(&contents)?;
        debug!("Loaded {} PGN definitions from {}", table.len(), path.as_ref().display());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.pgns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pgns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pgn> {
        self.pgns.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Pgn> {
        self.pgns.get(index)
    }

    /// Index of the first definition for `pgn`.
    pub fn find_first(&self, pgn: u32) -> Option<usize> {
        let mut first = 0;
        let mut count = self.pgns.len();
        while count > 0 {
            let step = count / 2;
            let mid = first + step;
            if self.pgns[mid].pgn < pgn {
                first = mid + 1;
                count -= step + 1;
            } else {
                count = step;
            }
        }
        match self.pgns.get(first) {
            Some(p) if p.pgn == pgn => Some(first),
            _ => None,
        }
    }

    /// Exclusive end of the run of definitions sharing the PGN at `first`.
    pub fn find_run(&self, first: usize) -> usize {
        let Some(start) = self.pgns.get(first) else {
            return self.pgns.len();
        };
        self.pgns[first..]
            .iter()
            .position(|p| p.pgn != start.pgn)
            .map_or(self.pgns.len(), |n| first + n)
    }

    /// All variants for `pgn`, in the order they are tried.
    pub fn variants(&self, pgn: u32) -> &[Pgn] {
        match self.find_first(pgn) {
            Some(first) => &self.pgns[first..self.find_run(first)],
            None => &[],
        }
    }

    /// The first variant for `pgn`.
    pub fn search(&self, pgn: u32) -> Option<&Pgn> {
        self.find_first(pgn).map(|i| &self.pgns[i])
    }

    /// The catch-all definition for a PGN range that `pgn` falls into: the
    /// last fallback entry numbered at or below it.
    pub fn fallback_for(&self, pgn: u32) -> Option<&Pgn> {
        if pgn > MAX_PGN {
            return None;
        }
        self.pgns
            .iter()
            .take_while(|p| p.pgn <= pgn)
            .filter(|p| p.fallback)
            .last()
    }

    /// Field `index` of the first variant for `pgn`. Does not look at the
    /// payload, so for PGNs with several variants this is always variant 0.
    pub fn get_field(&self, pgn: u32, index: usize) -> Option<&Field> {
        let definition = self.search(pgn)?;
        if index < definition.field_count() {
            definition.fields.get(index)
        } else {
            None
        }
    }
}
