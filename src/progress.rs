// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;

use csv::StringRecord;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::entry::EntryId;

/// Counters for the current review session. They start empty when a source
/// is loaded and are reset every time the queue is rebuilt.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Session {
    reviewed: usize,
    known_ids: HashSet<EntryId>,
    unknown_ids: HashSet<EntryId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a decision. An entry is only ever in one of the two sets.
    pub fn record_outcome(&mut self, id: EntryId, known: bool) {
        self.reviewed += 1;
        if known {
            self.known_ids.insert(id);
            self.unknown_ids.remove(&id);
        } else {
            self.unknown_ids.insert(id);
            self.known_ids.remove(&id);
        }
    }

    pub fn reset(&mut self) {
        self.reviewed = 0;
        self.known_ids.clear();
        self.unknown_ids.clear();
    }

    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn known_count(&self) -> usize {
        self.known_ids.len()
    }

    pub fn unknown_count(&self) -> usize {
        self.unknown_ids.len()
    }

    pub fn known_ids(&self) -> &HashSet<EntryId> {
        &self.known_ids
    }

    pub fn unknown_ids(&self) -> &HashSet<EntryId> {
        &self.unknown_ids
    }

    pub fn summary(&self) -> String {
        format!(
            "Reviewed: {} | Known: {} | Unknown: {}",
            self.reviewed,
            self.known_count(),
            self.unknown_count()
        )
    }
}

/// The counters stored for a single day.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub reviewed: usize,
    pub known: usize,
    pub unknown: usize,
}

/// A day's counters together with its date, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub date: Date,
    pub reviewed: usize,
    pub known: usize,
    pub unknown: usize,
}

/// Review activity by date, backed by a plain text log with one
/// `date,reviewed,known,unknown` line per day.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DailyStats {
    days: BTreeMap<Date, DayStats>,
}

impl DailyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the log at `path`. A missing file yields empty stats. Any
    /// malformed line aborts the whole load.
    pub fn load(path: &Path) -> Fallible<Self> {
        if !path.exists() {
            log::debug!("No progress log at {}.", path.display());
            return Ok(Self::new());
        }
        let text = read_to_string(path)?;
        let stats = Self::parse(&text)?;
        log::debug!(
            "Loaded {} days of progress from {}.",
            stats.days.len(),
            path.display()
        );
        Ok(stats)
    }

    /// Parse log text. Blank lines are ignored. A date seen twice keeps its
    /// last line.
    pub fn parse(text: &str) -> Fallible<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let mut days = BTreeMap::new();
        let mut record = StringRecord::new();
        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line() as usize);
                    return Err(corrupt(line, &e.to_string()));
                }
            }
            let line = line_ending_at(text, reader.position().byte());
            if record.len() != LOG_FIELDS {
                return Err(corrupt(
                    line,
                    &format!("expected {LOG_FIELDS} fields, found {}", record.len()),
                ));
            }
            let entry: LogLine = record
                .deserialize(None)
                .map_err(|e| corrupt(line, &e.to_string()))?;
            days.insert(entry.date, entry.stats());
        }
        Ok(Self { days })
    }

    /// Write every day to the log at `path`, oldest first, replacing the
    /// file.
    pub fn persist(&self, path: &Path) -> Fallible<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        for (date, day) in &self.days {
            writer.serialize(LogLine::new(*date, *day))?;
        }
        writer.flush()?;
        log::debug!("Wrote {} days of progress to {}.", self.days.len(), path.display());
        Ok(())
    }

    /// Store the session's counters as the entry for `today`. Any earlier
    /// entry for that date is replaced, not added to.
    pub fn snapshot_today(&mut self, today: Date, session: &Session) -> DayRecord {
        let day = DayStats {
            reviewed: session.reviewed(),
            known: session.known_count(),
            unknown: session.unknown_count(),
        };
        self.days.insert(today, day);
        DayRecord::new(today, day)
    }

    pub fn get(&self, date: Date) -> Option<DayStats> {
        self.days.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn records(&self) -> Vec<DayRecord> {
        self.days
            .iter()
            .map(|(date, day)| DayRecord::new(*date, *day))
            .collect()
    }

    /// The most recent `n` days, oldest first.
    pub fn recent(&self, n: usize) -> Vec<DayRecord> {
        let records = self.records();
        let skip = records.len().saturating_sub(n);
        records.into_iter().skip(skip).collect()
    }
}

impl DayRecord {
    fn new(date: Date, day: DayStats) -> Self {
        Self {
            date,
            reviewed: day.reviewed,
            known: day.known,
            unknown: day.unknown,
        }
    }
}

const LOG_FIELDS: usize = 4;

/// One `date,reviewed,known,unknown` line of the progress log.
#[derive(Serialize, Deserialize)]
struct LogLine {
    date: Date,
    reviewed: usize,
    known: usize,
    unknown: usize,
}

impl LogLine {
    fn new(date: Date, day: DayStats) -> Self {
        Self {
            date,
            reviewed: day.reviewed,
            known: day.known,
            unknown: day.unknown,
        }
    }

    fn stats(&self) -> DayStats {
        DayStats {
            reviewed: self.reviewed,
            known: self.known,
            unknown: self.unknown,
        }
    }
}

fn corrupt(line: usize, detail: &str) -> ErrorReport {
    ErrorReport::with_kind(
        ErrorKind::StatsLogCorrupt { line },
        format!("malformed progress log line {line}: {detail}"),
    )
}

/// The 1-based line of the record that ends at byte offset `end`.
fn line_ending_at(text: &str, end: u64) -> usize {
    let bytes = text.as_bytes();
    let consumed = bytes.get(..end as usize).unwrap_or(bytes);
    let consumed = consumed.strip_suffix(b"\n").unwrap_or(consumed);
    consumed.iter().filter(|&&b| b == b'\n').count() + 1
}
