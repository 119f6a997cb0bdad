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

use std::io::Read;
use std::path::Path;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::Row;

use crate::config::TableNames;
use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::error::fail_with;
use crate::types::collection_name::CollectionName;
use crate::types::entry::Entry;
use crate::types::entry::EntryId;

/// Every collection table has exactly this many columns: id, term, gloss,
/// example, note.
const ENTRY_COLUMNS: usize = 5;

/// The SQLite file holding a word list and the review state derived from it.
///
/// Every method that touches the database fails with `StoreUnavailable`
/// once the store has been closed.
pub struct EntryStore {
    conn: Option<Connection>,
    tables: TableNames,
}

impl EntryStore {
    /// Open an existing source. The four collection tables must exist and
    /// have the five-field entry shape.
    pub fn open(path: &Path, tables: TableNames) -> Fallible<Self> {
        if !path.exists() {
            return fail(format!("source does not exist: {}", path.display()));
        }
        log::debug!("Opening source {}", path.display());
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::attach(conn, tables)
    }

    /// Create a new, empty source with the four collection tables.
    pub fn create(path: &Path, tables: TableNames) -> Fallible<Self> {
        if path.exists() {
            return fail(format!("source already exists: {}", path.display()));
        }
        log::debug!("Creating source {}", path.display());
        let conn = Connection::open(path)?;
        create_schema(&conn, &tables)?;
        Self::attach(conn, tables)
    }

    #[cfg(test)]
    pub fn create_in_memory() -> Fallible<Self> {
        let tables = TableNames::default();
        let conn = Connection::open_in_memory()?;
        create_schema(&conn, &tables)?;
        Self::attach(conn, tables)
    }

    fn attach(conn: Connection, tables: TableNames) -> Fallible<Self> {
        validate_schema(&conn, &tables)?;
        Ok(Self {
            conn: Some(conn),
            tables,
        })
    }

    /// Close the source. Further calls fail with `StoreUnavailable`.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            log::debug!("Closing source.");
            if let Err((_, e)) = conn.close() {
                log::warn!("Failed to close source cleanly: {e}");
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// The names of every table in the source, sorted. This may include
    /// tables other than the four collections.
    pub fn list_collections(&self) -> Fallible<Vec<String>> {
        let conn = self.conn()?;
        let sql = "select name from sqlite_master where type = 'table' and name not like 'sqlite_%' order by name;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            names.push(name);
        }
        Ok(names)
    }

    /// Every table in the source with its row count.
    pub fn table_sizes(&self) -> Fallible<Vec<(String, usize)>> {
        let conn = self.conn()?;
        let mut sizes = Vec::new();
        for name in self.list_collections()? {
            let sql = format!("select count(*) from {};", quote(&name));
            let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            sizes.push((name, count as usize));
        }
        Ok(sizes)
    }

    pub fn count(&self, collection: CollectionName) -> Fallible<usize> {
        let conn = self.conn()?;
        let sql = format!("select count(*) from {};", self.table(collection));
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| self.collection_error(collection, e))?;
        Ok(count as usize)
    }

    /// All entries in a collection, in ascending id order.
    pub fn load_all(&self, collection: CollectionName) -> Fallible<Vec<Entry>> {
        let conn = self.conn()?;
        let sql = format!("select * from {} order by id;", self.table(collection));
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| self.collection_error(collection, e))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(entry_from_row(row)?);
        }
        Ok(entries)
    }

    /// The ids in a collection, ascending.
    pub fn ids(&self, collection: CollectionName) -> Fallible<Vec<EntryId>> {
        let conn = self.conn()?;
        let sql = format!("select id from {} order by id;", self.table(collection));
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| self.collection_error(collection, e))?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let id: EntryId = row.get(0)?;
            ids.push(id);
        }
        Ok(ids)
    }

    pub fn exists(&self, collection: CollectionName, id: EntryId) -> Fallible<bool> {
        let conn = self.conn()?;
        let sql = format!(
            "select count(*) from {} where id = ?;",
            self.table(collection)
        );
        let count: i64 = conn
            .query_row(&sql, [id], |row| row.get(0))
            .map_err(|e| self.collection_error(collection, e))?;
        Ok(count > 0)
    }

    /// Insert an entry. If an entry with the same id is already in the
    /// collection nothing happens. Returns whether a row was inserted.
    pub fn insert_if_absent(&self, collection: CollectionName, entry: &Entry) -> Fallible<bool> {
        let conn = self.conn()?;
        let table = self.table(collection);
        let sql = format!(
            "insert into {table} select ?1, ?2, ?3, ?4, ?5 where not exists (select 1 from {table} where id = ?1);"
        );
        let inserted = conn
            .execute(
                &sql,
                (
                    entry.id,
                    &entry.term,
                    &entry.gloss,
                    &entry.example,
                    &entry.note,
                ),
            )
            .map_err(|e| self.collection_error(collection, e))?;
        log::debug!(
            "insert {} into {collection}: {}",
            entry.id,
            if inserted > 0 { "inserted" } else { "already present" }
        );
        Ok(inserted > 0)
    }

    /// Delete an entry by id. Deleting an absent id is a no-op. Returns
    /// whether a row was removed.
    pub fn delete_by_id(&self, collection: CollectionName, id: EntryId) -> Fallible<bool> {
        let conn = self.conn()?;
        let sql = format!("delete from {} where id = ?;", self.table(collection));
        let deleted = conn
            .execute(&sql, [id])
            .map_err(|e| self.collection_error(collection, e))?;
        log::debug!("delete {id} from {collection}: {deleted} row(s)");
        Ok(deleted > 0)
    }

    /// Remove every entry from a collection. Returns the number removed.
    pub fn clear(&self, collection: CollectionName) -> Fallible<usize> {
        let conn = self.conn()?;
        let sql = format!("delete from {};", self.table(collection));
        let deleted = conn
            .execute(&sql, [])
            .map_err(|e| self.collection_error(collection, e))?;
        log::debug!("Cleared {deleted} entries from {collection}.");
        Ok(deleted)
    }

    /// Replace the queue with every corpus entry that is neither known nor
    /// new. Runs in a single transaction. Returns the new queue size.
    pub fn rebuild_queue(&self) -> Fallible<usize> {
        let conn = self.conn()?;
        let queue = self.table(CollectionName::Queue);
        let corpus = self.table(CollectionName::Corpus);
        let known = self.table(CollectionName::Known);
        let new = self.table(CollectionName::New);
        let tx = conn.unchecked_transaction()?;
        tx.execute(&format!("delete from {queue};"), [])
            .map_err(|e| self.collection_error(CollectionName::Queue, e))?;
        let sql = format!(
            "insert into {queue} select * from {corpus} c \
             where not exists (select 1 from {known} k where k.id = c.id) \
             and not exists (select 1 from {new} n where n.id = c.id);"
        );
        let inserted = tx.execute(&sql, [])?;
        tx.commit()?;
        log::debug!("Rebuilt queue with {inserted} entries.");
        Ok(inserted)
    }

    /// Add the rows of a headerless, five-column comma-separated file to the
    /// corpus. Rows whose id is already present are skipped. Returns
    /// `(inserted, skipped)`.
    pub fn import_corpus<R: Read>(&self, reader: R) -> Fallible<(usize, usize)> {
        let conn = self.conn()?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let tx = conn.unchecked_transaction()?;
        let mut inserted = 0;
        let mut skipped = 0;
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != ENTRY_COLUMNS {
                return fail(format!(
                    "line {}: expected {ENTRY_COLUMNS} fields, found {}",
                    idx + 1,
                    record.len()
                ));
            }
            let entry: Entry = record.deserialize(None)?;
            if self.insert_if_absent(CollectionName::Corpus, &entry)? {
                inserted += 1;
            } else {
                skipped += 1;
            }
        }
        tx.commit()?;
        log::debug!("Imported {inserted} entries, skipped {skipped} duplicates.");
        Ok((inserted, skipped))
    }

    fn conn(&self) -> Fallible<&Connection> {
        self.conn.as_ref().ok_or_else(|| {
            ErrorReport::with_kind(ErrorKind::StoreUnavailable, "no source is open")
        })
    }

    fn table(&self, collection: CollectionName) -> String {
        quote(self.tables.get(collection))
    }

    /// A missing table at query time is a schema problem, not an I/O one.
    fn collection_error(&self, collection: CollectionName, e: rusqlite::Error) -> ErrorReport {
        if e.to_string().contains("no such table") {
            ErrorReport::with_kind(
                ErrorKind::SchemaMismatch,
                format!(
                    "collection {collection} (table {}) does not exist",
                    self.tables.get(collection)
                ),
            )
        } else {
            e.into()
        }
    }
}

fn entry_from_row(row: &Row) -> rusqlite::Result<Entry> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        let value: Option<String> = row.get(idx)?;
        Ok(value.unwrap_or_default())
    };
    Ok(Entry {
        id: row.get(0)?,
        term: text(1)?,
        gloss: text(2)?,
        example: text(3)?,
        note: text(4)?,
    })
}

fn create_schema(conn: &Connection, tables: &TableNames) -> Fallible<()> {
    let mut sql = String::new();
    for collection in CollectionName::ALL {
        sql.push_str(&format!(
            "create table if not exists {} (id integer primary key, term text not null, gloss text not null, example text not null default '', note text not null default '');\n",
            quote(tables.get(collection))
        ));
    }
    conn.execute_batch(&sql)?;
    Ok(())
}

/// Check that each collection table exists, has five columns, and that the
/// first one is the id.
fn validate_schema(conn: &Connection, tables: &TableNames) -> Fallible<()> {
    for collection in CollectionName::ALL {
        let table = tables.get(collection);
        let sql = format!("pragma table_info({});", quote(table));
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut columns: Vec<String> = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(1)?;
            columns.push(name);
        }
        if columns.is_empty() {
            return fail_with(
                ErrorKind::SchemaMismatch,
                format!("source has no table {table} for collection {collection}"),
            );
        }
        if columns.len() != ENTRY_COLUMNS {
            return fail_with(
                ErrorKind::SchemaMismatch,
                format!(
                    "table {table} has {} columns, expected {ENTRY_COLUMNS}",
                    columns.len()
                ),
            );
        }
        if !columns[0].eq_ignore_ascii_case("id") {
            return fail_with(
                ErrorKind::SchemaMismatch,
                format!("table {table} must start with an id column"),
            );
        }
    }
    Ok(())
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

#[cfg(test)]
impl EntryStore {
    /// Run raw SQL against the source. Used to damage the schema in tests.
    pub fn execute_raw(&self, sql: &str) -> Fallible<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }
}
