use crate::{artifact::view::DaoPath, error::Error, runtime::Database};
use relgen_schema::types::PropertyMap;
use serde_json::Value;
use std::{cmp::Ordering, collections::BTreeMap};

///
/// MemoryDb
///
/// In-memory reference database for tests and demos. Keeps per-model
/// tables keyed by id and stamps every write with an insertion sequence,
/// giving range reads the stable secondary ordering deterministic
/// pagination relies on.
///

#[derive(Debug, Default)]
pub struct MemoryDb {
    tables: BTreeMap<String, Table>,
    next_seq: u64,
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<String, Row>,
}

#[derive(Debug)]
struct Row {
    seq: u64,
    record: PropertyMap,
}

impl MemoryDb {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self, model: &str) -> usize {
        self.tables.get(model).map_or(0, |t| t.rows.len())
    }

    #[must_use]
    pub fn is_empty(&self, model: &str) -> bool {
        self.len(model) == 0
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Resolve a view path: a single record (field-limited if requested)
    /// or an array of records matching a range key, ordered by the sort
    /// fields with ties broken by insertion order.
    #[must_use]
    pub fn fetch(&self, path: &DaoPath) -> Option<Value> {
        match path {
            DaoPath::Record { model, id, fields } => {
                let row = self.tables.get(model)?.rows.get(id)?;

                Some(Value::Object(limit_fields(&row.record, fields.as_deref())))
            }
            DaoPath::Range { model, key, sort } => {
                let table = self.tables.get(model)?;
                let mut rows: Vec<&Row> = table
                    .rows
                    .values()
                    .filter(|row| {
                        key.iter()
                            .all(|(name, value)| row.record.get(name) == Some(value))
                    })
                    .collect();

                rows.sort_by(|a, b| {
                    for field in sort {
                        let ord = compare_values(a.record.get(field), b.record.get(field));
                        if ord != Ordering::Equal {
                            return ord;
                        }
                    }

                    a.seq.cmp(&b.seq)
                });

                Some(Value::Array(
                    rows.into_iter()
                        .map(|row| Value::Object(row.record.clone()))
                        .collect(),
                ))
            }
        }
    }
}

impl Database for MemoryDb {
    fn get(&self, model: &str, id: &str) -> Option<PropertyMap> {
        self.tables
            .get(model)
            .and_then(|t| t.rows.get(id))
            .map(|row| row.record.clone())
    }

    fn put(&mut self, model: &str, id: &str, record: PropertyMap) {
        let seq = self.bump_seq();
        let table = self.tables.entry(model.to_string()).or_default();

        // Replays keep the original insertion slot.
        let seq = table.rows.get(id).map_or(seq, |row| row.seq);
        table.rows.insert(id.to_string(), Row { seq, record });
    }

    fn merge(&mut self, model: &str, id: &str, fields: PropertyMap) {
        let seq = self.bump_seq();
        let table = self.tables.entry(model.to_string()).or_default();

        if let Some(row) = table.rows.get_mut(id) {
            for (name, value) in fields {
                row.record.insert(name, value);
            }
        } else {
            table.rows.insert(
                id.to_string(),
                Row {
                    seq,
                    record: fields,
                },
            );
        }
    }

    fn remove(&mut self, model: &str, id: &str) {
        if let Some(table) = self.tables.get_mut(model) {
            table.rows.remove(id);
        }
    }

    fn transfer(
        &mut self,
        model: &str,
        from: &str,
        to: &str,
        fields: PropertyMap,
    ) -> Result<(), Error> {
        let table = self.tables.entry(model.to_string()).or_default();

        let Some(mut row) = table.rows.remove(from) else {
            // Source gone, target present: the transfer already applied.
            if table.rows.contains_key(to) {
                return Ok(());
            }

            return Err(Error::not_found(format!("{model}:{from}")));
        };

        for (name, value) in fields {
            row.record.insert(name, value);
        }
        table.rows.insert(to.to_string(), row);

        Ok(())
    }
}

fn limit_fields(record: &PropertyMap, fields: Option<&[String]>) -> PropertyMap {
    match fields {
        None => record.clone(),
        Some(fields) => {
            let mut out = PropertyMap::new();
            for field in fields {
                if let Some(value) = record.get(field) {
                    out.insert(field.clone(), value.clone());
                }
            }

            out
        }
    }
}

// Total order over JSON values good enough for sort indexes: nulls first,
// then bools, numbers, strings; structured values compare by encoding.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_) | Value::Object(_)) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a)
            .cmp(&rank(b))
            .then_with(|| format!("{a:?}").cmp(&format!("{b:?}"))),
    }
}
