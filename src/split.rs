//! Splitting listings into above/below subsets per (neighbourhood, property type, rooms) group

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::data::Table;
use crate::error::Result;
use crate::schema::{Schema, Value};
use crate::stats::{mean, CentralTendency};

/// Column selectors for [`split_data`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitColumns {
    pub neighbourhood: String,
    pub rooms: String,
    pub property_type: String,
    /// Numeric column compared against each group's split point
    pub split: String,
    pub price: String,
}

impl SplitColumns {
    /// Selectors with the price column named `price`
    pub fn new(
        neighbourhood: impl Into<String>,
        rooms: impl Into<String>,
        property_type: impl Into<String>,
        split: impl Into<String>,
    ) -> Self {
        Self {
            neighbourhood: neighbourhood.into(),
            rooms: rooms.into(),
            property_type: property_type.into(),
            split: split.into(),
            price: "price".to_string(),
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }
}

/// A listing row with its premium relative to the group's mean price
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRow {
    pub values: Vec<Value>,
    /// `price / group mean price - 1`
    pub premium_discount: f64,
    /// `premium_discount > 0`
    pub premium: bool,
}

/// One side of a split
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTable {
    schema: Schema,
    price_idx: usize,
    rows: Vec<AnnotatedRow>,
}

impl AnnotatedTable {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[AnnotatedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn price(&self, row: &AnnotatedRow) -> Option<f64> {
        row.values[self.price_idx].as_f64()
    }

    /// Rows whose column `idx` equals `value`
    pub fn matching<'a>(
        &'a self,
        idx: usize,
        value: &'a Value,
    ) -> impl Iterator<Item = &'a AnnotatedRow> + 'a {
        self.rows.iter().filter(move |row| &row.values[idx] == value)
    }
}

/// Key of a group: every row belongs to exactly one
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub neighbourhood: Value,
    pub property_type: Value,
    pub rooms: Value,
}

/// Statistics computed for one group while splitting
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub key: GroupKey,
    pub count: usize,
    pub mean_price: f64,
    pub split_point: f64,
}

/// Result of [`split_data`]
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub above: AnnotatedTable,
    pub below: AnnotatedTable,
    groups: Vec<GroupStats>,
}

impl Partition {
    /// Per-group statistics in processing order
    pub fn group_stats(&self) -> &[GroupStats] {
        &self.groups
    }

    pub fn into_parts(self) -> (AnnotatedTable, AnnotatedTable) {
        (self.above, self.below)
    }
}

/// Split `table` into rows above and at-or-below their group's split point.
///
/// Groups are visited in the cartesian order of first-seen neighbourhoods,
/// property types and room counts; empty combinations are skipped. Within a
/// group rows keep their input order. A row with a missing split metric never
/// exceeds the split point, so it lands in `below`. A zero or missing group
/// mean price yields a non-finite `premium_discount`.
pub fn split_data(table: &Table, columns: &SplitColumns, mode: CentralTendency) -> Result<Partition> {
    let schema = table.schema();
    let neighbourhood_idx = schema.index_of(&columns.neighbourhood)?;
    let property_type_idx = schema.index_of(&columns.property_type)?;
    let rooms_idx = schema.index_of(&columns.rooms)?;
    let split_idx = schema.numeric_index_of(&columns.split)?;
    let price_idx = schema.numeric_index_of(&columns.price)?;

    let neighbourhoods = FirstSeen::build(table, neighbourhood_idx);
    let property_types = FirstSeen::build(table, property_type_idx);
    let rooms = FirstSeen::build(table, rooms_idx);

    // BTreeMap over ordinal triples walks the cartesian product in order
    let mut groups: BTreeMap<(usize, usize, usize), Vec<&Vec<Value>>> = BTreeMap::new();
    for row in table.rows() {
        let ordinal = (
            neighbourhoods.ordinal(&row[neighbourhood_idx]),
            property_types.ordinal(&row[property_type_idx]),
            rooms.ordinal(&row[rooms_idx]),
        );
        groups.entry(ordinal).or_default().push(row);
    }

    let mut above_parts = Vec::with_capacity(groups.len());
    let mut below_parts = Vec::with_capacity(groups.len());
    let mut stats = Vec::with_capacity(groups.len());

    for members in groups.into_values() {
        let price_of = |row: &[Value]| row[price_idx].as_f64().unwrap_or(f64::NAN);
        let mean_price = mean(members.iter().map(|row| price_of(row.as_slice())));
        let split_point = mode.compute(members.iter().filter_map(|row| row[split_idx].as_f64()));

        let mut above = Vec::new();
        let mut below = Vec::new();
        for &row in &members {
            let premium_discount = price_of(row.as_slice()) / mean_price - 1.0;
            let annotated = AnnotatedRow {
                values: row.clone(),
                premium_discount,
                premium: premium_discount > 0.0,
            };
            match row[split_idx].as_f64() {
                Some(metric) if metric > split_point => above.push(annotated),
                _ => below.push(annotated),
            }
        }

        let key = GroupKey {
            neighbourhood: members[0][neighbourhood_idx].clone(),
            property_type: members[0][property_type_idx].clone(),
            rooms: members[0][rooms_idx].clone(),
        };
        debug!(
            "Group {} / {} / {}: {} rows, mean price {:.2}, split point {:.3}, {} above",
            key.neighbourhood,
            key.property_type,
            key.rooms,
            members.len(),
            mean_price,
            split_point,
            above.len()
        );
        stats.push(GroupStats {
            key,
            count: members.len(),
            mean_price,
            split_point,
        });

        above_parts.push(above);
        below_parts.push(below);
    }

    let finish = |parts: Vec<Vec<AnnotatedRow>>| AnnotatedTable {
        schema: schema.clone(),
        price_idx,
        rows: parts.into_iter().flatten().collect(),
    };

    Ok(Partition {
        above: finish(above_parts),
        below: finish(below_parts),
        groups: stats,
    })
}

/// Distinct values of one column in first-seen order
struct FirstSeen<'a> {
    positions: HashMap<&'a Value, usize>,
}

impl<'a> FirstSeen<'a> {
    fn build(table: &'a Table, idx: usize) -> Self {
        let mut positions = HashMap::new();
        for row in table.rows() {
            let next = positions.len();
            positions.entry(&row[idx]).or_insert(next);
        }
        Self { positions }
    }

    fn ordinal(&self, value: &Value) -> usize {
        self.positions[value]
    }
}
