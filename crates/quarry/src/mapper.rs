//! Moves domain instances in and out of table rows.
//!
//! Nothing here inspects types at runtime: a [`Mapping`] registers, per
//! concrete shape of the domain type, a constructor and one store/load
//! function pair per field. The mapper resolves column names against the
//! schema once, caches the resolved descriptor, and keeps a bounded cache of
//! the last instance seen per primary key so updates can write only the
//! columns that changed.

mod cache;
use cache::InstanceCache;

use crate::row::QueryResult;

use quarry_core::schema::{ColumnId, Schema, TableId};
use quarry_core::stmt::{ColumnValue, Value};
use quarry_core::{Error, Result};

use indexmap::IndexMap;

use std::fmt;
use std::sync::{Arc, Mutex};

/// How a domain type maps onto one table.
pub struct Mapping<T> {
    table: String,
    shapes: Vec<Shape<T>>,

    /// Picks the shape for a row read. `None` always uses the first shape.
    resolver: Option<fn(&QueryResult) -> Result<String>>,

    /// Names the shape an instance stores under. `None` always uses the
    /// first shape.
    shape_of: Option<fn(&T) -> String>,
}

impl<T> Mapping<T> {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            shapes: vec![],
            resolver: None,
            shape_of: None,
        }
    }

    /// Adds a shape. The first added shape is the default.
    pub fn shape(mut self, shape: Shape<T>) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Sets the discriminator that picks a shape for each row read.
    pub fn resolve_with(mut self, resolver: fn(&QueryResult) -> Result<String>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Sets the function naming the shape an instance stores under.
    pub fn shape_of(mut self, shape_of: fn(&T) -> String) -> Self {
        self.shape_of = Some(shape_of);
        self
    }
}

/// One concrete form the domain type takes in the table.
pub struct Shape<T> {
    name: String,

    /// Builds an empty instance for loads to fill in.
    new: fn() -> T,

    fields: Vec<FieldBinding<T>>,
}

impl<T> Shape<T> {
    pub fn new(name: impl Into<String>, new: fn() -> T) -> Self {
        Self {
            name: name.into(),
            new,
            fields: vec![],
        }
    }

    pub fn field(mut self, binding: FieldBinding<T>) -> Self {
        self.fields.push(binding);
        self
    }
}

/// Connects one field of the domain type to one column.
pub struct FieldBinding<T> {
    field: String,
    column: String,

    /// Reads the field's outward value. Takes the instance mutably so a
    /// converter can normalize the stored representation in place; the
    /// instance handed back by `to_row` keeps the normalization.
    store: fn(&mut T) -> FieldWrite,

    /// Writes a column value into the field.
    load: fn(&mut T, Value) -> Result<()>,

    required: bool,
}

impl<T> FieldBinding<T> {
    pub fn new(
        field: impl Into<String>,
        column: impl Into<String>,
        store: fn(&mut T) -> FieldWrite,
        load: fn(&mut T, Value) -> Result<()>,
    ) -> Self {
        Self {
            field: field.into(),
            column: column.into(),
            store,
            load,
            required: false,
        }
    }

    /// Marks the column as required on every row this shape loads from.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// What a field contributes when an instance is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldWrite {
    /// The value to write to the bound column
    Value(Value),

    /// The field sits this write out
    Skip,
}

/// The outcome of materializing a row into a domain instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Materialized<T> {
    /// The row carried the table's columns and built an instance
    Present(T),

    /// The row carried no values for this table, as on an outer-join miss
    Absent,
}

impl<T> Materialized<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn into_present(self) -> Option<T> {
        match self {
            Self::Present(instance) => Some(instance),
            Self::Absent => None,
        }
    }
}

/// A shape with its columns resolved against the schema.
struct EntityDescriptor<T> {
    new: fn() -> T,
    fields: Vec<ResolvedBinding<T>>,
}

struct ResolvedBinding<T> {
    field: String,
    column: ColumnId,
    store: fn(&mut T) -> FieldWrite,
    load: fn(&mut T, Value) -> Result<()>,
    required: bool,
}

/// Moves instances of `T` in and out of one table's rows.
pub struct Mapper<T> {
    schema: Arc<Schema>,
    table: TableId,
    mapping: Mapping<T>,

    /// Shape name to resolved descriptor, filled lazily.
    descriptors: Mutex<IndexMap<String, Arc<EntityDescriptor<T>>>>,

    /// Last instance seen per primary key, for diff computation.
    cache: Mutex<InstanceCache<T>>,
}

impl<T> fmt::Debug for Mapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper").finish()
    }
}

impl<T: Clone> Mapper<T> {
    pub fn new(schema: Arc<Schema>, mapping: Mapping<T>, cache_capacity: usize) -> Result<Self> {
        let table = schema
            .table_named(&mapping.table)
            .ok_or_else(|| Error::configuration(format!("no table named `{}`", mapping.table)))?
            .id;

        if mapping.shapes.is_empty() {
            return Err(Error::configuration(format!(
                "mapping for `{}` has no shapes",
                mapping.table
            )));
        }

        Ok(Self {
            schema,
            table,
            mapping,
            descriptors: Mutex::new(IndexMap::new()),
            cache: Mutex::new(InstanceCache::new(cache_capacity)),
        })
    }

    /// Converts an instance to the column values that store it.
    ///
    /// The returned instance is the caller's, run through every binding's
    /// `store` so converter normalizations stick. With `only_changes` and a
    /// cached instance under the same primary key, values structurally equal
    /// to the cached instance's outward values drop out of the list; storing
    /// the same instance twice without change produces an empty list the
    /// second time. The cache refreshes either way.
    pub fn to_row(&self, instance: &T, only_changes: bool) -> Result<(T, Vec<ColumnValue>)> {
        let descriptor = self.descriptor(&self.shape_for_instance(instance))?;

        let mut stored = instance.clone();
        let mut writes = Self::outward_writes(&descriptor, &mut stored);
        let key = self.primary_key_of(&writes);

        if only_changes {
            if let Some(baseline) = key
                .as_deref()
                .and_then(|key| self.baseline_writes(&descriptor, key))
            {
                writes.retain(|write| {
                    baseline
                        .iter()
                        .find(|b| b.column == write.column)
                        .map_or(true, |b| b.value != write.value)
                });
            }
        }

        if let Some(key) = key {
            self.cache.lock().unwrap().put(key, stored.clone());
        }

        Ok((stored, writes))
    }

    /// Materializes a row into an instance.
    ///
    /// A row carrying no values for this table's columns produces
    /// [`Materialized::Absent`]; an outer join that found no match reads
    /// that way. Otherwise the resolver, or the first shape without one,
    /// picks the shape; every mapped column present in the row loads into
    /// the fresh instance; unmapped columns are ignored. The built instance
    /// refreshes the diff cache under its primary key.
    pub fn from_row(&self, row: &QueryResult) -> Result<Materialized<T>> {
        let columns: Vec<(ColumnId, &Value)> = row.table_columns(self.table).collect();

        if columns.is_empty() || columns.iter().all(|(_, value)| value.is_null()) {
            return Ok(Materialized::Absent);
        }

        let shape = match self.mapping.resolver {
            Some(resolver) => resolver(row)?,
            None => self.mapping.shapes[0].name.clone(),
        };
        let descriptor = self.descriptor(&shape)?;

        let mut instance = (descriptor.new)();
        for binding in &descriptor.fields {
            match columns.iter().find(|(column, _)| *column == binding.column) {
                Some((_, value)) => (binding.load)(&mut instance, (*value).clone())?,
                None if binding.required => {
                    return Err(Error::configuration(format!(
                        "required field `{}` has no column in this result",
                        binding.field
                    )));
                }
                None => {}
            }
        }

        let mut probe = instance.clone();
        let writes = Self::outward_writes(&descriptor, &mut probe);
        if let Some(key) = self.primary_key_of(&writes) {
            self.cache.lock().unwrap().put(key, instance.clone());
        }

        Ok(Materialized::Present(instance))
    }

    /// The instance's primary key column values.
    pub fn primary_keys(&self, instance: &T) -> Result<Vec<ColumnValue>> {
        let table = self.schema.table(self.table);
        if table.primary_key.is_empty() {
            return Err(Error::configuration(format!(
                "table `{}` has no primary key",
                table.name
            )));
        }

        let descriptor = self.descriptor(&self.shape_for_instance(instance))?;
        let mut probe = instance.clone();
        let writes = Self::outward_writes(&descriptor, &mut probe);

        table
            .primary_key
            .iter()
            .map(|key| {
                writes
                    .iter()
                    .find(|write| write.column == *key)
                    .cloned()
                    .ok_or_else(|| {
                        Error::configuration(format!(
                            "no mapped value for primary key column `{}`",
                            self.schema.column(*key).name
                        ))
                    })
            })
            .collect()
    }

    /// The resolved descriptor for `shape`.
    ///
    /// The first request per shape resolves its column names against the
    /// schema under the lock; later requests only clone the `Arc`.
    fn descriptor(&self, shape: &str) -> Result<Arc<EntityDescriptor<T>>> {
        let mut descriptors = self.descriptors.lock().unwrap();
        if let Some(descriptor) = descriptors.get(shape) {
            return Ok(descriptor.clone());
        }

        let descriptor = Arc::new(self.resolve(shape)?);
        descriptors.insert(shape.to_string(), descriptor.clone());
        Ok(descriptor)
    }

    fn resolve(&self, name: &str) -> Result<EntityDescriptor<T>> {
        let shape = self
            .mapping
            .shapes
            .iter()
            .find(|shape| shape.name == name)
            .ok_or_else(|| {
                Error::configuration(format!("mapping has no shape named `{name}`"))
            })?;

        let table = self.schema.table(self.table);
        let fields = shape
            .fields
            .iter()
            .map(|binding| {
                let column = table.column_named(&binding.column).ok_or_else(|| {
                    Error::configuration(format!(
                        "field `{}` is bound to `{}`, which is not a column of `{}`",
                        binding.field, binding.column, table.name
                    ))
                })?;

                Ok(ResolvedBinding {
                    field: binding.field.clone(),
                    column: column.id,
                    store: binding.store,
                    load: binding.load,
                    required: binding.required,
                })
            })
            .collect::<Result<_>>()?;

        Ok(EntityDescriptor {
            new: shape.new,
            fields,
        })
    }

    fn shape_for_instance(&self, instance: &T) -> String {
        match self.mapping.shape_of {
            Some(shape_of) => shape_of(instance),
            None => self.mapping.shapes[0].name.clone(),
        }
    }

    /// Every binding's outward value, skips filtered out.
    fn outward_writes(descriptor: &EntityDescriptor<T>, instance: &mut T) -> Vec<ColumnValue> {
        let mut writes = vec![];
        for binding in &descriptor.fields {
            if let FieldWrite::Value(value) = (binding.store)(instance) {
                writes.push(ColumnValue {
                    column: binding.column,
                    value,
                });
            }
        }
        writes
    }

    /// The primary key values carried by `writes`, in key order. `None` when
    /// the table has no primary key or any key column is unset, as before an
    /// auto-assigned id comes back.
    fn primary_key_of(&self, writes: &[ColumnValue]) -> Option<Vec<Value>> {
        let table = self.schema.table(self.table);
        if table.primary_key.is_empty() {
            return None;
        }

        table
            .primary_key
            .iter()
            .map(|key| {
                writes
                    .iter()
                    .find(|write| write.column == *key)
                    .map(|write| write.value.clone())
            })
            .collect()
    }

    /// The cached instance's outward values for `key`, if one is cached.
    fn baseline_writes(
        &self,
        descriptor: &EntityDescriptor<T>,
        key: &[Value],
    ) -> Option<Vec<ColumnValue>> {
        let mut cached = self.cache.lock().unwrap().get(key)?;
        Some(Self::outward_writes(descriptor, &mut cached))
    }
}
