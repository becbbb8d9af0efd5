use crate::handlers::{
    ArrayHandler, DatetimeIndexHandler, IndexHandler, ScalarHandler, SeriesHandler, TableHandler,
};
use ndpickle_core::{Result, TypeTag, Value};
use ndpickle_host::{Config, Handler, HandlerTable, Pickler, Unpickler};
use std::sync::Arc;
use tracing::debug;

/// Register every ndpickle handler into `table`
///
/// Tags that already have a handler are left alone. Returns how many
/// handlers were inserted, so a second call returns 0.
pub fn register_handlers(table: &mut HandlerTable) -> Result<usize> {
    let handlers = [
        entry(TypeTag::NdArray, ArrayHandler),
        entry(TypeTag::Float64, ScalarHandler),
        entry(TypeTag::Int64, ScalarHandler),
        entry(TypeTag::Index, IndexHandler::for_type(TypeTag::Index)?),
        entry(TypeTag::Int64Index, IndexHandler::for_type(TypeTag::Int64Index)?),
        entry(TypeTag::Float64Index, IndexHandler::for_type(TypeTag::Float64Index)?),
        entry(TypeTag::DatetimeIndex, DatetimeIndexHandler),
        entry(TypeTag::Series, SeriesHandler),
        entry(TypeTag::Table, TableHandler),
    ];

    let mut inserted = 0;
    for (tag, handler) in handlers {
        if table.register(tag, handler) {
            inserted += 1;
        }
    }
    debug!(inserted, total = table.len(), "registered ndpickle handlers");
    Ok(inserted)
}

fn entry(tag: TypeTag, handler: impl Handler + 'static) -> (TypeTag, Arc<dyn Handler>) {
    (tag, Arc::new(handler))
}

/// A handler table with every ndpickle codec plus the settings used to
/// drive it
///
/// Each [`dumps`](Registry::dumps) and [`loads`](Registry::loads) call gets
/// its own reference context, so a registry can be shared across threads.
#[derive(Debug, Clone)]
pub struct Registry {
    handlers: HandlerTable,
    config: Config,
}

impl Registry {
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let mut handlers = HandlerTable::new();
        register_handlers(&mut handlers)?;
        Ok(Self { handlers, config })
    }

    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fresh encoding context over this registry
    pub fn pickler(&self) -> Pickler<'_> {
        Pickler::new(&self.handlers, &self.config)
    }

    /// Fresh decoding context over this registry
    pub fn unpickler(&self) -> Unpickler<'_> {
        Unpickler::new(&self.handlers, &self.config)
    }

    /// Encode `value` to UTF-8 JSON bytes
    pub fn dumps(&self, value: &Value) -> Result<Vec<u8>> {
        self.pickler().encode(value)
    }

    /// Decode UTF-8 JSON bytes produced by [`Registry::dumps`]
    pub fn loads(&self, data: &[u8]) -> Result<Value> {
        self.unpickler().decode(data)
    }
}
