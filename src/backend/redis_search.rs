use super::{BackendError, SearchBackend};
use crate::index::schema::IndexDescriptor;
use crate::search::types::{Document, QuerySpec, ResultSet};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Cmd, RedisError, Value};
use std::collections::BTreeMap;

/// RediSearch backend.
///
/// Holds a `ConnectionManager`, which is a cheaply clonable multiplexed
/// connection that reconnects on its own. Every call works on a clone, so
/// concurrent requests never wait on each other for the handle.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    /// Connects to `url` (e.g. `redis://redis:12000`).
    pub async fn connect(url: &str) -> Result<Self, BackendError> {
        let client = redis::Client::open(url).map_err(classify_error)?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(classify_error)?;

        tracing::info!("Connected to search backend at {}", url);
        Ok(Self { conn })
    }
}

#[async_trait]
impl SearchBackend for RedisBackend {
    async fn create_index(&self, descriptor: &IndexDescriptor) -> Result<(), BackendError> {
        let mut conn = self.conn.clone();
        let _: () = create_index_command(descriptor)
            .query_async(&mut conn)
            .await
            .map_err(classify_error)?;
        Ok(())
    }

    async fn search(&self, index: &str, spec: &QuerySpec) -> Result<ResultSet, BackendError> {
        let mut conn = self.conn.clone();
        let reply: Value = search_command(index, spec)
            .query_async(&mut conn)
            .await
            .map_err(classify_error)?;
        parse_search_reply(reply)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// `FT.CREATE <name> ON HASH PREFIX 1 <prefix> SCHEMA <field> <kind> [SORTABLE] ...`
pub fn create_index_command(descriptor: &IndexDescriptor) -> Cmd {
    let mut cmd = redis::cmd("FT.CREATE");
    cmd.arg(&descriptor.name)
        .arg("ON")
        .arg(descriptor.storage.keyword())
        .arg("PREFIX")
        .arg(1)
        .arg(&descriptor.key_prefix)
        .arg("SCHEMA");

    for field in &descriptor.fields {
        cmd.arg(&field.name).arg(field.kind.keyword());
        if field.sortable {
            cmd.arg("SORTABLE");
        }
    }
    cmd
}

/// `FT.SEARCH <index> "@F:[lo hi]" SORTBY <field> <ASC|DESC> LIMIT <offset> <limit>`
pub fn search_command(index: &str, spec: &QuerySpec) -> Cmd {
    let mut cmd = redis::cmd("FT.SEARCH");
    cmd.arg(index)
        .arg(spec.query_string())
        .arg("SORTBY")
        .arg(&spec.sort_field)
        .arg(spec.sort_direction.keyword())
        .arg("LIMIT")
        .arg(spec.offset)
        .arg(spec.limit);
    cmd
}

fn classify_error(err: RedisError) -> BackendError {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        return BackendError::Connection(err.to_string());
    }

    let reply = match (err.code(), err.detail()) {
        (Some(code), Some(detail)) => format!("{} {}", code, detail),
        (Some(code), None) => code.to_string(),
        (None, Some(detail)) => detail.to_string(),
        (None, None) => err.to_string(),
    };
    classify_reply(&reply)
}

/// Maps the text of an error reply onto a `BackendError` kind.
///
/// This is the only place that looks at RediSearch reply wording.
pub(crate) fn classify_reply(reply: &str) -> BackendError {
    let lower = reply.to_ascii_lowercase();
    if lower.contains("index already exists") {
        BackendError::IndexAlreadyExists
    } else if lower.contains("unknown index name") || lower.contains("no such index") {
        BackendError::UnknownIndex(reply.to_string())
    } else {
        BackendError::Rejected(reply.to_string())
    }
}

/// Decodes an `FT.SEARCH` reply: `[total, key1, [f, v, ...], key2, [...], ...]`.
pub fn parse_search_reply(reply: Value) -> Result<ResultSet, BackendError> {
    let items = match reply {
        Value::Array(items) => items,
        other => {
            return Err(BackendError::Protocol(format!(
                "expected array reply, got {:?}",
                other
            )));
        }
    };

    let mut iter = items.into_iter();
    let total = match iter.next() {
        Some(Value::Int(n)) => usize::try_from(n)
            .map_err(|_| BackendError::Protocol(format!("negative total {}", n)))?,
        Some(other) => {
            return Err(BackendError::Protocol(format!(
                "expected integer total, got {:?}",
                other
            )));
        }
        None => return Err(BackendError::Protocol("empty reply".to_string())),
    };

    let mut documents = Vec::new();
    while let Some(key) = iter.next() {
        let id = value_to_string(key)?;
        let fields = match iter.next() {
            Some(Value::Array(pairs)) => parse_fields(pairs)?,
            Some(Value::Nil) | None => BTreeMap::new(),
            Some(other) => {
                return Err(BackendError::Protocol(format!(
                    "expected field list for '{}', got {:?}",
                    id, other
                )));
            }
        };
        documents.push(Document { id, fields });
    }

    Ok(ResultSet { total, documents })
}

fn parse_fields(pairs: Vec<Value>) -> Result<BTreeMap<String, String>, BackendError> {
    if pairs.len() % 2 != 0 {
        return Err(BackendError::Protocol(format!(
            "odd number of entries ({}) in field list",
            pairs.len()
        )));
    }

    let mut fields = BTreeMap::new();
    let mut iter = pairs.into_iter();
    while let (Some(name), Some(value)) = (iter.next(), iter.next()) {
        fields.insert(value_to_string(name)?, value_to_string(value)?);
    }
    Ok(fields)
}

fn value_to_string(value: Value) -> Result<String, BackendError> {
    match value {
        Value::BulkString(bytes) => String::from_utf8(bytes)
            .map_err(|e| BackendError::Protocol(format!("invalid utf-8: {}", e))),
        Value::SimpleString(s) => Ok(s),
        Value::Int(n) => Ok(n.to_string()),
        other => Err(BackendError::Protocol(format!(
            "expected string, got {:?}",
            other
        ))),
    }
}
