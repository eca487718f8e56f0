//! Command dispatch.
//!
//! [`Command`] carries one variant per store operation. It implements
//! [`CommandExecute`], so any command can run against an
//! [`InMemoryStore`] through one entry point. [`CommandExecutor`] wraps a
//! [`SharedStore`] and adds per-command logging, the slow log and the
//! last-error record.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{parse_command, Reply};
use crate::{
    config::Settings,
    database::{Value, ValueType},
    engine::{InMemoryStore, SharedStore, Storage},
    error::{StoreError, StoreResult},
};

pub trait CommandExecute: std::fmt::Debug {
    /// Runs the command against `store`.
    fn execute(
        &self,
        store: &mut InMemoryStore,
    ) -> StoreResult<Reply>;

    /// Upper-case command name, for logging.
    fn command_name(&self) -> &'static str;

    /// First key the command touches, if any.
    fn command_key(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Keyspace
    Exists { key: String },
    Del { key: String },
    Rename { from: String, to: String },
    RenameNx { from: String, to: String },
    Type { key: String },
    DbSize,
    FlushDb,
    FlushAll,

    // Strings
    Get { key: String },
    Set { key: String, value: Value },
    SetNx { key: String, value: Value },
    GetSet { key: String, value: Value },
    Incr { key: String },
    Decr { key: String },
    IncrBy { key: String, delta: i64 },
    DecrBy { key: String, delta: i64 },
    IncrByFloat { key: String, delta: f64 },
    Append { key: String, value: Value },
    StrLen { key: String },
    MGet { keys: Vec<String> },
    MSet { entries: Vec<(String, Value)> },

    // Lists
    LPush { key: String, values: Vec<String> },
    RPush { key: String, values: Vec<String> },
    LPushX { key: String, value: String },
    RPushX { key: String, value: String },
    LPop { key: String },
    RPop { key: String },
    LLen { key: String },
    LRange { key: String, start: i64, end: i64 },
    LTrim { key: String, start: i64, end: i64 },
    LIndex { key: String, index: i64 },
    LSet { key: String, index: i64, value: String },
    LRem { key: String, count: i64, value: String },
    RPopLPush { src: String, dst: String },

    // Sets
    SAdd { key: String, members: Vec<String> },
    SRem { key: String, members: Vec<String> },
    SIsMember { key: String, member: String },
    SMembers { key: String },
    SCard { key: String },
    SPop { key: String },
    SRandMember { key: String },
    SMove { src: String, dst: String, member: String },
    SInter { a: String, b: String },
    SUnion { a: String, b: String },
    SDiff { a: String, b: String },
    SInterStore { dst: String, a: String, b: String },
    SUnionStore { dst: String, a: String, b: String },
    SDiffStore { dst: String, a: String, b: String },

    // Hashes
    HSet { key: String, pairs: Vec<(String, String)> },
    HSetNx { key: String, field: String, value: String },
    HGet { key: String, field: String },
    HExists { key: String, field: String },
    HDel { key: String, fields: Vec<String> },
    HLen { key: String },
    HGetAll { key: String },
    HKeys { key: String },
    HVals { key: String },
    HMGet { key: String, fields: Vec<String> },
    HMSet { key: String, pairs: Vec<(String, String)> },
    HIncrBy { key: String, field: String, delta: i64 },
    HDecrBy { key: String, field: String, delta: i64 },

    // Sorted sets
    ZAdd { key: String, entries: Vec<(f64, String)> },
    ZRem { key: String, members: Vec<String> },
    ZIncrBy { key: String, delta: f64, member: String },
    ZDecrBy { key: String, delta: f64, member: String },
    ZScore { key: String, member: String },
    ZRank { key: String, member: String },
    ZRevRank { key: String, member: String },
    ZCard { key: String },
    ZCount { key: String, start: i64, end: i64 },
    ZRange { key: String, start: i64, end: i64, with_scores: bool },
    ZRevRange { key: String, start: i64, end: i64, with_scores: bool },
    ZRangeByScore { key: String, min: f64, max: f64, with_scores: bool },
    ZRevRangeByScore { key: String, min: f64, max: f64, with_scores: bool },
    ZRemRangeByRank { key: String, start: i64, end: i64 },
    ZRemRangeByScore { key: String, min: f64, max: f64 },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Exists { .. } => "EXISTS",
            Command::Del { .. } => "DEL",
            Command::Rename { .. } => "RENAME",
            Command::RenameNx { .. } => "RENAMENX",
            Command::Type { .. } => "TYPE",
            Command::DbSize => "DBSIZE",
            Command::FlushDb => "FLUSHDB",
            Command::FlushAll => "FLUSHALL",
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
            Command::SetNx { .. } => "SETNX",
            Command::GetSet { .. } => "GETSET",
            Command::Incr { .. } => "INCR",
            Command::Decr { .. } => "DECR",
            Command::IncrBy { .. } => "INCRBY",
            Command::DecrBy { .. } => "DECRBY",
            Command::IncrByFloat { .. } => "INCRBYFLOAT",
            Command::Append { .. } => "APPEND",
            Command::StrLen { .. } => "STRLEN",
            Command::MGet { .. } => "MGET",
            Command::MSet { .. } => "MSET",
            Command::LPush { .. } => "LPUSH",
            Command::RPush { .. } => "RPUSH",
            Command::LPushX { .. } => "LPUSHX",
            Command::RPushX { .. } => "RPUSHX",
            Command::LPop { .. } => "LPOP",
            Command::RPop { .. } => "RPOP",
            Command::LLen { .. } => "LLEN",
            Command::LRange { .. } => "LRANGE",
            Command::LTrim { .. } => "LTRIM",
            Command::LIndex { .. } => "LINDEX",
            Command::LSet { .. } => "LSET",
            Command::LRem { .. } => "LREM",
            Command::RPopLPush { .. } => "RPOPLPUSH",
            Command::SAdd { .. } => "SADD",
            Command::SRem { .. } => "SREM",
            Command::SIsMember { .. } => "SISMEMBER",
            Command::SMembers { .. } => "SMEMBERS",
            Command::SCard { .. } => "SCARD",
            Command::SPop { .. } => "SPOP",
            Command::SRandMember { .. } => "SRANDMEMBER",
            Command::SMove { .. } => "SMOVE",
            Command::SInter { .. } => "SINTER",
            Command::SUnion { .. } => "SUNION",
            Command::SDiff { .. } => "SDIFF",
            Command::SInterStore { .. } => "SINTERSTORE",
            Command::SUnionStore { .. } => "SUNIONSTORE",
            Command::SDiffStore { .. } => "SDIFFSTORE",
            Command::HSet { .. } => "HSET",
            Command::HSetNx { .. } => "HSETNX",
            Command::HGet { .. } => "HGET",
            Command::HExists { .. } => "HEXISTS",
            Command::HDel { .. } => "HDEL",
            Command::HLen { .. } => "HLEN",
            Command::HGetAll { .. } => "HGETALL",
            Command::HKeys { .. } => "HKEYS",
            Command::HVals { .. } => "HVALS",
            Command::HMGet { .. } => "HMGET",
            Command::HMSet { .. } => "HMSET",
            Command::HIncrBy { .. } => "HINCRBY",
            Command::HDecrBy { .. } => "HDECRBY",
            Command::ZAdd { .. } => "ZADD",
            Command::ZRem { .. } => "ZREM",
            Command::ZIncrBy { .. } => "ZINCRBY",
            Command::ZDecrBy { .. } => "ZDECRBY",
            Command::ZScore { .. } => "ZSCORE",
            Command::ZRank { .. } => "ZRANK",
            Command::ZRevRank { .. } => "ZREVRANK",
            Command::ZCard { .. } => "ZCARD",
            Command::ZCount { .. } => "ZCOUNT",
            Command::ZRange { .. } => "ZRANGE",
            Command::ZRevRange { .. } => "ZREVRANGE",
            Command::ZRangeByScore { .. } => "ZRANGEBYSCORE",
            Command::ZRevRangeByScore { .. } => "ZREVRANGEBYSCORE",
            Command::ZRemRangeByRank { .. } => "ZREMRANGEBYRANK",
            Command::ZRemRangeByScore { .. } => "ZREMRANGEBYSCORE",
        }
    }

    /// First key the command addresses; `None` for keyless commands.
    pub fn key(&self) -> Option<&str> {
        match self {
            Command::DbSize | Command::FlushDb | Command::FlushAll => None,
            Command::MGet { keys } => keys.first().map(String::as_str),
            Command::MSet { entries } => entries.first().map(|(k, _)| k.as_str()),
            Command::Rename { from, .. } | Command::RenameNx { from, .. } => Some(from.as_str()),
            Command::RPopLPush { src, .. } | Command::SMove { src, .. } => Some(src.as_str()),
            Command::SInter { a, .. } | Command::SUnion { a, .. } | Command::SDiff { a, .. } => {
                Some(a.as_str())
            }
            Command::SInterStore { dst, .. }
            | Command::SUnionStore { dst, .. }
            | Command::SDiffStore { dst, .. } => Some(dst.as_str()),
            Command::Exists { key }
            | Command::Del { key }
            | Command::Type { key }
            | Command::Get { key }
            | Command::Set { key, .. }
            | Command::SetNx { key, .. }
            | Command::GetSet { key, .. }
            | Command::Incr { key }
            | Command::Decr { key }
            | Command::IncrBy { key, .. }
            | Command::DecrBy { key, .. }
            | Command::IncrByFloat { key, .. }
            | Command::Append { key, .. }
            | Command::StrLen { key }
            | Command::LPush { key, .. }
            | Command::RPush { key, .. }
            | Command::LPushX { key, .. }
            | Command::RPushX { key, .. }
            | Command::LPop { key }
            | Command::RPop { key }
            | Command::LLen { key }
            | Command::LRange { key, .. }
            | Command::LTrim { key, .. }
            | Command::LIndex { key, .. }
            | Command::LSet { key, .. }
            | Command::LRem { key, .. }
            | Command::SAdd { key, .. }
            | Command::SRem { key, .. }
            | Command::SIsMember { key, .. }
            | Command::SMembers { key }
            | Command::SCard { key }
            | Command::SPop { key }
            | Command::SRandMember { key }
            | Command::HSet { key, .. }
            | Command::HSetNx { key, .. }
            | Command::HGet { key, .. }
            | Command::HExists { key, .. }
            | Command::HDel { key, .. }
            | Command::HLen { key }
            | Command::HGetAll { key }
            | Command::HKeys { key }
            | Command::HVals { key }
            | Command::HMGet { key, .. }
            | Command::HMSet { key, .. }
            | Command::HIncrBy { key, .. }
            | Command::HDecrBy { key, .. }
            | Command::ZAdd { key, .. }
            | Command::ZRem { key, .. }
            | Command::ZIncrBy { key, .. }
            | Command::ZDecrBy { key, .. }
            | Command::ZScore { key, .. }
            | Command::ZRank { key, .. }
            | Command::ZRevRank { key, .. }
            | Command::ZCard { key }
            | Command::ZCount { key, .. }
            | Command::ZRange { key, .. }
            | Command::ZRevRange { key, .. }
            | Command::ZRangeByScore { key, .. }
            | Command::ZRevRangeByScore { key, .. }
            | Command::ZRemRangeByRank { key, .. }
            | Command::ZRemRangeByScore { key, .. } => Some(key.as_str()),
        }
    }
}

impl CommandExecute for Command {
    fn execute(
        &self,
        store: &mut InMemoryStore,
    ) -> StoreResult<Reply> {
        let reply = match self {
            Command::Exists { key } => Reply::from_bool(store.exists(key)),
            Command::Del { key } => Reply::from_bool(store.del(key)),
            Command::Rename { from, to } => {
                store.rename(from, to)?;
                Reply::Ok
            }
            Command::RenameNx { from, to } => Reply::from_bool(store.renamenx(from, to)?),
            Command::Type { key } => Reply::Str(
                store
                    .type_of(key)
                    .map_or("none", |t| t.as_str())
                    .to_string(),
            ),
            Command::DbSize => Reply::from_len(store.dbsize()),
            Command::FlushDb => {
                store.flushdb();
                Reply::Ok
            }
            Command::FlushAll => {
                store.flushall();
                Reply::Ok
            }

            Command::Get { key } => store.get(key)?.into(),
            Command::Set { key, value } => {
                store.set(key, value.clone())?;
                Reply::Ok
            }
            Command::SetNx { key, value } => Reply::from_bool(store.set_nx(key, value.clone())?),
            Command::GetSet { key, value } => store.get_set(key, value.clone())?.into(),
            Command::Incr { key } => Reply::Int(store.incr(key)?),
            Command::Decr { key } => Reply::Int(store.decr(key)?),
            Command::IncrBy { key, delta } => Reply::Int(store.incr_by(key, *delta)?),
            Command::DecrBy { key, delta } => Reply::Int(store.decr_by(key, *delta)?),
            Command::IncrByFloat { key, delta } => {
                Reply::Float(store.incr_by_float(key, *delta)?)
            }
            Command::Append { key, value } => Reply::from_len(store.append(key, value.clone())?),
            Command::StrLen { key } => Reply::from_len(store.strlen(key)?),
            Command::MGet { keys } => {
                let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                Reply::Array(store.mget(&keys).into_iter().map(Reply::from).collect())
            }
            Command::MSet { entries } => {
                store.mset(
                    entries
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.clone()))
                        .collect(),
                )?;
                Reply::Ok
            }

            Command::LPush { key, values } => {
                store.check_type(key, ValueType::List)?;
                let mut len = 0;
                for value in values {
                    len = store.lpush(key, value.as_str())?;
                }
                Reply::from_len(len)
            }
            Command::RPush { key, values } => {
                store.check_type(key, ValueType::List)?;
                let mut len = 0;
                for value in values {
                    len = store.rpush(key, value.as_str())?;
                }
                Reply::from_len(len)
            }
            Command::LPushX { key, value } => Reply::from_len(store.lpushx(key, value.as_str())?),
            Command::RPushX { key, value } => Reply::from_len(store.rpushx(key, value.as_str())?),
            Command::LPop { key } => store.lpop(key)?.into(),
            Command::RPop { key } => store.rpop(key)?.into(),
            Command::LLen { key } => Reply::from_len(store.llen(key)?),
            Command::LRange { key, start, end } => {
                Reply::from_strings(store.lrange(key, *start, *end)?)
            }
            Command::LTrim { key, start, end } => {
                Reply::from_bool(store.ltrim(key, *start, *end)?)
            }
            Command::LIndex { key, index } => store.lindex(key, *index)?.into(),
            Command::LSet { key, index, value } => {
                store.lset(key, *index, value.as_str())?;
                Reply::Ok
            }
            Command::LRem { key, count, value } => {
                Reply::from_len(store.lrem(key, *count, value)?)
            }
            Command::RPopLPush { src, dst } => store.rpoplpush(src, dst)?.into(),

            Command::SAdd { key, members } => {
                store.check_type(key, ValueType::Set)?;
                let mut added = 0;
                for member in members {
                    added += usize::from(store.sadd(key, member.as_str())?);
                }
                Reply::from_len(added)
            }
            Command::SRem { key, members } => {
                let mut removed = 0;
                for member in members {
                    removed += usize::from(store.srem(key, member)?);
                }
                Reply::from_len(removed)
            }
            Command::SIsMember { key, member } => Reply::from_bool(store.sismember(key, member)?),
            Command::SMembers { key } => Reply::from_strings(store.smembers(key)?),
            Command::SCard { key } => Reply::from_len(store.scard(key)?),
            Command::SPop { key } => store.spop(key)?.into(),
            Command::SRandMember { key } => store.srandmember(key)?.into(),
            Command::SMove { src, dst, member } => {
                Reply::from_bool(store.smove(src, dst, member)?)
            }
            Command::SInter { a, b } => Reply::from_strings(store.sinter(a, b)?),
            Command::SUnion { a, b } => Reply::from_strings(store.sunion(a, b)?),
            Command::SDiff { a, b } => Reply::from_strings(store.sdiff(a, b)?),
            Command::SInterStore { dst, a, b } => Reply::from_len(store.sinterstore(dst, a, b)?),
            Command::SUnionStore { dst, a, b } => Reply::from_len(store.sunionstore(dst, a, b)?),
            Command::SDiffStore { dst, a, b } => Reply::from_len(store.sdiffstore(dst, a, b)?),

            Command::HSet { key, pairs } => {
                store.check_type(key, ValueType::Hash)?;
                let mut added = 0;
                for (field, value) in pairs {
                    added += usize::from(store.hset(key, field.as_str(), value.as_str())?);
                }
                Reply::from_len(added)
            }
            Command::HSetNx { key, field, value } => {
                Reply::from_bool(store.hsetnx(key, field.as_str(), value.as_str())?)
            }
            Command::HGet { key, field } => store.hget(key, field)?.into(),
            Command::HExists { key, field } => Reply::from_bool(store.hexists(key, field)?),
            Command::HDel { key, fields } => {
                let mut removed = 0;
                for field in fields {
                    removed += usize::from(store.hdel(key, field)?);
                }
                Reply::from_len(removed)
            }
            Command::HLen { key } => Reply::from_len(store.hlen(key)?),
            Command::HGetAll { key } => Reply::Array(
                store
                    .hgetall(key)?
                    .into_iter()
                    .flat_map(|(f, v)| [Reply::Str(f), Reply::Str(v)])
                    .collect(),
            ),
            Command::HKeys { key } => Reply::from_strings(store.hkeys(key)?),
            Command::HVals { key } => Reply::from_strings(store.hvals(key)?),
            Command::HMGet { key, fields } => {
                let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
                Reply::Array(
                    store
                        .hmget(key, &fields)?
                        .into_iter()
                        .map(Reply::from)
                        .collect(),
                )
            }
            Command::HMSet { key, pairs } => {
                store.hmset(key, pairs.clone())?;
                Reply::Ok
            }
            Command::HIncrBy { key, field, delta } => {
                Reply::Int(store.hincr_by(key, field, *delta)?)
            }
            Command::HDecrBy { key, field, delta } => {
                Reply::Int(store.hdecr_by(key, field, *delta)?)
            }

            Command::ZAdd { key, entries } => {
                store.check_type(key, ValueType::ZSet)?;
                if let Some((score, _)) = entries.iter().find(|(s, _)| !s.is_finite()) {
                    return Err(StoreError::invalid(format!(
                        "score {score} is not a finite number"
                    )));
                }
                let mut added = 0;
                for (score, member) in entries {
                    added += usize::from(store.zadd(key, *score, member.as_str())?);
                }
                Reply::from_len(added)
            }
            Command::ZRem { key, members } => {
                let mut removed = 0;
                for member in members {
                    removed += usize::from(store.zrem(key, member)?);
                }
                Reply::from_len(removed)
            }
            Command::ZIncrBy { key, delta, member } => {
                Reply::Float(store.zincr_by(key, *delta, member.as_str())?)
            }
            Command::ZDecrBy { key, delta, member } => {
                Reply::Float(store.zdecr_by(key, *delta, member.as_str())?)
            }
            Command::ZScore { key, member } => store.zscore(key, member)?.into(),
            Command::ZRank { key, member } => store.zrank(key, member)?.into(),
            Command::ZRevRank { key, member } => store.zrevrank(key, member)?.into(),
            Command::ZCard { key } => Reply::from_len(store.zcard(key)?),
            Command::ZCount { key, start, end } => {
                Reply::from_len(store.zcount(key, *start, *end)?)
            }
            Command::ZRange {
                key,
                start,
                end,
                with_scores,
            } => {
                if *with_scores {
                    Reply::from_scored(store.zrange_with_scores(key, *start, *end)?)
                } else {
                    Reply::from_strings(store.zrange(key, *start, *end)?)
                }
            }
            Command::ZRevRange {
                key,
                start,
                end,
                with_scores,
            } => {
                if *with_scores {
                    Reply::from_scored(store.zrevrange_with_scores(key, *start, *end)?)
                } else {
                    Reply::from_strings(store.zrevrange(key, *start, *end)?)
                }
            }
            Command::ZRangeByScore {
                key,
                min,
                max,
                with_scores,
            } => {
                if *with_scores {
                    Reply::from_scored(store.zrange_by_score_with_scores(key, *min, *max)?)
                } else {
                    Reply::from_strings(store.zrange_by_score(key, *min, *max)?)
                }
            }
            Command::ZRevRangeByScore {
                key,
                min,
                max,
                with_scores,
            } => {
                if *with_scores {
                    Reply::from_scored(store.zrevrange_by_score_with_scores(key, *min, *max)?)
                } else {
                    Reply::from_strings(store.zrevrange_by_score(key, *min, *max)?)
                }
            }
            Command::ZRemRangeByRank { key, start, end } => {
                Reply::from_len(store.zrem_range_by_rank(key, *start, *end)?)
            }
            Command::ZRemRangeByScore { key, min, max } => {
                Reply::from_len(store.zrem_range_by_score(key, *min, *max)?)
            }
        };
        Ok(reply)
    }

    fn command_name(&self) -> &'static str {
        self.name()
    }

    fn command_key(&self) -> Option<&str> {
        self.key()
    }
}

/// Runs commands against a [`SharedStore`], remembering the last failure.
#[derive(Debug)]
pub struct CommandExecutor {
    store: SharedStore,
    slowlog_threshold: Option<Duration>,
    last_error: Option<StoreError>,
}

impl CommandExecutor {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            slowlog_threshold: None,
            last_error: None,
        }
    }

    /// Builds a fresh store and executor from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let store = InMemoryStore::from_config(&settings.store);
        Self::new(store.into()).with_slowlog_threshold(settings.slowlog.threshold())
    }

    /// Commands running longer than `threshold` are logged at `warn`.
    pub fn with_slowlog_threshold(
        mut self,
        threshold: Option<Duration>,
    ) -> Self {
        self.slowlog_threshold = threshold;
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Most recent failure, kept until the next failing command.
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    /// Executes one command under the store lock.
    pub fn execute(
        &mut self,
        command: &Command,
    ) -> StoreResult<Reply> {
        let start = Instant::now();
        let name = command.command_name();
        let key = command.command_key().unwrap_or_default();

        let result = self.store.with(|store| command.execute(store));
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => debug!(command = name, key, ?elapsed, "command executed"),
            Err(err) => {
                debug!(command = name, key, ?elapsed, error = %err, "command failed");
                self.last_error = Some(err.clone());
            }
        }

        if self.slowlog_threshold.is_some_and(|t| elapsed > t) {
            warn!(
                command = name,
                key,
                duration_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                "slow command"
            );
        }
        result
    }

    /// Parses and executes a textual command such as `["ZADD", "z", "1", "a"]`.
    pub fn execute_str(
        &mut self,
        args: &[&str],
    ) -> StoreResult<Reply> {
        match parse_command(args) {
            Ok(command) => self.execute(&command),
            Err(err) => {
                let err = StoreError::from(err);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(SharedStore::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec(
        executor: &mut CommandExecutor,
        args: &[&str],
    ) -> Reply {
        executor.execute_str(args).unwrap()
    }

    #[test]
    fn test_name_and_key() {
        let cmd = Command::ZAdd {
            key: "z".into(),
            entries: vec![(1.0, "a".into())],
        };
        assert_eq!(cmd.name(), "ZADD");
        assert_eq!(cmd.key(), Some("z"));
        assert_eq!(Command::DbSize.key(), None);
        assert_eq!(
            Command::Rename {
                from: "a".into(),
                to: "b".into()
            }
            .key(),
            Some("a")
        );
    }

    #[test]
    fn test_string_round_trip() {
        let mut ex = CommandExecutor::default();
        assert_eq!(exec(&mut ex, &["SET", "k", "10"]), Reply::Ok);
        assert_eq!(exec(&mut ex, &["INCRBY", "k", "5"]), Reply::Int(15));
        assert_eq!(exec(&mut ex, &["GET", "k"]), Reply::Int(15));
        assert_eq!(exec(&mut ex, &["TYPE", "k"]), Reply::Str("string".into()));
        assert_eq!(exec(&mut ex, &["TYPE", "nope"]), Reply::Str("none".into()));
    }

    #[test]
    fn test_variadic_push_and_add() {
        let mut ex = CommandExecutor::default();
        assert_eq!(exec(&mut ex, &["RPUSH", "l", "a", "b", "c"]), Reply::Int(3));
        assert_eq!(
            exec(&mut ex, &["LRANGE", "l", "0", "-1"]),
            Reply::from_strings(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(exec(&mut ex, &["SADD", "s", "x", "y", "x"]), Reply::Int(2));
        assert_eq!(exec(&mut ex, &["HSET", "h", "f1", "1", "f2", "2"]), Reply::Int(2));
        assert_eq!(exec(&mut ex, &["HDEL", "h", "f1", "zz"]), Reply::Int(1));
    }

    #[test]
    fn test_zadd_with_bad_score_touches_nothing() {
        let mut ex = CommandExecutor::default();
        let err = ex
            .execute(&Command::ZAdd {
                key: "z".into(),
                entries: vec![(1.0, "a".into()), (f64::NAN, "b".into())],
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue(_)));
        assert_eq!(exec(&mut ex, &["EXISTS", "z"]), Reply::Int(0));
    }

    #[test]
    fn test_zrange_withscores() {
        let mut ex = CommandExecutor::default();
        exec(&mut ex, &["ZADD", "z", "2", "b", "1", "a"]);
        assert_eq!(
            exec(&mut ex, &["zrange", "z", "0", "-1", "withscores"]),
            Reply::Array(vec![
                Reply::Str("a".into()),
                Reply::Float(1.0),
                Reply::Str("b".into()),
                Reply::Float(2.0),
            ])
        );
        assert_eq!(exec(&mut ex, &["ZRANK", "z", "b"]), Reply::Int(1));
        assert_eq!(exec(&mut ex, &["ZSCORE", "z", "missing"]), Reply::Nil);
    }

    #[test]
    fn test_last_error_is_recorded() {
        let mut ex = CommandExecutor::default();
        assert!(ex.last_error().is_none());

        exec(&mut ex, &["SADD", "s", "m"]);
        let err = ex.execute_str(&["GET", "s"]).unwrap_err();
        assert!(matches!(err, StoreError::WrongType { .. }));
        assert_eq!(ex.last_error(), Some(&err));

        let err = ex.execute_str(&["NOPE"]).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
        assert_eq!(ex.last_error(), Some(&err));

        // Successful commands leave the record in place.
        exec(&mut ex, &["DBSIZE"]);
        assert_eq!(ex.last_error(), Some(&err));
    }

    #[test]
    fn test_from_settings_applies_slowlog() {
        let mut settings = Settings::default();
        settings.slowlog.threshold_us = 0;
        let mut ex = CommandExecutor::from_settings(&settings);
        assert_eq!(ex.slowlog_threshold, Some(Duration::ZERO));
        assert_eq!(exec(&mut ex, &["SET", "k", "v"]), Reply::Ok);
    }
}
