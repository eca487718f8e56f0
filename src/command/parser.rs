//! Textual command parsing: `["ZADD", "board", "10", "alice"]` → [`Command`].
//!
//! Command names are case-insensitive. Numeric arguments are parsed here,
//! so a malformed number never reaches the store.

use std::str::FromStr;

use super::Command;
use crate::{database::Value, error::ParseError};

const WITHSCORES: &str = "WITHSCORES";

/// Parses a tokenised command line.
pub fn parse_command(args: &[&str]) -> Result<Command, ParseError> {
    let (&head, rest) = args.split_first().ok_or(ParseError::EmptyCommand)?;
    let upper = head.to_ascii_uppercase();
    let p = Args::new(rest);

    let cmd = match upper.as_str() {
        "EXISTS" => Command::Exists { key: p.exact("EXISTS", 1)?.s(0) },
        "DEL" => Command::Del { key: p.exact("DEL", 1)?.s(0) },
        "RENAME" => {
            let a = p.exact("RENAME", 2)?;
            Command::Rename { from: a.s(0), to: a.s(1) }
        }
        "RENAMENX" => {
            let a = p.exact("RENAMENX", 2)?;
            Command::RenameNx { from: a.s(0), to: a.s(1) }
        }
        "TYPE" => Command::Type { key: p.exact("TYPE", 1)?.s(0) },
        "DBSIZE" => {
            p.exact("DBSIZE", 0)?;
            Command::DbSize
        }
        "FLUSHDB" => {
            p.exact("FLUSHDB", 0)?;
            Command::FlushDb
        }
        "FLUSHALL" => {
            p.exact("FLUSHALL", 0)?;
            Command::FlushAll
        }

        "GET" => Command::Get { key: p.exact("GET", 1)?.s(0) },
        "SET" => {
            let a = p.exact("SET", 2)?;
            Command::Set { key: a.s(0), value: a.value(1) }
        }
        "SETNX" => {
            let a = p.exact("SETNX", 2)?;
            Command::SetNx { key: a.s(0), value: a.value(1) }
        }
        "GETSET" => {
            let a = p.exact("GETSET", 2)?;
            Command::GetSet { key: a.s(0), value: a.value(1) }
        }
        "INCR" => Command::Incr { key: p.exact("INCR", 1)?.s(0) },
        "DECR" => Command::Decr { key: p.exact("DECR", 1)?.s(0) },
        "INCRBY" => {
            let a = p.exact("INCRBY", 2)?;
            Command::IncrBy { key: a.s(0), delta: a.num("INCRBY", 1)? }
        }
        "DECRBY" => {
            let a = p.exact("DECRBY", 2)?;
            Command::DecrBy { key: a.s(0), delta: a.num("DECRBY", 1)? }
        }
        "INCRBYFLOAT" => {
            let a = p.exact("INCRBYFLOAT", 2)?;
            Command::IncrByFloat { key: a.s(0), delta: a.num("INCRBYFLOAT", 1)? }
        }
        "APPEND" => {
            let a = p.exact("APPEND", 2)?;
            Command::Append { key: a.s(0), value: a.value(1) }
        }
        "STRLEN" => Command::StrLen { key: p.exact("STRLEN", 1)?.s(0) },
        "MGET" => Command::MGet { keys: p.at_least("MGET", 1)?.all() },
        "MSET" => Command::MSet {
            entries: p
                .pairs("MSET", 0)?
                .into_iter()
                .map(|(k, v)| (k, Value::Str(v)))
                .collect(),
        },

        "LPUSH" => {
            let a = p.at_least("LPUSH", 2)?;
            Command::LPush { key: a.s(0), values: a.tail(1) }
        }
        "RPUSH" => {
            let a = p.at_least("RPUSH", 2)?;
            Command::RPush { key: a.s(0), values: a.tail(1) }
        }
        "LPUSHX" => {
            let a = p.exact("LPUSHX", 2)?;
            Command::LPushX { key: a.s(0), value: a.s(1) }
        }
        "RPUSHX" => {
            let a = p.exact("RPUSHX", 2)?;
            Command::RPushX { key: a.s(0), value: a.s(1) }
        }
        "LPOP" => Command::LPop { key: p.exact("LPOP", 1)?.s(0) },
        "RPOP" => Command::RPop { key: p.exact("RPOP", 1)?.s(0) },
        "LLEN" => Command::LLen { key: p.exact("LLEN", 1)?.s(0) },
        "LRANGE" => {
            let a = p.exact("LRANGE", 3)?;
            Command::LRange {
                key: a.s(0),
                start: a.num("LRANGE", 1)?,
                end: a.num("LRANGE", 2)?,
            }
        }
        "LTRIM" => {
            let a = p.exact("LTRIM", 3)?;
            Command::LTrim {
                key: a.s(0),
                start: a.num("LTRIM", 1)?,
                end: a.num("LTRIM", 2)?,
            }
        }
        "LINDEX" => {
            let a = p.exact("LINDEX", 2)?;
            Command::LIndex { key: a.s(0), index: a.num("LINDEX", 1)? }
        }
        "LSET" => {
            let a = p.exact("LSET", 3)?;
            Command::LSet {
                key: a.s(0),
                index: a.num("LSET", 1)?,
                value: a.s(2),
            }
        }
        "LREM" => {
            let a = p.exact("LREM", 3)?;
            Command::LRem {
                key: a.s(0),
                count: a.num("LREM", 1)?,
                value: a.s(2),
            }
        }
        "RPOPLPUSH" => {
            let a = p.exact("RPOPLPUSH", 2)?;
            Command::RPopLPush { src: a.s(0), dst: a.s(1) }
        }

        "SADD" => {
            let a = p.at_least("SADD", 2)?;
            Command::SAdd { key: a.s(0), members: a.tail(1) }
        }
        "SREM" => {
            let a = p.at_least("SREM", 2)?;
            Command::SRem { key: a.s(0), members: a.tail(1) }
        }
        "SISMEMBER" => {
            let a = p.exact("SISMEMBER", 2)?;
            Command::SIsMember { key: a.s(0), member: a.s(1) }
        }
        "SMEMBERS" => Command::SMembers { key: p.exact("SMEMBERS", 1)?.s(0) },
        "SCARD" => Command::SCard { key: p.exact("SCARD", 1)?.s(0) },
        "SPOP" => Command::SPop { key: p.exact("SPOP", 1)?.s(0) },
        "SRANDMEMBER" => Command::SRandMember { key: p.exact("SRANDMEMBER", 1)?.s(0) },
        "SMOVE" => {
            let a = p.exact("SMOVE", 3)?;
            Command::SMove { src: a.s(0), dst: a.s(1), member: a.s(2) }
        }
        "SINTER" => {
            let a = p.exact("SINTER", 2)?;
            Command::SInter { a: a.s(0), b: a.s(1) }
        }
        "SUNION" => {
            let a = p.exact("SUNION", 2)?;
            Command::SUnion { a: a.s(0), b: a.s(1) }
        }
        "SDIFF" => {
            let a = p.exact("SDIFF", 2)?;
            Command::SDiff { a: a.s(0), b: a.s(1) }
        }
        "SINTERSTORE" => {
            let a = p.exact("SINTERSTORE", 3)?;
            Command::SInterStore { dst: a.s(0), a: a.s(1), b: a.s(2) }
        }
        "SUNIONSTORE" => {
            let a = p.exact("SUNIONSTORE", 3)?;
            Command::SUnionStore { dst: a.s(0), a: a.s(1), b: a.s(2) }
        }
        "SDIFFSTORE" => {
            let a = p.exact("SDIFFSTORE", 3)?;
            Command::SDiffStore { dst: a.s(0), a: a.s(1), b: a.s(2) }
        }

        "HSET" => {
            let key = p.at_least("HSET", 3)?.s(0);
            Command::HSet { key, pairs: p.pairs("HSET", 1)? }
        }
        "HSETNX" => {
            let a = p.exact("HSETNX", 3)?;
            Command::HSetNx { key: a.s(0), field: a.s(1), value: a.s(2) }
        }
        "HGET" => {
            let a = p.exact("HGET", 2)?;
            Command::HGet { key: a.s(0), field: a.s(1) }
        }
        "HEXISTS" => {
            let a = p.exact("HEXISTS", 2)?;
            Command::HExists { key: a.s(0), field: a.s(1) }
        }
        "HDEL" => {
            let a = p.at_least("HDEL", 2)?;
            Command::HDel { key: a.s(0), fields: a.tail(1) }
        }
        "HLEN" => Command::HLen { key: p.exact("HLEN", 1)?.s(0) },
        "HGETALL" => Command::HGetAll { key: p.exact("HGETALL", 1)?.s(0) },
        "HKEYS" => Command::HKeys { key: p.exact("HKEYS", 1)?.s(0) },
        "HVALS" => Command::HVals { key: p.exact("HVALS", 1)?.s(0) },
        "HMGET" => {
            let a = p.at_least("HMGET", 2)?;
            Command::HMGet { key: a.s(0), fields: a.tail(1) }
        }
        "HMSET" => {
            let key = p.at_least("HMSET", 3)?.s(0);
            Command::HMSet { key, pairs: p.pairs("HMSET", 1)? }
        }
        "HINCRBY" => {
            let a = p.exact("HINCRBY", 3)?;
            Command::HIncrBy {
                key: a.s(0),
                field: a.s(1),
                delta: a.num("HINCRBY", 2)?,
            }
        }
        "HDECRBY" => {
            let a = p.exact("HDECRBY", 3)?;
            Command::HDecrBy {
                key: a.s(0),
                field: a.s(1),
                delta: a.num("HDECRBY", 2)?,
            }
        }

        "ZADD" => {
            let key = p.at_least("ZADD", 3)?.s(0);
            let entries = p
                .pairs("ZADD", 1)?
                .into_iter()
                .map(|(score, member)| parse_num("ZADD", &score).map(|s| (s, member)))
                .collect::<Result<Vec<_>, _>>()?;
            Command::ZAdd { key, entries }
        }
        "ZREM" => {
            let a = p.at_least("ZREM", 2)?;
            Command::ZRem { key: a.s(0), members: a.tail(1) }
        }
        "ZINCRBY" => {
            let a = p.exact("ZINCRBY", 3)?;
            Command::ZIncrBy {
                key: a.s(0),
                delta: a.num("ZINCRBY", 1)?,
                member: a.s(2),
            }
        }
        "ZDECRBY" => {
            let a = p.exact("ZDECRBY", 3)?;
            Command::ZDecrBy {
                key: a.s(0),
                delta: a.num("ZDECRBY", 1)?,
                member: a.s(2),
            }
        }
        "ZSCORE" => {
            let a = p.exact("ZSCORE", 2)?;
            Command::ZScore { key: a.s(0), member: a.s(1) }
        }
        "ZRANK" => {
            let a = p.exact("ZRANK", 2)?;
            Command::ZRank { key: a.s(0), member: a.s(1) }
        }
        "ZREVRANK" => {
            let a = p.exact("ZREVRANK", 2)?;
            Command::ZRevRank { key: a.s(0), member: a.s(1) }
        }
        "ZCARD" => Command::ZCard { key: p.exact("ZCARD", 1)?.s(0) },
        "ZCOUNT" => {
            let a = p.exact("ZCOUNT", 3)?;
            Command::ZCount {
                key: a.s(0),
                start: a.num("ZCOUNT", 1)?,
                end: a.num("ZCOUNT", 2)?,
            }
        }
        "ZRANGE" => {
            let (a, with_scores) = p.with_scores("ZRANGE", 3)?;
            Command::ZRange {
                key: a.s(0),
                start: a.num("ZRANGE", 1)?,
                end: a.num("ZRANGE", 2)?,
                with_scores,
            }
        }
        "ZREVRANGE" => {
            let (a, with_scores) = p.with_scores("ZREVRANGE", 3)?;
            Command::ZRevRange {
                key: a.s(0),
                start: a.num("ZREVRANGE", 1)?,
                end: a.num("ZREVRANGE", 2)?,
                with_scores,
            }
        }
        "ZRANGEBYSCORE" => {
            let (a, with_scores) = p.with_scores("ZRANGEBYSCORE", 3)?;
            Command::ZRangeByScore {
                key: a.s(0),
                min: a.num("ZRANGEBYSCORE", 1)?,
                max: a.num("ZRANGEBYSCORE", 2)?,
                with_scores,
            }
        }
        "ZREVRANGEBYSCORE" => {
            let (a, with_scores) = p.with_scores("ZREVRANGEBYSCORE", 3)?;
            Command::ZRevRangeByScore {
                key: a.s(0),
                min: a.num("ZREVRANGEBYSCORE", 1)?,
                max: a.num("ZREVRANGEBYSCORE", 2)?,
                with_scores,
            }
        }
        "ZREMRANGEBYRANK" => {
            let a = p.exact("ZREMRANGEBYRANK", 3)?;
            Command::ZRemRangeByRank {
                key: a.s(0),
                start: a.num("ZREMRANGEBYRANK", 1)?,
                end: a.num("ZREMRANGEBYRANK", 2)?,
            }
        }
        "ZREMRANGEBYSCORE" => {
            let a = p.exact("ZREMRANGEBYSCORE", 3)?;
            Command::ZRemRangeByScore {
                key: a.s(0),
                min: a.num("ZREMRANGEBYSCORE", 1)?,
                max: a.num("ZREMRANGEBYSCORE", 2)?,
            }
        }

        _ => return Err(ParseError::UnknownCommand(head.to_string())),
    };
    Ok(cmd)
}

/// Arguments after the command name.
#[derive(Clone, Copy)]
struct Args<'a> {
    items: &'a [&'a str],
}

impl<'a> Args<'a> {
    fn new(items: &'a [&'a str]) -> Self {
        Self { items }
    }

    fn exact(
        self,
        name: &'static str,
        n: usize,
    ) -> Result<Self, ParseError> {
        if self.items.len() == n {
            Ok(self)
        } else {
            Err(ParseError::WrongArgCount(name, n))
        }
    }

    fn at_least(
        self,
        name: &'static str,
        n: usize,
    ) -> Result<Self, ParseError> {
        if self.items.len() >= n {
            Ok(self)
        } else {
            Err(ParseError::WrongArgCount(name, n))
        }
    }

    /// Exactly `n` arguments, optionally followed by `WITHSCORES`.
    fn with_scores(
        self,
        name: &'static str,
        n: usize,
    ) -> Result<(Self, bool), ParseError> {
        match self.items.len() {
            len if len == n => Ok((self, false)),
            len if len == n + 1 => {
                let flag = self.items[n];
                if flag.eq_ignore_ascii_case(WITHSCORES) {
                    Ok((Self::new(&self.items[..n]), true))
                } else {
                    Err(ParseError::UnexpectedArgument(name, flag.to_string()))
                }
            }
            _ => Err(ParseError::WrongArgCount(name, n)),
        }
    }

    /// Arguments from `offset` on, taken two at a time.
    fn pairs(
        self,
        name: &'static str,
        offset: usize,
    ) -> Result<Vec<(String, String)>, ParseError> {
        let rest = self.items.get(offset..).unwrap_or_default();
        if rest.is_empty() {
            return Err(ParseError::WrongArgCount(name, offset + 2));
        }
        if rest.len() % 2 != 0 {
            return Err(ParseError::UnpairedArguments(name));
        }
        Ok(rest
            .chunks_exact(2)
            .map(|c| (c[0].to_string(), c[1].to_string()))
            .collect())
    }

    fn s(
        &self,
        i: usize,
    ) -> String {
        self.items[i].to_string()
    }

    fn value(
        &self,
        i: usize,
    ) -> Value {
        Value::Str(self.s(i))
    }

    fn num<T: FromStr>(
        &self,
        name: &'static str,
        i: usize,
    ) -> Result<T, ParseError> {
        parse_num(name, self.items[i])
    }

    fn tail(
        &self,
        from: usize,
    ) -> Vec<String> {
        self.items[from..].iter().map(|s| s.to_string()).collect()
    }

    fn all(&self) -> Vec<String> {
        self.tail(0)
    }
}

/// Parses a number, accepting `inf`/`-inf` (and `+inf`) for floats.
fn parse_num<T: FromStr>(
    name: &'static str,
    raw: &str,
) -> Result<T, ParseError> {
    raw.trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber(name, raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_names() {
        assert_eq!(
            parse_command(&["get", "k"]).unwrap(),
            Command::Get { key: "k".into() }
        );
        assert_eq!(
            parse_command(&["ZcArD", "z"]).unwrap(),
            Command::ZCard { key: "z".into() }
        );
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(parse_command(&[]), Err(ParseError::EmptyCommand));
        assert_eq!(
            parse_command(&["FROB", "x"]),
            Err(ParseError::UnknownCommand("FROB".into()))
        );
    }

    #[test]
    fn test_arity() {
        assert_eq!(
            parse_command(&["GET"]),
            Err(ParseError::WrongArgCount("GET", 1))
        );
        assert_eq!(
            parse_command(&["DBSIZE", "x"]),
            Err(ParseError::WrongArgCount("DBSIZE", 0))
        );
        assert_eq!(
            parse_command(&["HSET", "h", "f"]),
            Err(ParseError::WrongArgCount("HSET", 3))
        );
        assert_eq!(
            parse_command(&["HSET", "h", "f", "v", "g"]),
            Err(ParseError::UnpairedArguments("HSET"))
        );
    }

    #[test]
    fn test_numeric_arguments() {
        assert_eq!(
            parse_command(&["LRANGE", "l", "0", "-1"]).unwrap(),
            Command::LRange {
                key: "l".into(),
                start: 0,
                end: -1
            }
        );
        assert_eq!(
            parse_command(&["INCRBY", "n", "ten"]),
            Err(ParseError::InvalidNumber("INCRBY", "ten".into()))
        );
        assert_eq!(
            parse_command(&["ZRANGEBYSCORE", "z", "-inf", "+inf"]).unwrap(),
            Command::ZRangeByScore {
                key: "z".into(),
                min: f64::NEG_INFINITY,
                max: f64::INFINITY,
                with_scores: false,
            }
        );
    }

    #[test]
    fn test_zadd_pairs() {
        assert_eq!(
            parse_command(&["ZADD", "z", "1.5", "a", "2", "b"]).unwrap(),
            Command::ZAdd {
                key: "z".into(),
                entries: vec![(1.5, "a".into()), (2.0, "b".into())],
            }
        );
        assert_eq!(
            parse_command(&["ZADD", "z", "x", "a"]),
            Err(ParseError::InvalidNumber("ZADD", "x".into()))
        );
    }

    #[test]
    fn test_withscores_flag() {
        assert_eq!(
            parse_command(&["ZREVRANGE", "z", "0", "-1", "WithScores"]).unwrap(),
            Command::ZRevRange {
                key: "z".into(),
                start: 0,
                end: -1,
                with_scores: true,
            }
        );
        assert_eq!(
            parse_command(&["ZRANGE", "z", "0", "-1", "LIMIT"]),
            Err(ParseError::UnexpectedArgument("ZRANGE", "LIMIT".into()))
        );
    }

    #[test]
    fn test_mset_pairs() {
        assert_eq!(
            parse_command(&["MSET", "a", "1", "b", "2"]).unwrap(),
            Command::MSet {
                entries: vec![
                    ("a".into(), Value::from("1")),
                    ("b".into(), Value::from("2")),
                ],
            }
        );
        assert_eq!(
            parse_command(&["MSET", "a"]),
            Err(ParseError::UnpairedArguments("MSET"))
        );
    }
}
