//! Sorted set commands
//!
//! Scores are sent as decimal text; infinite bounds become `+inf` / `-inf`.

use crate::client::Client;
use crate::error::{RespError, Result};
use crate::protocol::{Bulk, Command};

/// LIMIT offset count for by-score ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub offset: i64,
    pub count: i64,
}

impl Limit {
    pub fn new(offset: i64, count: i64) -> Self {
        Self { offset, count }
    }
}

fn score_arg(score: f64) -> String {
    if score == f64::INFINITY {
        "+inf".to_string()
    } else if score == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        score.to_string()
    }
}

/// Split a WITHSCORES reply into (member, score) pairs
fn with_scores(items: Vec<Option<Bulk>>) -> Result<Vec<(Bulk, f64)>> {
    let mut pairs = Vec::with_capacity(items.len() / 2);
    let mut items = items.into_iter().flatten();
    while let Some(member) = items.next() {
        let Some(score) = items.next() else {
            break;
        };
        pairs.push((member, score.parse::<f64>()?));
    }
    Ok(pairs)
}

impl Client {
    /// ZADD a single member; returns 1 if it was new
    pub fn zadd(&self, key: &str, score: f64, member: impl AsRef<[u8]>) -> Result<i64> {
        let command = Command::new("ZADD")
            .with_arg(key)
            .with_arg(score_arg(score))
            .with_arg(member);
        self.count(&command)
    }

    /// ZCARD
    pub fn zcard(&self, key: &str) -> Result<i64> {
        self.count(&Command::new("ZCARD").with_arg(key))
    }

    /// ZCOUNT members with `min <= score <= max`
    pub fn zcount(&self, key: &str, min: f64, max: f64) -> Result<i64> {
        let command = Command::new("ZCOUNT")
            .with_arg(key)
            .with_arg(score_arg(min))
            .with_arg(score_arg(max));
        self.count(&command)
    }

    /// ZINCRBY; returns the new score
    pub fn zincr_by(&self, key: &str, delta: f64, member: impl AsRef<[u8]>) -> Result<f64> {
        let command = Command::new("ZINCRBY")
            .with_arg(key)
            .with_arg(score_arg(delta))
            .with_arg(member);
        match self.execute_bulk(&command)? {
            Some(score) => score.parse(),
            None => Err(RespError::UnexpectedResponse {
                expected: "score",
                got: "nil bulk string",
            }),
        }
    }

    /// ZRANGE by index, ascending
    pub fn zrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Bulk>> {
        self.members(index_range("ZRANGE", key, start, stop, false))
    }

    /// ZRANGE ... WITHSCORES
    pub fn zrange_with_scores(&self, key: &str, start: i64, stop: i64) -> Result<Vec<(Bulk, f64)>> {
        with_scores(self.execute_array(&index_range("ZRANGE", key, start, stop, true))?)
    }

    /// ZREVRANGE by index, descending
    pub fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Bulk>> {
        self.members(index_range("ZREVRANGE", key, start, stop, false))
    }

    /// ZREVRANGE ... WITHSCORES
    pub fn zrevrange_with_scores(&self, key: &str, start: i64, stop: i64) -> Result<Vec<(Bulk, f64)>> {
        with_scores(self.execute_array(&index_range("ZREVRANGE", key, start, stop, true))?)
    }

    /// ZRANGEBYSCORE `min max` [LIMIT]
    pub fn zrange_by_score(&self, key: &str, min: f64, max: f64, limit: Option<Limit>) -> Result<Vec<Bulk>> {
        self.members(score_range("ZRANGEBYSCORE", key, min, max, false, limit))
    }

    /// ZRANGEBYSCORE ... WITHSCORES
    pub fn zrange_by_score_with_scores(
        &self,
        key: &str,
        min: f64,
        max: f64,
        limit: Option<Limit>,
    ) -> Result<Vec<(Bulk, f64)>> {
        with_scores(self.execute_array(&score_range("ZRANGEBYSCORE", key, min, max, true, limit))?)
    }

    /// ZREVRANGEBYSCORE `max min` [LIMIT]
    pub fn zrev_range_by_score(&self, key: &str, max: f64, min: f64, limit: Option<Limit>) -> Result<Vec<Bulk>> {
        self.members(score_range("ZREVRANGEBYSCORE", key, max, min, false, limit))
    }

    /// ZREVRANGEBYSCORE ... WITHSCORES
    pub fn zrev_range_by_score_with_scores(
        &self,
        key: &str,
        max: f64,
        min: f64,
        limit: Option<Limit>,
    ) -> Result<Vec<(Bulk, f64)>> {
        with_scores(self.execute_array(&score_range("ZREVRANGEBYSCORE", key, max, min, true, limit))?)
    }

    /// ZRANK; `None` if the member is absent
    pub fn zrank(&self, key: &str, member: impl AsRef<[u8]>) -> Result<Option<i64>> {
        self.execute_integer(&Command::new("ZRANK").with_arg(key).with_arg(member))
    }

    /// ZREVRANK; `None` if the member is absent
    pub fn zrevrank(&self, key: &str, member: impl AsRef<[u8]>) -> Result<Option<i64>> {
        self.execute_integer(&Command::new("ZREVRANK").with_arg(key).with_arg(member))
    }

    /// ZREM one or more members; returns how many were removed
    pub fn zrem(&self, key: &str, members: &[&str]) -> Result<i64> {
        let mut command = Command::new("ZREM");
        command.arg_str(key);
        for member in members {
            command.arg_str(member);
        }
        self.count(&command)
    }

    /// ZREMRANGEBYRANK
    pub fn zrem_range_by_rank(&self, key: &str, start: i64, stop: i64) -> Result<i64> {
        let command = Command::new("ZREMRANGEBYRANK")
            .with_arg(key)
            .with_int(start)
            .with_int(stop);
        self.count(&command)
    }

    /// ZREMRANGEBYSCORE
    pub fn zrem_range_by_score(&self, key: &str, min: f64, max: f64) -> Result<i64> {
        let command = Command::new("ZREMRANGEBYSCORE")
            .with_arg(key)
            .with_arg(score_arg(min))
            .with_arg(score_arg(max));
        self.count(&command)
    }

    /// ZSCORE; `None` if the member is absent
    pub fn zscore(&self, key: &str, member: impl AsRef<[u8]>) -> Result<Option<f64>> {
        self.execute_bulk(&Command::new("ZSCORE").with_arg(key).with_arg(member))?
            .map(|score| score.parse())
            .transpose()
    }

    fn members(&self, command: Command) -> Result<Vec<Bulk>> {
        Ok(self.execute_array(&command)?.into_iter().flatten().collect())
    }
}

fn index_range(name: &str, key: &str, start: i64, stop: i64, scores: bool) -> Command {
    let mut command = Command::new(name);
    command.arg_str(key).arg_int(start).arg_int(stop);
    if scores {
        command.arg_str("WITHSCORES");
    }
    command
}

fn score_range(name: &str, key: &str, from: f64, to: f64, scores: bool, limit: Option<Limit>) -> Command {
    let mut command = Command::new(name);
    command
        .arg_str(key)
        .arg_str(&score_arg(from))
        .arg_str(&score_arg(to));
    if scores {
        command.arg_str("WITHSCORES");
    }
    if let Some(limit) = limit {
        command
            .arg_str("LIMIT")
            .arg_int(limit.offset)
            .arg_int(limit.count);
    }
    command
}
