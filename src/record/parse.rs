use crate::record::row::{Record, RunKey};
use anyhow::Context;
use regex::Regex;

/// Member names look like `iozone-r1024-t8.log`: block size after `-r`,
/// thread count after `-t`.
const NAME_PATTERN: &str = r"(?i)iozone-r([0-9]+)-t([0-9]+)";

/// Throughput lines carry a quoted label followed by a KB/s figure:
///
/// "Initial write"  1048576.00
///
/// Anchored at line start; only the leading number after the closing quote
/// is captured.
const THROUGHPUT_PATTERN: &str = r#"(?i)^".*"\s*([0-9]+\.[0-9]+)"#;

/// Compiled patterns, built once and passed into the parse stage.
#[derive(Debug)]
pub struct RecordPatterns {
    name: Regex,
    throughput: Regex,
}

impl RecordPatterns {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            name: Regex::new(NAME_PATTERN).context("compile member name pattern")?,
            throughput: Regex::new(THROUGHPUT_PATTERN).context("compile throughput pattern")?,
        })
    }

    /// Extract the run key from a member name, if it follows the naming
    /// convention.
    pub fn run_key(&self, name: &str) -> Option<RunKey> {
        let caps = self.name.captures(name)?;
        let bs = caps.get(1)?.as_str().parse().ok()?;
        let threads = caps.get(2)?.as_str().parse().ok()?;
        Some(RunKey { bs, threads })
    }
}

/// Parse one log file into a record.
///
/// Values are collected in file order and converted from KB/s to MB/s.
/// Lines that do not match the throughput pattern are ignored. Whether the
/// record is usable (named run, six values) is the aggregator's call, not
/// ours.
pub fn parse_record(name: &str, content: &str, patterns: &RecordPatterns) -> Record {
    let key = patterns.run_key(name);
    if key.is_none() {
        tracing::debug!("member {name} does not match the run naming convention");
    }

    let mut throughput = Vec::new();
    for line in content.lines() {
        if let Some(caps) = patterns.throughput.captures(line) {
            match caps[1].parse::<f64>() {
                Ok(kb_per_sec) => throughput.push(kb_per_sec / 1024.0),
                Err(err) => {
                    tracing::warn!("bad throughput figure in {name}: {:?}: {err}", &caps[1]);
                }
            }
        }
    }

    Record {
        source: name.to_string(),
        key,
        throughput,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn patterns() -> RecordPatterns {
        RecordPatterns::new().unwrap()
    }

    #[test]
    fn run_key_round_trips_through_member_name() {
        let p = patterns();
        for (bs, threads) in [(4, 1), (128, 4), (1024, 8), (2048, 16)] {
            let name = format!("iozone-r{bs}-t{threads}.log");
            let key = p.run_key(&name).unwrap();
            assert_eq!(key, RunKey { bs, threads });
            assert_eq!(format!("iozone-r{}-t{}", key.bs, key.threads), name[..name.len() - 4].to_string());
        }
    }

    #[test]
    fn run_key_is_case_insensitive_and_prefix_tolerant() {
        let p = patterns();
        assert_eq!(
            p.run_key("results/IOZone-r512-t2-host1.log"),
            Some(RunKey { bs: 512, threads: 2 })
        );
    }

    #[test]
    fn unconventional_name_yields_no_key() {
        let p = patterns();
        let rec = parse_record("notes.log", "\"Read\"  2048.00\n", &p);
        assert_eq!(rec.key, None);
        assert_eq!(rec.throughput, vec![2.0]);
        assert!(!rec.is_complete());
    }

    #[test]
    fn throughput_is_converted_from_kb_to_mb() {
        let p = patterns();
        let rec = parse_record("iozone-r128-t4.log", "\"Initial write\"  1536.00 kB/s\n", &p);
        assert_eq!(rec.throughput, vec![1.5]);
    }

    #[test]
    fn six_line_member_parses_to_full_record() {
        let p = patterns();
        let content = "\
\"Initial write\"  1048576.00
\"Rewrite\"  1048576.00
\"Read\"  1048576.00
\"Re-read\"  1048576.00
\"Random read\"  1048576.00
\"Random write\"  1048576.00
";
        let rec = parse_record("iozone-r128-t4.log", content, &p);
        assert_eq!(rec.key, Some(RunKey { bs: 128, threads: 4 }));
        assert_eq!(rec.throughput, vec![1024.0; 6]);
        assert!(rec.is_complete());
    }

    #[test]
    fn non_matching_lines_are_ignored() {
        let p = patterns();
        let content = "\
iozone run started
\tthroughput summary follows
\"Initial write\"  2048.00
trailing 123.45 without a quote
";
        let rec = parse_record("iozone-r64-t1.log", content, &p);
        assert_eq!(rec.throughput, vec![2.0]);
    }
}
