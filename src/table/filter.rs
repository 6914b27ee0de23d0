use crate::record::RunKey;

/// Row filter over block sizes and thread counts.
///
/// Dimensions combine conjunctively; an empty set on a dimension means no
/// constraint on that dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub block_sizes: Vec<u32>,
    pub thread_counts: Vec<u32>,
}

impl FilterSpec {
    /// Build the filter from CLI flags. With no flags at all the hardcoded
    /// default (bs 1024, thread 8) applies, with a warning.
    pub fn from_cli(bs: &[u32], threads: &[u32]) -> FilterSpec {
        if bs.is_empty() && threads.is_empty() {
            tracing::warn!("no filter specified, using default (bs 1024, thread 8)");
            return FilterSpec {
                block_sizes: vec![1024],
                thread_counts: vec![8],
            };
        }
        if !bs.is_empty() {
            tracing::debug!("bs filter {bs:?}");
        }
        if !threads.is_empty() {
            tracing::debug!("thread filter {threads:?}");
        }
        FilterSpec {
            block_sizes: bs.to_vec(),
            thread_counts: threads.to_vec(),
        }
    }

    pub fn matches(&self, key: &RunKey) -> bool {
        (self.block_sizes.is_empty() || self.block_sizes.contains(&key.bs))
            && (self.thread_counts.is_empty() || self.thread_counts.contains(&key.threads))
    }

    /// Human-readable description of the active filter, used in output
    /// file names. E.g. `-s 128 -t 4 -t 8` reads "bs 128 thread 4 8".
    pub fn suffix(&self) -> String {
        let mut parts = Vec::new();
        if !self.block_sizes.is_empty() {
            let bs: Vec<String> = self.block_sizes.iter().map(u32::to_string).collect();
            parts.push(format!("bs {}", bs.join(" ")));
        }
        if !self.thread_counts.is_empty() {
            let t: Vec<String> = self.thread_counts.iter().map(u32::to_string).collect();
            parts.push(format!("thread {}", t.join(" ")));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::table::aggregate;
    use pretty_assertions::assert_eq;

    fn key(bs: u32, threads: u32) -> RunKey {
        RunKey { bs, threads }
    }

    #[test]
    fn empty_dimension_is_unconstrained() {
        let f = FilterSpec {
            block_sizes: vec![128],
            thread_counts: vec![],
        };
        assert!(f.matches(&key(128, 1)));
        assert!(f.matches(&key(128, 16)));
        assert!(!f.matches(&key(256, 8)));
    }

    #[test]
    fn dimensions_combine_conjunctively() {
        let f = FilterSpec {
            block_sizes: vec![128],
            thread_counts: vec![4, 8],
        };
        assert!(f.matches(&key(128, 4)));
        assert!(f.matches(&key(128, 8)));
        assert!(!f.matches(&key(128, 2)));
        assert!(!f.matches(&key(512, 4)));
    }

    #[test]
    fn no_flags_fall_back_to_default_filter() {
        let f = FilterSpec::from_cli(&[], &[]);
        assert_eq!(f.block_sizes, vec![1024]);
        assert_eq!(f.thread_counts, vec![8]);
        assert!(f.matches(&key(1024, 8)));
        assert!(!f.matches(&key(1024, 4)));
        assert!(!f.matches(&key(512, 8)));
        assert_eq!(f.suffix(), "bs 1024 thread 8");
    }

    #[test]
    fn suffix_reads_bs_then_thread() {
        let f = FilterSpec::from_cli(&[128], &[4, 8]);
        assert_eq!(f.suffix(), "bs 128 thread 4 8");

        let threads_only = FilterSpec::from_cli(&[], &[2]);
        assert_eq!(threads_only.suffix(), "thread 2");
    }

    #[test]
    fn filtered_table_drops_non_matching_rows() {
        let mk = |bs: u32, threads: u32| Record {
            source: format!("iozone-r{bs}-t{threads}.log"),
            key: Some(key(bs, threads)),
            throughput: vec![1.0; 6],
        };
        let table = aggregate(&[vec![mk(128, 4), mk(128, 8), mk(512, 8)]]).unwrap();
        let filtered = table.filtered(&FilterSpec::from_cli(&[128], &[4, 8]));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.get(&key(512, 8)).is_none());
    }
}
