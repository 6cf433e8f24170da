//! Display records built from raw daemon responses

use ipfs_rpc::{PinType, RawObjectStat, RawPin, RawRepoStat};
use serde::Serialize;

use crate::size::{format_bytes, HumanSize};

/// `object/stat` with every size field converted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectStat {
    pub hash: String,
    pub num_links: u64,
    pub block_size: HumanSize,
    pub links_size: HumanSize,
    pub data_size: HumanSize,
    pub cumulative_size: HumanSize,
}

impl From<RawObjectStat> for ObjectStat {
    fn from(raw: RawObjectStat) -> Self {
        ObjectStat {
            hash: raw.hash,
            num_links: raw.num_links,
            block_size: format_bytes(raw.block_size),
            links_size: format_bytes(raw.links_size),
            data_size: format_bytes(raw.data_size),
            cumulative_size: format_bytes(raw.cumulative_size),
        }
    }
}

/// `repo/stat` with `repo_size` and `storage_max` converted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoStat {
    pub repo_size: HumanSize,
    pub storage_max: HumanSize,
    pub num_objects: u64,
    pub repo_path: String,
    pub version: String,
}

impl From<RawRepoStat> for RepoStat {
    fn from(raw: RawRepoStat) -> Self {
        RepoStat {
            repo_size: format_bytes(raw.repo_size),
            storage_max: format_bytes(raw.storage_max),
            num_objects: raw.num_objects,
            repo_path: raw.repo_path,
            version: raw.version,
        }
    }
}

/// A pinned object, optionally enriched with its stat. Identified by `hash`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinEntry {
    pub hash: String,
    pub pin_type: PinType,
    pub stat: Option<ObjectStat>,
}

impl PinEntry {
    /// Attach `stat` unless one is already present.
    pub fn attach_stat(&mut self, stat: ObjectStat) {
        if self.stat.is_none() {
            self.stat = Some(stat);
        }
    }

    pub fn is_indirect(&self) -> bool {
        self.pin_type == PinType::Indirect
    }
}

impl From<RawPin> for PinEntry {
    fn from(raw: RawPin) -> Self {
        PinEntry {
            hash: raw.hash,
            pin_type: raw.pin_type,
            stat: None,
        }
    }
}

/// Result of a garbage-collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GcReport {
    pub removed: Vec<String>,
}

impl GcReport {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::SizeUnit;

    fn raw_stat(hash: &str, cumulative: u64) -> RawObjectStat {
        RawObjectStat {
            hash: hash.into(),
            num_links: 1,
            block_size: 64,
            links_size: 50,
            data_size: 14,
            cumulative_size: cumulative,
        }
    }

    #[test]
    fn object_stat_converts_every_size_field() {
        let stat = ObjectStat::from(raw_stat("QmA", 3_200_000));
        assert_eq!(stat.hash, "QmA");
        assert_eq!(stat.block_size.unit, SizeUnit::Bytes);
        assert_eq!(stat.block_size.value, 64.0);
        assert_eq!(stat.links_size.value, 50.0);
        assert_eq!(stat.data_size.value, 14.0);
        assert_eq!(stat.cumulative_size.unit, SizeUnit::Megabytes);
        assert_eq!(stat.cumulative_size.value, 3.2);
    }

    #[test]
    fn repo_stat_converts_size_fields_only() {
        let stat = RepoStat::from(RawRepoStat {
            repo_size: 2_000,
            storage_max: 10_000_000_000,
            num_objects: 7,
            repo_path: "/repo".into(),
            version: "fs-repo@15".into(),
        });
        assert_eq!(stat.repo_size.to_string(), "2.0 kB");
        assert_eq!(stat.storage_max.to_string(), "10.0 GB");
        assert_eq!(stat.num_objects, 7);
    }

    #[test]
    fn attach_stat_keeps_the_first_stat() {
        let mut entry = PinEntry::from(RawPin {
            hash: "QmA".into(),
            pin_type: PinType::Recursive,
        });
        entry.attach_stat(ObjectStat::from(raw_stat("QmA", 10)));
        entry.attach_stat(ObjectStat::from(raw_stat("QmA", 99_999)));

        let stat = entry.stat.unwrap();
        assert_eq!(stat.cumulative_size.value, 10.0);
    }
}
