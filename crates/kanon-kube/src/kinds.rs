//! Workload kinds and where they keep their pod spec

use phf::phf_map;
use std::fmt;

const POD: &[&str] = &["spec"];
const POD_TEMPLATE: &[&str] = &["spec", "template", "spec"];
const CRONJOB_TEMPLATE: &[&str] = &["spec", "jobTemplate", "spec", "template", "spec"];

static KIND_PREFIXES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "Pod" => POD,
    "Deployment" => POD_TEMPLATE,
    "DaemonSet" => POD_TEMPLATE,
    "Job" => POD_TEMPLATE,
    "StatefulSet" => POD_TEMPLATE,
    "CronJob" => CRONJOB_TEMPLATE,
};

/// Field path from the manifest root to the pod spec of `kind`
///
/// Returns an empty slice for kinds that carry no pod spec.
pub fn path_prefix_for(kind: &str) -> &'static [&'static str] {
    KIND_PREFIXES.get(kind).copied().unwrap_or(&[])
}

/// Every workload kind images can be collected from
pub fn supported_kinds() -> impl Iterator<Item = &'static str> {
    KIND_PREFIXES.keys().copied()
}

/// The container lists of a pod spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerList {
    InitContainers,
    Containers,
    EphemeralContainers,
}

impl ContainerList {
    /// Lists in collection order
    pub const ALL: [ContainerList; 3] = [
        ContainerList::InitContainers,
        ContainerList::Containers,
        ContainerList::EphemeralContainers,
    ];

    /// Field name inside the pod spec
    pub fn field(self) -> &'static str {
        match self {
            ContainerList::InitContainers => "initContainers",
            ContainerList::Containers => "containers",
            ContainerList::EphemeralContainers => "ephemeralContainers",
        }
    }
}

impl fmt::Display for ContainerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}
