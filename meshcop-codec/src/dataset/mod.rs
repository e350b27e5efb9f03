mod components;
mod delay_timer;
mod mesh_local_prefix;
mod network_key;
mod network_name;
mod operational_dataset;
mod pskc;
mod security_policy;
mod timestamp;
mod xpan;

pub use components::Components;
pub use delay_timer::DelayTimer;
pub use mesh_local_prefix::MeshLocalPrefix;
pub use network_key::NetworkKey;
pub use network_name::NetworkName;
pub use operational_dataset::{DatasetInfo, OperationalDataset, OperationalDatasetItem};
pub use pskc::Pskc;
pub use security_policy::{SecurityPolicy, SecurityPolicyBuilder, VersionThreshold};
pub use timestamp::{ActiveTimestamp, Authoritative, PendingTimestamp, Timestamp};
pub use xpan::ExtendedPanId;

/// Which of the two dataset slots (Active or Pending) an operation targets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DatasetKind {
    Active,
    Pending,
}
