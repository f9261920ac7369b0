use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use serde_json::Value;

/// Category of a configuration entity.
///
/// Entities reference each other by name string only; the graph layer sees
/// kinds as plain tags via [`ItemKind::as_str`]. Field schemas are opaque —
/// item payloads stay untyped JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    // Objects
    AddressObject,
    AddressGroup,
    ServiceObject,
    ServiceGroup,
    ApplicationObject,
    ApplicationGroup,
    ApplicationFilter,
    // Profiles
    AuthenticationProfile,
    DecryptionProfile,
    AntivirusProfile,
    AntiSpywareProfile,
    VulnerabilityProfile,
    UrlFilteringProfile,
    FileBlockingProfile,
    WildfireProfile,
    ProfileGroup,
    HipObject,
    HipProfile,
    CertificateProfile,
    QosProfile,
    // Rules
    SecurityRule,
    NatRule,
    DecryptionRule,
    AuthenticationRule,
    QosRule,
    PbfRule,
    // Infrastructure
    IkeCryptoProfile,
    IpsecCryptoProfile,
    IkeGateway,
    IpsecTunnel,
    ServiceConnection,
    RemoteNetwork,
    GpAgentProfile,
    GpPortal,
    GpGateway,
    // Containers
    Snippet,
}

/// Stat bucket an item counts toward in a push report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatBucket {
    Objects,
    Profiles,
    Rules,
    Infrastructure,
    Snippets,
}

/// Folder-level sections holding objects.
pub const OBJECT_KINDS: &[ItemKind] = &[
    ItemKind::AddressObject,
    ItemKind::AddressGroup,
    ItemKind::ServiceObject,
    ItemKind::ServiceGroup,
    ItemKind::ApplicationObject,
    ItemKind::ApplicationGroup,
    ItemKind::ApplicationFilter,
];

/// Folder-level sections holding profiles.
pub const PROFILE_KINDS: &[ItemKind] = &[
    ItemKind::AuthenticationProfile,
    ItemKind::DecryptionProfile,
    ItemKind::AntivirusProfile,
    ItemKind::AntiSpywareProfile,
    ItemKind::VulnerabilityProfile,
    ItemKind::UrlFilteringProfile,
    ItemKind::FileBlockingProfile,
    ItemKind::WildfireProfile,
    ItemKind::ProfileGroup,
    ItemKind::HipObject,
    ItemKind::HipProfile,
    ItemKind::CertificateProfile,
    ItemKind::QosProfile,
];

/// Folder-level sections holding rules.
pub const RULE_KINDS: &[ItemKind] = &[
    ItemKind::SecurityRule,
    ItemKind::NatRule,
    ItemKind::DecryptionRule,
    ItemKind::AuthenticationRule,
    ItemKind::QosRule,
    ItemKind::PbfRule,
];

/// Sections under the separate infrastructure object.
pub const INFRASTRUCTURE_KINDS: &[ItemKind] = &[
    ItemKind::IkeCryptoProfile,
    ItemKind::IpsecCryptoProfile,
    ItemKind::IkeGateway,
    ItemKind::IpsecTunnel,
    ItemKind::ServiceConnection,
    ItemKind::RemoteNetwork,
    ItemKind::GpAgentProfile,
    ItemKind::GpPortal,
    ItemKind::GpGateway,
];

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddressObject => "address_object",
            Self::AddressGroup => "address_group",
            Self::ServiceObject => "service_object",
            Self::ServiceGroup => "service_group",
            Self::ApplicationObject => "application_object",
            Self::ApplicationGroup => "application_group",
            Self::ApplicationFilter => "application_filter",
            Self::AuthenticationProfile => "authentication_profile",
            Self::DecryptionProfile => "decryption_profile",
            Self::AntivirusProfile => "antivirus_profile",
            Self::AntiSpywareProfile => "anti_spyware_profile",
            Self::VulnerabilityProfile => "vulnerability_profile",
            Self::UrlFilteringProfile => "url_filtering_profile",
            Self::FileBlockingProfile => "file_blocking_profile",
            Self::WildfireProfile => "wildfire_profile",
            Self::ProfileGroup => "profile_group",
            Self::HipObject => "hip_object",
            Self::HipProfile => "hip_profile",
            Self::CertificateProfile => "certificate_profile",
            Self::QosProfile => "qos_profile",
            Self::SecurityRule => "security_rule",
            Self::NatRule => "nat_rule",
            Self::DecryptionRule => "decryption_rule",
            Self::AuthenticationRule => "authentication_rule",
            Self::QosRule => "qos_rule",
            Self::PbfRule => "pbf_rule",
            Self::IkeCryptoProfile => "ike_crypto_profile",
            Self::IpsecCryptoProfile => "ipsec_crypto_profile",
            Self::IkeGateway => "ike_gateway",
            Self::IpsecTunnel => "ipsec_tunnel",
            Self::ServiceConnection => "service_connection",
            Self::RemoteNetwork => "remote_network",
            Self::GpAgentProfile => "gp_agent_profile",
            Self::GpPortal => "gp_portal",
            Self::GpGateway => "gp_gateway",
            Self::Snippet => "snippet",
        }
    }

    /// Collection key this kind lives under in a tenant snapshot.
    pub fn section_key(self) -> &'static str {
        match self {
            Self::AddressObject => "addresses",
            Self::AddressGroup => "address_groups",
            Self::ServiceObject => "services",
            Self::ServiceGroup => "service_groups",
            Self::ApplicationObject => "applications",
            Self::ApplicationGroup => "application_groups",
            Self::ApplicationFilter => "application_filters",
            Self::AuthenticationProfile => "authentication_profiles",
            Self::DecryptionProfile => "decryption_profiles",
            Self::AntivirusProfile => "antivirus_profiles",
            Self::AntiSpywareProfile => "anti_spyware_profiles",
            Self::VulnerabilityProfile => "vulnerability_profiles",
            Self::UrlFilteringProfile => "url_filtering_profiles",
            Self::FileBlockingProfile => "file_blocking_profiles",
            Self::WildfireProfile => "wildfire_profiles",
            Self::ProfileGroup => "profile_groups",
            Self::HipObject => "hip_objects",
            Self::HipProfile => "hip_profiles",
            Self::CertificateProfile => "certificate_profiles",
            Self::QosProfile => "qos_profiles",
            Self::SecurityRule => "security_rules",
            Self::NatRule => "nat_rules",
            Self::DecryptionRule => "decryption_rules",
            Self::AuthenticationRule => "authentication_rules",
            Self::QosRule => "qos_rules",
            Self::PbfRule => "pbf_rules",
            Self::IkeCryptoProfile => "ike_crypto_profiles",
            Self::IpsecCryptoProfile => "ipsec_crypto_profiles",
            Self::IkeGateway => "ike_gateways",
            Self::IpsecTunnel => "ipsec_tunnels",
            Self::ServiceConnection => "service_connections",
            Self::RemoteNetwork => "remote_networks",
            Self::GpAgentProfile => "gp_agent_profiles",
            Self::GpPortal => "gp_portals",
            Self::GpGateway => "gp_gateways",
            Self::Snippet => "snippets",
        }
    }

    pub fn bucket(self) -> StatBucket {
        if OBJECT_KINDS.contains(&self) {
            StatBucket::Objects
        } else if PROFILE_KINDS.contains(&self) {
            StatBucket::Profiles
        } else if RULE_KINDS.contains(&self) {
            StatBucket::Rules
        } else if INFRASTRUCTURE_KINDS.contains(&self) {
            StatBucket::Infrastructure
        } else {
            StatBucket::Snippets
        }
    }

    pub fn is_infrastructure(self) -> bool {
        INFRASTRUCTURE_KINDS.contains(&self)
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an entity lives. Most graph logic treats the two interchangeably.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Location {
    Folder(String),
    Snippet(String),
}

impl Location {
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(name) | Self::Snippet(name) => name,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder(name) => write!(f, "folder {name}"),
            Self::Snippet(name) => write!(f, "snippet {name}"),
        }
    }
}

/// One configuration entity: a name, a location, and an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigItem {
    pub name: String,
    pub kind: ItemKind,
    pub location: Location,
    pub data: Value,
}
