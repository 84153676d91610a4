//! Analysis request payload.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use super::REQUEST_VERSION;

/// Identity of an assembly that owns or consumes members.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssemblyInfo {
    /// Full assembly identity (name, version, culture, key token)
    pub assembly_identity: String,
    /// File version, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_version: Option<String>,
    /// Target framework moniker the assembly was built for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_framework_moniker: Option<String>,
}

impl AssemblyInfo {
    /// Create from an identity string
    pub fn new(assembly_identity: impl Into<String>) -> Self {
        Self {
            assembly_identity: assembly_identity.into(),
            file_version: None,
            target_framework_moniker: None,
        }
    }

    /// Set file version
    pub fn with_file_version(mut self, version: impl Into<String>) -> Self {
        self.file_version = Some(version.into());
        self
    }

    /// Set target framework moniker
    pub fn with_target_framework(mut self, tfm: impl Into<String>) -> Self {
        self.target_framework_moniker = Some(tfm.into());
        self
    }
}

impl std::fmt::Display for AssemblyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.assembly_identity)
    }
}

/// Report options requested from the service (bitfield).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestFlags(u32);

impl RequestFlags {
    /// No options
    pub const NONE: Self = Self(0);
    /// Include APIs missing on the targets
    pub const SHOW_NON_PORTABLE_APIS: Self = Self(0x1);
    /// Include known breaking changes
    pub const SHOW_BREAKING_CHANGES: Self = Self(0x2);
    /// Restrict breaking changes to retargeting ones
    pub const SHOW_RETARGETTING_ISSUES: Self = Self(0x4);
    /// Skip the service's default ignore list
    pub const NO_DEFAULT_IGNORE_FILE: Self = Self(0x8);

    /// Flags from a raw bit pattern; unknown bits are carried through
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit value
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Check whether all bits of `other` are set
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the bits of `other`
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for RequestFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Description of an application's dependency surface, submitted for analysis.
///
/// Built once through [`AnalyzeRequest::builder`] and read-only afterwards.
/// Dependencies are keyed by member doc-id; a `BTreeMap` keeps keys unique
/// and the serialized form deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyzeRequest {
    application_name: String,
    #[serde(default)]
    dependencies: BTreeMap<String, BTreeSet<AssemblyInfo>>,
    #[serde(default)]
    targets: Vec<String>,
    #[serde(default)]
    unresolved_assemblies: Vec<String>,
    #[serde(default)]
    user_assemblies: Vec<AssemblyInfo>,
    #[serde(default)]
    breaking_changes_to_suppress: Vec<String>,
    #[serde(default)]
    request_flags: RequestFlags,
    #[serde(default = "request_version")]
    version: u32,
}

fn request_version() -> u32 {
    REQUEST_VERSION
}

impl AnalyzeRequest {
    /// Start building a request for the named application
    pub fn builder(application_name: impl Into<String>) -> AnalyzeRequestBuilder {
        AnalyzeRequestBuilder::new(application_name)
    }

    /// Reopen a finished request for amendment
    pub fn into_builder(self) -> AnalyzeRequestBuilder {
        AnalyzeRequestBuilder { inner: self }
    }

    /// Application name
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// Member doc-id → owning assemblies
    pub fn dependencies(&self) -> &BTreeMap<String, BTreeSet<AssemblyInfo>> {
        &self.dependencies
    }

    /// Target platforms, in caller order
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Names of assemblies that could not be resolved locally
    pub fn unresolved_assemblies(&self) -> &[String] {
        &self.unresolved_assemblies
    }

    /// Assemblies that belong to the application itself
    pub fn user_assemblies(&self) -> &[AssemblyInfo] {
        &self.user_assemblies
    }

    /// Breaking-change ids the report should leave out
    pub fn breaking_changes_to_suppress(&self) -> &[String] {
        &self.breaking_changes_to_suppress
    }

    /// Report options
    pub fn request_flags(&self) -> RequestFlags {
        self.request_flags
    }

    /// Protocol version tag
    pub fn version(&self) -> u32 {
        self.version
    }
}

/// Builder for [`AnalyzeRequest`]
#[derive(Debug, Clone)]
pub struct AnalyzeRequestBuilder {
    inner: AnalyzeRequest,
}

impl AnalyzeRequestBuilder {
    fn new(application_name: impl Into<String>) -> Self {
        Self {
            inner: AnalyzeRequest {
                application_name: application_name.into(),
                dependencies: BTreeMap::new(),
                targets: Vec::new(),
                unresolved_assemblies: Vec::new(),
                user_assemblies: Vec::new(),
                breaking_changes_to_suppress: Vec::new(),
                request_flags: RequestFlags::default(),
                version: REQUEST_VERSION,
            },
        }
    }

    /// Add a target platform (duplicates are ignored, order is kept)
    pub fn target(mut self, target: impl Into<String>) -> Self {
        let target = target.into();
        if !self.inner.targets.contains(&target) {
            self.inner.targets.push(target);
        }
        self
    }

    /// Add several target platforms
    pub fn targets<I, S>(self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        targets.into_iter().fold(self, |b, t| b.target(t))
    }

    /// Record that `member` is provided by `assembly`
    pub fn dependency(mut self, member: impl Into<String>, assembly: AssemblyInfo) -> Self {
        self.inner
            .dependencies
            .entry(member.into())
            .or_default()
            .insert(assembly);
        self
    }

    /// Add an unresolved assembly name
    pub fn unresolved_assembly(mut self, name: impl Into<String>) -> Self {
        self.inner.unresolved_assemblies.push(name.into());
        self
    }

    /// Add a user assembly
    pub fn user_assembly(mut self, assembly: AssemblyInfo) -> Self {
        self.inner.user_assemblies.push(assembly);
        self
    }

    /// Suppress a breaking change by id
    pub fn suppress_breaking_change(mut self, id: impl Into<String>) -> Self {
        self.inner.breaking_changes_to_suppress.push(id.into());
        self
    }

    /// Set report options
    pub fn flags(mut self, flags: RequestFlags) -> Self {
        self.inner.request_flags = flags;
        self
    }

    /// Finish the request
    pub fn build(self) -> AnalyzeRequest {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = AnalyzeRequest::builder("app").build();
        assert_eq!(request.application_name(), "app");
        assert!(request.dependencies().is_empty());
        assert!(request.targets().is_empty());
        assert_eq!(request.request_flags(), RequestFlags::NONE);
        assert_eq!(request.version(), REQUEST_VERSION);
    }

    #[test]
    fn test_document_without_version_gets_current() {
        let request: AnalyzeRequest =
            serde_json::from_str(r#"{"ApplicationName":"app","Targets":["a"]}"#).unwrap();
        assert_eq!(request.version(), REQUEST_VERSION);

        let amended = request.into_builder().target("a").target("b").build();
        assert_eq!(amended.targets(), ["a", "b"]);
    }

    #[test]
    fn test_dependency_keys_are_unique() {
        let a = AssemblyInfo::new("A");
        let b = AssemblyInfo::new("B");
        let request = AnalyzeRequest::builder("app")
            .dependency("T:Foo", a.clone())
            .dependency("T:Foo", b.clone())
            .dependency("T:Foo", a.clone())
            .build();

        assert_eq!(request.dependencies().len(), 1);
        let owners = &request.dependencies()["T:Foo"];
        assert_eq!(owners.len(), 2);
        assert!(owners.contains(&a) && owners.contains(&b));
    }

    #[test]
    fn test_targets_keep_order_without_duplicates() {
        let request = AnalyzeRequest::builder("app")
            .targets(["b", "a", "b"])
            .build();
        assert_eq!(request.targets(), ["b", "a"]);
    }

    #[test]
    fn test_wire_field_names() {
        let request = AnalyzeRequest::builder("app")
            .target("t")
            .dependency("T:Foo", AssemblyInfo::new("A").with_file_version("1.0"))
            .flags(RequestFlags::SHOW_NON_PORTABLE_APIS | RequestFlags::SHOW_BREAKING_CHANGES)
            .build();

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["ApplicationName"], "app");
        assert_eq!(value["Targets"][0], "t");
        assert_eq!(value["Dependencies"]["T:Foo"][0]["AssemblyIdentity"], "A");
        assert_eq!(value["Dependencies"]["T:Foo"][0]["FileVersion"], "1.0");
        assert_eq!(value["RequestFlags"], 3);
        assert_eq!(value["Version"], REQUEST_VERSION);
    }

    #[test]
    fn test_flags() {
        let mut flags = RequestFlags::SHOW_BREAKING_CHANGES;
        assert!(!flags.contains(RequestFlags::SHOW_NON_PORTABLE_APIS));
        flags.insert(RequestFlags::SHOW_NON_PORTABLE_APIS);
        assert!(flags.contains(RequestFlags::SHOW_NON_PORTABLE_APIS));
        assert!(flags.contains(RequestFlags::SHOW_BREAKING_CHANGES));
        assert_eq!(flags.bits(), 0x3);
    }
}
