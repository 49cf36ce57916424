// # DNS Provider Trait
//
// Defines the interface to a managed DNS provider API.
//
// ## Implementations
//
// - Route53: `r53ddns-provider-route53` crate
//
// ## Usage
//
// Providers expose raw API operations only. Matching records, choosing the
// zone and deciding whether to write are done by `crate::record` and
// `crate::DdnsEngine`.
//
// ```rust,ignore
// use r53ddns_core::record;
//
// let lookup = record::read_record(&provider, "example.com", "host.example.com").await?;
// if let Some(current) = lookup.current_value() {
//     println!("{} is published in {}", current, lookup.zone_id);
// }
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque zone identifier assigned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostedZoneId(String);

impl HostedZoneId {
    /// Wrap a provider zone identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostedZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A zone returned by a by-name listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSummary {
    /// Provider zone identifier
    pub id: HostedZoneId,
    /// Zone DNS name as the provider reports it (usually dot-terminated)
    pub name: String,
}

/// One record set as stored by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Dot-terminated record name
    pub name: String,
    /// Record type ("A", "AAAA", "SOA", ...)
    pub record_type: String,
    /// Record values in provider order
    pub values: Vec<String>,
    /// TTL, absent for alias records
    pub ttl: Option<u32>,
}

impl DnsRecord {
    /// The record's current value (its first value)
    pub fn current_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Continuation point for a record-set listing
///
/// Route53 continues a listing from a (name, type, set identifier) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    /// Name of the first record set on the next page
    pub next_name: String,
    /// Type of the first record set on the next page
    pub next_type: Option<String>,
    /// Set identifier for weighted/latency record sets
    pub next_identifier: Option<String>,
}

/// One page of record sets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordPage {
    /// Record sets in provider order
    pub records: Vec<DnsRecord>,
    /// Where the next page starts, `None` on the last page
    pub next: Option<PageCursor>,
}

/// The desired state of one "A" record, submitted as a single UPSERT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChange {
    /// Dot-terminated record name
    pub name: String,
    /// Always "A"
    pub record_type: String,
    /// The single value to publish
    pub value: String,
    /// TTL in seconds
    pub ttl: u32,
}

/// Status of a submitted change batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeStatus {
    /// Accepted, not yet propagated to all name servers
    Pending,
    /// Propagated
    InSync,
    /// Not submitted (dry-run mode)
    DryRun,
    /// Any status the provider reports that is not known here
    Other(String),
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStatus::Pending => f.write_str("PENDING"),
            ChangeStatus::InSync => f.write_str("INSYNC"),
            ChangeStatus::DryRun => f.write_str("DRY-RUN"),
            ChangeStatus::Other(status) => f.write_str(status),
        }
    }
}

/// Confirmation returned for a submitted change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    /// Provider change identifier
    pub id: String,
    /// Status at submission time
    pub status: ChangeStatus,
    /// When the provider accepted the change
    pub submitted_at: Option<DateTime<Utc>>,
    /// Comment attached to the change batch
    pub comment: Option<String>,
}

/// Trait for DNS provider implementations
///
/// Providers are thin API adapters:
/// - One API call per method invocation
/// - No retry or backoff (errors propagate and end the run)
/// - No caching between calls
/// - No decisions about whether an update is needed
///
/// Authentication is the implementation's concern (for Route53, the ambient
/// AWS credential chain).
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List zones ordered by name, starting at `dns_name`
    ///
    /// Providers return zones at or after `dns_name` in lexicographic order,
    /// so the first entry is not guaranteed to be an exact match.
    async fn list_zones_by_name(&self, dns_name: &str)
    -> Result<Vec<ZoneSummary>, crate::Error>;

    /// Fetch one page of record sets for a zone
    ///
    /// `cursor` is `None` for the first page and the previous page's
    /// [`RecordPage::next`] afterwards.
    async fn list_record_sets(
        &self,
        zone_id: &HostedZoneId,
        cursor: Option<&PageCursor>,
    ) -> Result<RecordPage, crate::Error>;

    /// Submit a single-change UPSERT batch
    ///
    /// Creates the record if absent, replaces values and TTL wholesale if
    /// present. Returns once the provider accepted the change; propagation is
    /// not awaited.
    async fn upsert_record(
        &self,
        zone_id: &HostedZoneId,
        change: &RecordChange,
    ) -> Result<ChangeInfo, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
