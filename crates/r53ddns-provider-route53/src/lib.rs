// # Route53 DNS Provider
//
// This crate provides an AWS Route53 implementation of `DnsProvider`.
//
// ## Behavior
//
// - One API call per trait method (no retry, no backoff, no caching)
// - Credentials and region come from the default AWS chain
//   (environment, shared profile, IMDS); nothing is stored here
// - Zone ids are returned without the `/hostedzone/` prefix
// - Dry-run mode performs all reads and logs the UPSERT instead of sending it
//
// ## API Calls
//
// ```text
// ListHostedZonesByName     DNSName=example.com
// ListResourceRecordSets    HostedZoneId=Z123 [StartRecordName, StartRecordType, StartRecordIdentifier]
// ChangeResourceRecordSets  HostedZoneId=Z123 ChangeBatch={Changes:[{Action:UPSERT, ...}]}
// ```

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_route53::Client;
use aws_sdk_route53::error::{BuildError, DisplayErrorContext, SdkError};
use aws_sdk_route53::operation::list_resource_record_sets::ListResourceRecordSetsOutput;
use aws_sdk_route53::primitives::DateTime as AwsDateTime;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ChangeInfo as AwsChangeInfo,
    ChangeStatus as AwsChangeStatus, HostedZone, ResourceRecord, ResourceRecordSet, RrType,
};
use chrono::{DateTime, Utc};
use r53ddns_core::traits::{
    ChangeInfo, ChangeStatus, DnsProvider, DnsRecord, HostedZoneId, PageCursor, RecordChange,
    RecordPage, ZoneSummary,
};
use r53ddns_core::{Error, Result};

/// Provider name used in errors and logs
const PROVIDER_NAME: &str = "route53";

/// Route53 is a global service; the SDK still needs a signing region
const FALLBACK_REGION: &str = "us-east-1";

/// Prefix Route53 puts on hosted zone ids
const HOSTED_ZONE_PREFIX: &str = "/hostedzone/";

/// Comment attached to every change batch
const CHANGE_COMMENT: &str = "r53ddns: public IP update";

/// Route53 DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all list requests (zone lookup, record lookup)
/// - Log the intended UPSERT payload
/// - **NOT** call ChangeResourceRecordSets
#[derive(Debug, Clone)]
pub struct Route53Provider {
    /// Route53 API client
    client: Client,

    /// Dry-run mode: if true, perform list requests but skip the UPSERT
    dry_run: bool,
}

impl Route53Provider {
    /// Create a provider around an existing client
    pub fn new(client: Client, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// Create a provider that writes changes
    pub fn new_live(client: Client) -> Self {
        Self::new(client, false)
    }

    /// Create a provider that only logs changes
    pub fn new_dry_run(client: Client) -> Self {
        Self::new(client, true)
    }

    /// Create a provider from the default AWS configuration chain
    ///
    /// Falls back to `us-east-1` when no region is configured.
    pub async fn from_env(dry_run: bool) -> Self {
        let region = RegionProviderChain::default_provider().or_else(FALLBACK_REGION);
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        Self::new(Client::new(&config), dry_run)
    }

    /// Whether this provider skips writes
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn list_zones_by_name(&self, dns_name: &str) -> Result<Vec<ZoneSummary>> {
        tracing::debug!("ListHostedZonesByName DNSName={}", dns_name);

        let output = self
            .client
            .list_hosted_zones_by_name()
            .dns_name(dns_name)
            .send()
            .await
            .map_err(|e| sdk_error("ListHostedZonesByName", e))?;

        Ok(output.hosted_zones().iter().map(zone_summary).collect())
    }

    async fn list_record_sets(
        &self,
        zone_id: &HostedZoneId,
        cursor: Option<&PageCursor>,
    ) -> Result<RecordPage> {
        tracing::debug!(
            "ListResourceRecordSets HostedZoneId={} start={:?}",
            zone_id,
            cursor.map(|c| c.next_name.as_str())
        );

        let mut request = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(zone_id.as_str());

        if let Some(cursor) = cursor {
            request = request
                .start_record_name(cursor.next_name.clone())
                .set_start_record_type(cursor.next_type.as_deref().map(RrType::from))
                .set_start_record_identifier(cursor.next_identifier.clone());
        }

        let output = request.send().await.map_err(|e| {
            let no_such_zone = e
                .as_service_error()
                .is_some_and(|se| se.is_no_such_hosted_zone());
            if no_such_zone {
                Error::zone_not_found(format!("Route53 has no hosted zone {}", zone_id))
            } else {
                sdk_error("ListResourceRecordSets", e)
            }
        })?;

        Ok(record_page(&output))
    }

    async fn upsert_record(
        &self,
        zone_id: &HostedZoneId,
        change: &RecordChange,
    ) -> Result<ChangeInfo> {
        let batch = upsert_batch(change)?;

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send ChangeResourceRecordSets to {} with UPSERT: {}",
                zone_id,
                serde_json::to_string(change)?
            );
            return Ok(ChangeInfo {
                id: "dry-run".to_string(),
                status: ChangeStatus::DryRun,
                submitted_at: Some(Utc::now()),
                comment: Some(CHANGE_COMMENT.to_string()),
            });
        }

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id.as_str())
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| sdk_error("ChangeResourceRecordSets", e))?;

        let info: Option<&AwsChangeInfo> = output.change_info().into();
        let info = info.ok_or_else(|| {
            Error::invalid_input("ChangeResourceRecordSets returned no ChangeInfo")
        })?;

        Ok(change_info(info))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Strip the `/hostedzone/` prefix from a Route53 zone id
pub fn normalize_zone_id(id: &str) -> &str {
    id.strip_prefix(HOSTED_ZONE_PREFIX).unwrap_or(id)
}

fn zone_summary(zone: &HostedZone) -> ZoneSummary {
    ZoneSummary {
        id: HostedZoneId::new(normalize_zone_id(zone.id())),
        name: zone.name().to_string(),
    }
}

fn record_from_set(set: &ResourceRecordSet) -> DnsRecord {
    DnsRecord {
        name: set.name().to_string(),
        record_type: set.r#type().as_str().to_string(),
        values: set
            .resource_records()
            .iter()
            .map(|r| r.value().to_string())
            .collect(),
        ttl: set.ttl().and_then(|ttl| u32::try_from(ttl).ok()),
    }
}

fn record_page(output: &ListResourceRecordSetsOutput) -> RecordPage {
    RecordPage {
        records: output
            .resource_record_sets()
            .iter()
            .map(record_from_set)
            .collect(),
        next: next_cursor(
            output.is_truncated(),
            output.next_record_name(),
            output.next_record_type().map(RrType::as_str),
            output.next_record_identifier(),
        ),
    }
}

/// Continuation cursor for a listing, `None` on the last page
fn next_cursor(
    is_truncated: bool,
    next_name: Option<&str>,
    next_type: Option<&str>,
    next_identifier: Option<&str>,
) -> Option<PageCursor> {
    if !is_truncated {
        return None;
    }

    next_name.map(|name| PageCursor {
        next_name: name.to_string(),
        next_type: next_type.map(str::to_string),
        next_identifier: next_identifier.map(str::to_string),
    })
}

/// Build the single-change UPSERT batch for `change`
fn upsert_batch(change: &RecordChange) -> Result<ChangeBatch> {
    let record = ResourceRecord::builder()
        .value(change.value.clone())
        .build()
        .map_err(build_error)?;

    let record_set = ResourceRecordSet::builder()
        .name(change.name.clone())
        .r#type(RrType::from(change.record_type.as_str()))
        .ttl(i64::from(change.ttl))
        .resource_records(record)
        .build()
        .map_err(build_error)?;

    let upsert = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record_set)
        .build()
        .map_err(build_error)?;

    ChangeBatch::builder()
        .changes(upsert)
        .comment(CHANGE_COMMENT)
        .build()
        .map_err(build_error)
}

fn change_info(info: &AwsChangeInfo) -> ChangeInfo {
    let status: Option<&AwsChangeStatus> = info.status().into();
    let submitted_at: Option<&AwsDateTime> = info.submitted_at().into();

    ChangeInfo {
        id: info.id().to_string(),
        status: status.map_or(ChangeStatus::Other("UNKNOWN".to_string()), |s| {
            change_status(s.as_str())
        }),
        submitted_at: submitted_at.and_then(to_chrono),
        comment: info.comment().map(str::to_string),
    }
}

fn change_status(status: &str) -> ChangeStatus {
    match status {
        "PENDING" => ChangeStatus::Pending,
        "INSYNC" => ChangeStatus::InSync,
        other => ChangeStatus::Other(other.to_string()),
    }
}

fn to_chrono(at: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(at.secs(), at.subsec_nanos())
}

fn sdk_error<E, R>(operation: &str, err: SdkError<E, R>) -> Error
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    Error::provider(
        PROVIDER_NAME,
        format!("{} failed: {}", operation, DisplayErrorContext(&err)),
    )
}

fn build_error(err: BuildError) -> Error {
    Error::provider(PROVIDER_NAME, format!("Invalid request: {}", err))
}
