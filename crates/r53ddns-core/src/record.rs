//! DNS record reader and writer
//!
//! Provider-independent logic on top of [`DnsProvider`]:
//! - [`read_record`]: resolve the zone, then page through its record sets
//!   looking for the target "A" record
//! - [`write_record`]: submit a single-value UPSERT for the target record

use crate::config::fqdn;
use crate::error::{Error, Result};
use crate::traits::{ChangeInfo, DnsProvider, DnsRecord, HostedZoneId, RecordChange, ZoneSummary};
use tracing::debug;

/// Record type managed by this crate
pub const RECORD_TYPE_A: &str = "A";

/// Result of a record lookup
///
/// The zone id is always present once the zone lookup succeeded; the record
/// is `None` when no matching "A" record exists in the zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLookup {
    /// Zone the record was searched in
    pub zone_id: HostedZoneId,
    /// The matching record set, if any
    pub record: Option<DnsRecord>,
}

impl RecordLookup {
    /// Current published value of the matching record
    pub fn current_value(&self) -> Option<&str> {
        self.record.as_ref().and_then(DnsRecord::current_value)
    }
}

/// Pick the zone for `zone_dns_name` from a by-name listing
///
/// Only the first entry is considered, and it must be an exact match
/// (case-insensitive, root dot ignored). Providers list zones starting at the
/// queried name, so a missing zone shows up as its lexicographic neighbour.
pub fn select_zone(zones: &[ZoneSummary], zone_dns_name: &str) -> Result<HostedZoneId> {
    let zone = zones
        .first()
        .ok_or_else(|| Error::zone_not_found(format!("no hosted zone listed for {}", zone_dns_name)))?;

    if !same_name(&zone.name, zone_dns_name) {
        return Err(Error::zone_not_found(format!(
            "first hosted zone listed for {} is {} ({})",
            zone_dns_name, zone.name, zone.id
        )));
    }

    Ok(zone.id.clone())
}

/// Look up the current "A" record for `record_dns_name` in `zone_dns_name`
///
/// Record sets are scanned in page order then record order; the first set
/// whose name equals `record_dns_name` plus the root dot and whose type is
/// exactly "A" wins. Paging stops at the first match.
///
/// # Errors
///
/// Any provider error, a zone that does not exist, or a matching record set
/// that carries no values (an alias record).
pub async fn read_record<P>(
    provider: &P,
    zone_dns_name: &str,
    record_dns_name: &str,
) -> Result<RecordLookup>
where
    P: DnsProvider + ?Sized,
{
    let zones = provider.list_zones_by_name(zone_dns_name).await?;
    let zone_id = select_zone(&zones, zone_dns_name)?;
    debug!("Using hosted zone {} for {}", zone_id, zone_dns_name);

    let wanted = fqdn(record_dns_name);
    let mut cursor = None;
    let mut pages = 0usize;

    loop {
        let page = provider.list_record_sets(&zone_id, cursor.as_ref()).await?;
        pages += 1;

        if let Some(record) = page
            .records
            .into_iter()
            .find(|r| r.name == wanted && r.record_type == RECORD_TYPE_A)
        {
            if record.values.is_empty() {
                return Err(Error::invalid_input(format!(
                    "record set {} ({}) has no values; alias records are not supported",
                    record.name, record.record_type
                )));
            }

            debug!("Found {} after {} page(s)", wanted, pages);
            return Ok(RecordLookup {
                zone_id,
                record: Some(record),
            });
        }

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!("No A record named {} in {} ({} page(s))", wanted, zone_id, pages);
    Ok(RecordLookup {
        zone_id,
        record: None,
    })
}

/// Build the UPSERT change for `record_dns_name`
pub fn upsert_change(record_dns_name: &str, new_ip: &str, ttl: u32) -> RecordChange {
    RecordChange {
        name: fqdn(record_dns_name),
        record_type: RECORD_TYPE_A.to_string(),
        value: new_ip.to_string(),
        ttl,
    }
}

/// Publish `new_ip` as the only value of the "A" record `record_dns_name`
///
/// The record is created if absent and replaced wholesale if present.
pub async fn write_record<P>(
    provider: &P,
    zone_id: &HostedZoneId,
    record_dns_name: &str,
    new_ip: &str,
    ttl: u32,
) -> Result<ChangeInfo>
where
    P: DnsProvider + ?Sized,
{
    let change = upsert_change(record_dns_name, new_ip, ttl);
    debug!(
        "Submitting UPSERT {} {} {} (ttl {}) to {}",
        change.name, change.record_type, change.value, change.ttl, zone_id
    );
    provider.upsert_record(zone_id, &change).await
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}
