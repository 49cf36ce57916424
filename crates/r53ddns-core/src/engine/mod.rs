//! Core DDNS engine
//!
//! The DdnsEngine runs one update check:
//! - Discover the public IP via IpSource
//! - Read the published record via DnsProvider
//! - Upsert the record only when the two differ
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌──────────────┐      ┌──────────────┐
//! │  IpSource   │─ip──▶│  DdnsEngine  │◀────▶│ DnsProvider  │
//! └─────────────┘      └──────────────┘      └──────────────┘
//!                             │           list zones / record sets
//!                             ▼           upsert (only on change)
//!                        RunOutcome
//! ```
//!
//! ## Flow
//!
//! 1. Resolve public IP (failure → `IpUnavailable`, reported)
//! 2. Read current record (provider failure → `Err`, fatal)
//! 3. No record → `RecordNotFound`, reported
//! 4. Equal → `Unchanged`, no write
//! 5. Different → one upsert → `Updated`

use crate::config::RunConfig;
use crate::error::Result;
use crate::record;
use crate::traits::{ChangeInfo, DnsProvider, HostedZoneId, IpSource};
use std::net::Ipv4Addr;
use tracing::{debug, error, info};

/// Result of one update check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The record was upserted with the new IP
    Updated {
        zone_id: HostedZoneId,
        previous_ip: String,
        new_ip: Ipv4Addr,
        change: ChangeInfo,
    },

    /// The record already had the public IP (no-op)
    Unchanged {
        zone_id: HostedZoneId,
        current_ip: Ipv4Addr,
    },

    /// The public IP could not be determined
    IpUnavailable {
        reason: String,
    },

    /// The zone exists but holds no matching "A" record
    RecordNotFound {
        zone_id: HostedZoneId,
    },
}

impl RunOutcome {
    /// Whether the run wrote to the provider
    pub fn is_update(&self) -> bool {
        matches!(self, RunOutcome::Updated { .. })
    }
}

/// Core DDNS engine
///
/// Owns the IP source and DNS provider it was constructed with; nothing is
/// read from process-wide state. Each [`DdnsEngine::run_once`] call starts
/// from scratch, so consecutive calls with an unchanged public IP write
/// nothing after the first.
pub struct DdnsEngine {
    /// IP source for the public address
    ip_source: Box<dyn IpSource>,

    /// DNS provider holding the record
    provider: Box<dyn DnsProvider>,

    /// Validated run configuration
    config: RunConfig,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: run configuration, validated here
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: RunConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            provider,
            config,
        })
    }

    /// The configuration this engine runs with
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run a single update check
    ///
    /// # Returns
    ///
    /// - `Ok(RunOutcome)`: Check completed (including the reported
    ///   `IpUnavailable` and `RecordNotFound` outcomes)
    /// - `Err(Error)`: Provider failure; the run is aborted
    pub async fn run_once(&self) -> Result<RunOutcome> {
        let zone_name = &self.config.hosted_zone_dns_name;
        let record_name = &self.config.record_dns_name;

        let my_ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                error!(
                    "Failed to retrieve public IP from {}: {}",
                    self.ip_source.source_name(),
                    e
                );
                return Ok(RunOutcome::IpUnavailable {
                    reason: e.to_string(),
                });
            }
        };
        debug!("Public IP: {}", my_ip);

        let lookup = record::read_record(self.provider.as_ref(), zone_name, record_name).await?;

        let Some(current) = lookup.current_value() else {
            error!(
                "DNS record not found: no A record for {} in {} ({})",
                record_name, zone_name, lookup.zone_id
            );
            return Ok(RunOutcome::RecordNotFound {
                zone_id: lookup.zone_id,
            });
        };

        let new_value = my_ip.to_string();
        if current == new_value {
            info!(
                "IP in {} ({}) for {} ({}) matches, nothing to do",
                zone_name, lookup.zone_id, record_name, my_ip
            );
            return Ok(RunOutcome::Unchanged {
                zone_id: lookup.zone_id,
                current_ip: my_ip,
            });
        }

        let previous_ip = current.to_string();
        info!(
            "Updating IP in {} ({}) for {} from {} to {}",
            zone_name, lookup.zone_id, record_name, previous_ip, my_ip
        );

        let change = record::write_record(
            self.provider.as_ref(),
            &lookup.zone_id,
            record_name,
            &new_value,
            self.config.ttl,
        )
        .await?;

        info!(
            "Completed update via {}: change {} is {}",
            self.provider.provider_name(),
            change.id,
            change.status
        );

        Ok(RunOutcome::Updated {
            zone_id: lookup.zone_id,
            previous_ip,
            new_ip: my_ip,
            change,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChangeStatus;

    #[test]
    fn test_is_update() {
        let updated = RunOutcome::Updated {
            zone_id: HostedZoneId::new("Z1"),
            previous_ip: "1.2.3.4".to_string(),
            new_ip: Ipv4Addr::new(1, 2, 3, 5),
            change: ChangeInfo {
                id: "C1".to_string(),
                status: ChangeStatus::Pending,
                submitted_at: None,
                comment: None,
            },
        };
        assert!(updated.is_update());

        let unchanged = RunOutcome::Unchanged {
            zone_id: HostedZoneId::new("Z1"),
            current_ip: Ipv4Addr::new(1, 2, 3, 4),
        };
        assert!(!unchanged.is_update());
    }
}
