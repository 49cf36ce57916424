//! Core traits for the DDNS updater
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Discover the caller's public IP
//! - [`DnsProvider`]: Read and upsert record sets via a provider API

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{
    ChangeInfo, ChangeStatus, DnsProvider, DnsRecord, HostedZoneId, PageCursor, RecordChange,
    RecordPage, ZoneSummary,
};
