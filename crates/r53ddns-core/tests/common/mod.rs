//! Test doubles and common utilities for engine contract tests
//!
//! This module provides in-memory stand-ins for the IP source and the DNS
//! provider that record every call made against them.

#![allow(dead_code)]

use r53ddns_core::error::{Error, Result};
use r53ddns_core::traits::{
    ChangeInfo, ChangeStatus, DnsProvider, DnsRecord, HostedZoneId, IpSource, PageCursor,
    RecordChange, RecordPage, ZoneSummary,
};
use r53ddns_core::RunConfig;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IP source returning a fixed address (or a fixed failure)
#[derive(Clone)]
pub struct FixedIpSource {
    ip: Arc<Mutex<Option<Ipv4Addr>>>,
    call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip: Arc::new(Mutex::new(Some(ip))),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source that always fails, like an unreachable trace endpoint
    pub fn unavailable() -> Self {
        Self {
            ip: Arc::new(Mutex::new(None)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Change the address returned by subsequent calls
    pub fn set(&self, ip: Ipv4Addr) {
        *self.ip.lock().unwrap() = Some(ip);
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        (*self.ip.lock().unwrap()).ok_or_else(|| Error::ip_source("no ip line in trace response"))
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

#[derive(Default)]
struct ProviderState {
    zones: Vec<ZoneSummary>,
    pages: Vec<Vec<DnsRecord>>,
    upserts: Vec<(HostedZoneId, RecordChange)>,
    fail_listing: bool,
    fail_upsert: bool,
}

/// An in-memory provider serving record sets in fixed pages
///
/// Clones share state, so a test can keep a handle while the engine owns a
/// boxed copy. Upserts are applied to the stored pages, so a second run sees
/// the value written by the first.
#[derive(Clone, Default)]
pub struct PagedDnsProvider {
    state: Arc<Mutex<ProviderState>>,
    zone_calls: Arc<AtomicUsize>,
    page_calls: Arc<AtomicUsize>,
}

impl PagedDnsProvider {
    pub fn new(zones: Vec<ZoneSummary>, pages: Vec<Vec<DnsRecord>>) -> Self {
        let provider = Self::default();
        {
            let mut state = provider.state.lock().unwrap();
            state.zones = zones;
            state.pages = pages;
        }
        provider
    }

    /// A single zone `Z123` named `example.com.` with the given pages
    pub fn example_zone(pages: Vec<Vec<DnsRecord>>) -> Self {
        Self::new(
            vec![zone("Z123", "example.com.")],
            pages,
        )
    }

    pub fn fail_listing(self) -> Self {
        self.state.lock().unwrap().fail_listing = true;
        self
    }

    pub fn fail_upsert(self) -> Self {
        self.state.lock().unwrap().fail_upsert = true;
        self
    }

    pub fn zone_calls(&self) -> usize {
        self.zone_calls.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn upserts(&self) -> Vec<(HostedZoneId, RecordChange)> {
        self.state.lock().unwrap().upserts.clone()
    }

    pub fn upsert_count(&self) -> usize {
        self.state.lock().unwrap().upserts.len()
    }
}

fn page_cursor(index: usize) -> PageCursor {
    PageCursor {
        next_name: format!("page-{}", index),
        next_type: Some("A".to_string()),
        next_identifier: None,
    }
}

#[async_trait::async_trait]
impl DnsProvider for PagedDnsProvider {
    async fn list_zones_by_name(&self, _dns_name: &str) -> Result<Vec<ZoneSummary>> {
        self.zone_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(Error::provider("fake", "AccessDenied"));
        }
        Ok(state.zones.clone())
    }

    async fn list_record_sets(
        &self,
        zone_id: &HostedZoneId,
        cursor: Option<&PageCursor>,
    ) -> Result<RecordPage> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();

        if !state.zones.iter().any(|z| &z.id == zone_id) {
            return Err(Error::provider("fake", format!("NoSuchHostedZone: {}", zone_id)));
        }

        let index = match cursor {
            None => 0,
            Some(c) => c
                .next_name
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| Error::provider("fake", "bad cursor"))?,
        };

        let records = state.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < state.pages.len()).then(|| page_cursor(index + 1));

        Ok(RecordPage { records, next })
    }

    async fn upsert_record(
        &self,
        zone_id: &HostedZoneId,
        change: &RecordChange,
    ) -> Result<ChangeInfo> {
        let mut state = self.state.lock().unwrap();
        if state.fail_upsert {
            return Err(Error::provider("fake", "Throttling"));
        }

        state.upserts.push((zone_id.clone(), change.clone()));

        let replacement = DnsRecord {
            name: change.name.clone(),
            record_type: change.record_type.clone(),
            values: vec![change.value.clone()],
            ttl: Some(change.ttl),
        };

        let mut replaced = false;
        for existing in state.pages.iter_mut().flat_map(|page| page.iter_mut()) {
            if existing.name == change.name && existing.record_type == change.record_type {
                *existing = replacement.clone();
                replaced = true;
                break;
            }
        }

        if !replaced {
            if state.pages.is_empty() {
                state.pages.push(Vec::new());
            }
            if let Some(last) = state.pages.last_mut() {
                last.push(replacement);
            }
        }

        let id = format!("C{}", state.upserts.len());
        Ok(ChangeInfo {
            id,
            status: ChangeStatus::Pending,
            submitted_at: None,
            comment: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

pub fn zone(id: &str, name: &str) -> ZoneSummary {
    ZoneSummary {
        id: HostedZoneId::new(id),
        name: name.to_string(),
    }
}

pub fn record(name: &str, record_type: &str, value: &str) -> DnsRecord {
    DnsRecord {
        name: name.to_string(),
        record_type: record_type.to_string(),
        values: vec![value.to_string()],
        ttl: Some(300),
    }
}

/// Filler records that never match `host.example.com.`
pub fn filler_page() -> Vec<DnsRecord> {
    vec![
        DnsRecord {
            name: "example.com.".to_string(),
            record_type: "NS".to_string(),
            values: vec!["ns-1.awsdns-01.org.".to_string()],
            ttl: Some(172800),
        },
        record("example.com.", "A", "198.51.100.1"),
        record("www.example.com.", "A", "198.51.100.2"),
    ]
}

/// zone = example.com, record = host.example.com, ttl = 300
pub fn example_config() -> RunConfig {
    RunConfig::new("example.com", "host.example.com", 300)
}
