// # r53ddns-core
//
// Core library for the Route53 dynamic DNS updater.
//
// ## Architecture Overview
//
// - **IpSource**: Trait for discovering the caller's public IPv4 address
// - **DnsProvider**: Trait for listing zones/record sets and upserting records
// - **record**: Provider-independent record reader and writer
// - **DdnsEngine**: Runs one check: resolve IP, read record, upsert on change
// - **RunConfig**: Environment configuration, validated once at startup
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Injected Clients**: The engine owns the clients it is given, no globals
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Idempotency**: A write happens only when the published value differs

pub mod traits;
pub mod engine;
pub mod record;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider};
pub use engine::{DdnsEngine, RunOutcome};
pub use record::RecordLookup;
pub use config::{RunConfig, RunMode};
pub use error::{Error, Result};
