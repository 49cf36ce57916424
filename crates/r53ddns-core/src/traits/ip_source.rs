// # IP Source Trait
//
// Defines the interface for discovering the caller's public IPv4 address.
//
// ## Implementations
//
// - HTTP trace endpoint: `r53ddns-ip-trace` crate
//
// ## Usage
//
// ```rust,ignore
// use r53ddns_core::IpSource;
//
// #[tokio::main(flavor = "current_thread")]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let public_ip = source.current().await?;
//     println!("public IP: {}", public_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP source implementations
///
/// An IP source answers one question: what is the caller's public IPv4
/// address right now. It performs at most one lookup per call and keeps no
/// state between calls.
///
/// Failures are reported as [`crate::Error::IpSource`]. The engine turns them
/// into a reported outcome, so implementations must not retry or sleep.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The current public IP
    /// - `Err(Error)`: If the address could not be determined
    async fn current(&self) -> Result<Ipv4Addr, crate::Error>;

    /// Short name for logging (e.g. "trace")
    fn source_name(&self) -> &'static str;
}
