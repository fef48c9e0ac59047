//! Presentation of version advisories.
//!
//! The resolver only records that a deployment was unrecognized; this module
//! turns that into the dismissible warning surface: headline, detail naming
//! the contract and network, and links to the same pool on the other
//! supported networks. Dismissal itself belongs to the consuming UI.

use crate::config::chains::{self, ChainConfig};
use crate::resolver::Advisory;
use alloy::primitives::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkLink {
    pub chain_id: u64,
    pub name: &'static str,
    pub href: String,
}

/// Alternative networks to suggest for a pool address, excluding the network
/// it was just checked on and the local dev chains.
pub fn alternative_network_links(current_chain_id: u64, prize_pool: Address) -> Vec<NetworkLink> {
    chains::supported_chain_ids()
        .iter()
        .copied()
        .filter(|id| *id != current_chain_id && !chains::version_check_exempt(*id))
        .map(|id| {
            let cfg = ChainConfig::get(id);
            NetworkLink {
                chain_id: id,
                name: cfg.name,
                href: format!("/pools/{}/{prize_pool}", cfg.url_slug),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct WarningBanner {
    pub headline: &'static str,
    pub detail: String,
    pub hint: String,
    pub alternatives: Vec<NetworkLink>,
}

impl WarningBanner {
    /// `None` when the advisory came from a version-check-exempt network.
    pub fn from_advisory(advisory: &Advisory, prize_pool: Address) -> Option<Self> {
        if chains::version_check_exempt(advisory.chain_id) {
            return None;
        }
        let network = chains::chain_name(advisory.chain_id);
        Some(Self {
            headline: "Warning",
            detail: format!(
                "This version of the app may be incompatible with contract {} on {network}.",
                advisory.address
            ),
            hint: format!("Is {network} the correct network for this contract?"),
            alternatives: alternative_network_links(advisory.chain_id, prize_pool),
        })
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(self.headline);
        out.push('\n');
        out.push_str(&self.detail);
        out.push('\n');
        out.push_str(&self.hint);
        out.push_str(" Possibly try one of the following networks:\n");
        for link in &self.alternatives {
            out.push_str(&format!("  - {}: {}\n", link.name, link.href));
        }
        out
    }
}
