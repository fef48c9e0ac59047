use alloy::primitives::{address, Address};

/// Multicall3 is deployed at the same address on every chain that has it.
const MULTICALL3: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

/// Local development chains whose deployments are never version-checked.
const VERSION_CHECK_EXEMPT: &[u64] = &[31337, 1234];

#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: &'static str,
    pub multicall3: Option<Address>,
    /// Slug used in app pool URLs (`/pools/<slug>/<address>`).
    pub url_slug: &'static str,
}

impl ChainConfig {
    pub fn get(chain_id: u64) -> Self {
        match chain_id {
            1 => Self::mainnet(),
            4 => Self::rinkeby(),
            42 => Self::kovan(),
            100 => Self::xdai(),
            137 => Self::polygon(),
            80001 => Self::mumbai(),
            31337 => Self::local(31337, "Localhost", "localhost"),
            1234 => Self::local(1234, "Local Fork", "fork"),
            other => Self {
                chain_id: other,
                name: "unknown",
                multicall3: None,
                url_slug: "unknown",
            },
        }
    }

    pub fn mainnet() -> Self {
        Self {
            chain_id: 1,
            name: "Ethereum Mainnet",
            multicall3: Some(MULTICALL3),
            url_slug: "mainnet",
        }
    }

    pub fn rinkeby() -> Self {
        Self {
            chain_id: 4,
            name: "Rinkeby",
            multicall3: None,
            url_slug: "rinkeby",
        }
    }

    pub fn kovan() -> Self {
        Self {
            chain_id: 42,
            name: "Kovan",
            multicall3: None,
            url_slug: "kovan",
        }
    }

    pub fn xdai() -> Self {
        Self {
            chain_id: 100,
            name: "xDai",
            multicall3: Some(MULTICALL3),
            url_slug: "xdai",
        }
    }

    pub fn polygon() -> Self {
        Self {
            chain_id: 137,
            name: "Polygon",
            multicall3: Some(MULTICALL3),
            url_slug: "polygon",
        }
    }

    pub fn mumbai() -> Self {
        Self {
            chain_id: 80001,
            name: "Mumbai",
            multicall3: Some(MULTICALL3),
            url_slug: "mumbai",
        }
    }

    fn local(chain_id: u64, name: &'static str, url_slug: &'static str) -> Self {
        Self {
            chain_id,
            name,
            multicall3: None,
            url_slug,
        }
    }
}

/// Networks the app can link to as alternatives when a deployment looks wrong.
pub fn supported_chain_ids() -> &'static [u64] {
    &[1, 4, 42, 100, 137, 80001, 31337, 1234]
}

/// Trusted, unchecked networks: advisories are suppressed for these.
pub fn version_check_exempt(chain_id: u64) -> bool {
    VERSION_CHECK_EXEMPT.contains(&chain_id)
}

pub fn chain_name(chain_id: u64) -> &'static str {
    ChainConfig::get(chain_id).name
}
