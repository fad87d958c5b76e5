//! Target lists: loading addresses from files, arguments or the built-in set

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::{Address, Error, Result};

/// A well-known mainnet address compiled into the binary
#[derive(Debug, Clone, Copy)]
pub struct KnownTarget {
    pub address: Address,
    pub name: &'static str,
}

/// Default targets when nothing else is configured
pub const KNOWN_TARGETS: &[KnownTarget] = &[
    KnownTarget {
        address: Address::from_hex_literal("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        name: "USDC",
    },
    KnownTarget {
        address: Address::from_hex_literal("0xdAC17F958D2ee523a2206206994597C13D831ec7"),
        name: "USDT",
    },
    KnownTarget {
        address: Address::from_hex_literal("0x6B175474E89094C44Da98b954EedeAC495271d0F"),
        name: "DAI",
    },
    KnownTarget {
        address: Address::from_hex_literal("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        name: "WETH",
    },
    KnownTarget {
        address: Address::from_hex_literal("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599"),
        name: "WBTC",
    },
    KnownTarget {
        address: Address::from_hex_literal("0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984"),
        name: "UNI",
    },
    KnownTarget {
        address: Address::from_hex_literal("0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D"),
        name: "Uniswap V2 Router",
    },
    KnownTarget {
        address: Address::from_hex_literal("0xE592427A0AEce92De3Edee1F18E0157C05861564"),
        name: "Uniswap V3 Router",
    },
    KnownTarget {
        address: Address::from_hex_literal("0x87870Bca3F3fD6335C3F4ce8392D69350B4fA4E2"),
        name: "Aave V3 Pool",
    },
    KnownTarget {
        address: Address::from_hex_literal("0x00000000219ab540356cBB839Cbe05303d7705Fa"),
        name: "Beacon Deposit Contract",
    },
    KnownTarget {
        address: Address::from_hex_literal("0x00000000006c3852cbEf3e08E8dF289169EdE581"),
        name: "Seaport 1.1",
    },
];

/// Name of a compiled-in target, if `address` is one
pub fn known_name(address: &Address) -> Option<&'static str> {
    KNOWN_TARGETS
        .iter()
        .find(|t| &t.address == address)
        .map(|t| t.name)
}

/// Target file shapes accepted in JSON and YAML
///
/// - `{"addresses": [...]}`
/// - a bare list of addresses
/// - a mapping of names to addresses, e.g. `USDC: "0xa0b8..."`
#[derive(Deserialize)]
#[serde(untagged)]
enum TargetFile {
    Manifest { addresses: Vec<String> },
    List(Vec<String>),
    Named(BTreeMap<String, String>),
}

#[derive(Deserialize)]
struct ManifestFile {
    addresses: Vec<String>,
}

impl TargetFile {
    /// Parse every entry, labelling failures with the entry's position or name
    fn into_list(self) -> Result<TargetList> {
        let labelled: Vec<(String, String)> = match self {
            TargetFile::Manifest { addresses } | TargetFile::List(addresses) => addresses
                .into_iter()
                .enumerate()
                .map(|(i, entry)| (format!("entry {}", i), entry))
                .collect(),
            TargetFile::Named(named) => named.into_iter().collect(),
        };

        let addresses = labelled
            .iter()
            .map(|(label, entry)| {
                entry
                    .parse::<Address>()
                    .map_err(|_| Error::MalformedAddress(format!("{}: {}", label, entry)))
            })
            .collect::<Result<Vec<Address>>>()?;
        Ok(TargetList::new(addresses))
    }
}

/// Parsed target addresses, in input order, duplicates kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetList {
    addresses: Vec<Address>,
}

impl TargetList {
    pub fn new(addresses: Vec<Address>) -> Self {
        Self { addresses }
    }

    /// The compiled-in list of well-known addresses
    pub fn known() -> Self {
        Self::new(KNOWN_TARGETS.iter().map(|t| t.address).collect())
    }

    /// Parse addresses given as strings, e.g. command-line arguments
    pub fn from_strs<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = entries
            .into_iter()
            .map(|entry| entry.as_ref().parse::<Address>())
            .collect::<Result<Vec<Address>>>()?;
        Ok(Self::new(addresses))
    }

    /// Load from a file
    ///
    /// `.json` and `.yaml`/`.yml` files hold one of the target file shapes
    /// (list, `addresses:` manifest, or name-to-address mapping). Anything
    /// else is read as one address per line (see [`TargetList::parse_text`]).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let list = match extension.as_deref() {
            Some("json") => Self::from_json(&content)?,
            Some("yaml") | Some("yml") => Self::from_yaml(&content)?,
            _ => Self::parse_text(&content)?,
        };

        tracing::debug!(path = %path.display(), targets = list.len(), "target list loaded");
        Ok(list)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: TargetFile = serde_json::from_str(content)?;
        file.into_list()
    }

    /// Parse a YAML target file
    ///
    /// Each shape is deserialized with concrete types, so unquoted scalars
    /// such as `0x10` stay strings instead of being read as YAML integers.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file = match serde_yaml::from_str::<Vec<String>>(content) {
            Ok(list) => TargetFile::List(list),
            Err(_) => match serde_yaml::from_str::<ManifestFile>(content) {
                Ok(manifest) => TargetFile::Manifest {
                    addresses: manifest.addresses,
                },
                Err(_) => TargetFile::Named(serde_yaml::from_str(content)?),
            },
        };
        file.into_list()
    }

    /// Parse one address per line, skipping blank lines and `#` comments
    pub fn parse_text(content: &str) -> Result<Self> {
        let mut addresses = Vec::new();
        for (lineno, raw) in content.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let address = line
                .parse::<Address>()
                .map_err(|_| Error::MalformedAddress(format!("line {}: {}", lineno + 1, line)))?;
            addresses.push(address);
        }
        Ok(Self::new(addresses))
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Number of entries, duplicates included
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Number of distinct addresses
    pub fn distinct_count(&self) -> usize {
        self.addresses.iter().collect::<HashSet<_>>().len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        self.addresses.iter().copied()
    }
}

impl IntoIterator for TargetList {
    type Item = Address;
    type IntoIter = std::vec::IntoIter<Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.into_iter()
    }
}

impl FromIterator<Address> for TargetList {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
