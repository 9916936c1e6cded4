use std::fmt;
use std::str::FromStr;

use permapub_crypto::{format_amount, parse_amount, WalletError, U256};
use serde::{Deserialize, Serialize};

/// Payment currency accepted by the storage node.
///
/// Only EVM currencies are supported: the same secp256k1 key signs data
/// items and funding transfers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Ethereum,
    Matic,
    Arbitrum,
    Bnb,
    Avalanche,
    Fantom,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::Ethereum,
        Currency::Matic,
        Currency::Arbitrum,
        Currency::Bnb,
        Currency::Avalanche,
        Currency::Fantom,
    ];

    /// Name used in node API paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Ethereum => "ethereum",
            Currency::Matic => "matic",
            Currency::Arbitrum => "arbitrum",
            Currency::Bnb => "bnb",
            Currency::Avalanche => "avalanche",
            Currency::Fantom => "fantom",
        }
    }

    pub fn ticker(&self) -> &'static str {
        match self {
            Currency::Ethereum | Currency::Arbitrum => "ETH",
            Currency::Matic => "MATIC",
            Currency::Bnb => "BNB",
            Currency::Avalanche => "AVAX",
            Currency::Fantom => "FTM",
        }
    }

    /// Decimals between the base unit and the display unit.
    pub fn decimals(&self) -> u8 {
        18
    }

    /// Base units → display string (`"0.0012"`).
    pub fn format(&self, amount: U256) -> Result<String, WalletError> {
        format_amount(amount, self.decimals())
    }

    /// Display string → base units.
    pub fn parse(&self, amount: &str) -> Result<U256, WalletError> {
        parse_amount(amount, self.decimals())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| s.to_string())
    }
}
