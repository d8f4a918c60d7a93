use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const ADDRESS_LEN: usize = 20;

/// Wallet address that owns a list of registered files.
///
/// Parsed from `0x`-prefixed hex. Mixed-case (checksummed) input is accepted
/// and compared by its bytes, so `0xAbC...` and `0xabc...` are the same
/// account. Always displayed as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Account([u8; ADDRESS_LEN]);

impl Account {
    /// Parse from a `0x`-prefixed, 40 hex character address.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| TypeError::MissingAddressPrefix(trimmed.to_string()))?;
        let bytes = hex::decode(digits).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != ADDRESS_LEN {
            return Err(TypeError::InvalidLength {
                expected: ADDRESS_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; ADDRESS_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Create from raw address bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Create a random account for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Full `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Abbreviated form, `0x1234...abcd`.
    pub fn short(&self) -> String {
        let full = self.to_hex();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for Account {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Account {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Account> for String {
    fn from(account: Account) -> Self {
        account.to_hex()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self.short())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn parse_accepts_checksummed_address() {
        let account = Account::parse(ADDR).unwrap();
        assert_eq!(account.to_hex(), ADDR.to_lowercase());
    }

    #[test]
    fn case_does_not_change_identity() {
        let upper = Account::parse(ADDR).unwrap();
        let lower = Account::parse(&ADDR.to_lowercase()).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn missing_prefix_is_rejected() {
        let err = Account::parse(&ADDR[2..]).unwrap_err();
        assert!(matches!(err, TypeError::MissingAddressPrefix(_)));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = Account::parse("0xabcd").unwrap_err();
        assert_eq!(err, TypeError::InvalidLength { expected: 20, actual: 2 });
    }

    #[test]
    fn non_hex_is_rejected() {
        let err = Account::parse("0xzz").unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn short_form_matches_wallet_ui() {
        let account = Account::parse(ADDR).unwrap();
        assert_eq!(account.short(), "0x5fbd...0aa3");
    }

    #[test]
    fn ephemeral_accounts_are_unique() {
        assert_ne!(Account::ephemeral(), Account::ephemeral());
    }

    #[test]
    fn serializes_as_hex_string() {
        let account = Account::parse(ADDR).unwrap();
        let json = serde_json::to_string(&account).unwrap();
        assert_eq!(json, format!("\"{}\"", ADDR.to_lowercase()));
        let parsed: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, account);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        let result: Result<Account, _> = serde_json::from_str("\"not-an-address\"");
        assert!(result.is_err());
    }
}
