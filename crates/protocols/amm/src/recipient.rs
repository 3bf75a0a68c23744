//! Recipient resolution
//!
//! The recipient override is either empty (swap to self), a hex address, or a
//! name that has to be looked up through the name service.

use ethers::types::Address;
use evm_client::{NameResolution, NameResolver};

/// Resolved recipient of a swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientStatus {
    Resolved(Address),
    /// Neither an address nor a name with an address record
    Invalid,
    /// Name lookup could not complete yet
    Loading,
}

impl RecipientStatus {
    pub fn address(&self) -> Option<Address> {
        match self {
            Self::Resolved(address) => Some(*address),
            _ => None,
        }
    }
}

/// Resolve the recipient override against the sending account.
///
/// A non-address input without a resolver is invalid.
pub async fn resolve_recipient(
    resolver: Option<&dyn NameResolver>,
    input: Option<&str>,
    account: Address,
) -> RecipientStatus {
    let input = match input.map(str::trim) {
        None | Some("") => return RecipientStatus::Resolved(account),
        Some(input) => input,
    };

    if let Some(address) = evm_tx::is_address(input) {
        return RecipientStatus::Resolved(address);
    }

    let Some(resolver) = resolver else {
        return RecipientStatus::Invalid;
    };

    match resolver.resolve_name(input).await {
        NameResolution::Found(address) => RecipientStatus::Resolved(address),
        NameResolution::NotFound => RecipientStatus::Invalid,
        NameResolution::Unavailable(reason) => {
            tracing::debug!(name = %input, %reason, "Name lookup unavailable");
            RecipientStatus::Loading
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticResolver;

    #[async_trait]
    impl NameResolver for StaticResolver {
        async fn resolve_name(&self, name: &str) -> NameResolution {
            match name {
                "alice.eth" => NameResolution::Found(Address::repeat_byte(0xa1)),
                "offline.eth" => NameResolution::Unavailable("connection refused".to_string()),
                _ => NameResolution::NotFound,
            }
        }
    }

    #[tokio::test]
    async fn test_empty_input_is_sender() {
        let account = Address::repeat_byte(0x11);
        assert_eq!(
            resolve_recipient(None, None, account).await,
            RecipientStatus::Resolved(account)
        );
        assert_eq!(
            resolve_recipient(None, Some(""), account).await,
            RecipientStatus::Resolved(account)
        );
    }

    #[tokio::test]
    async fn test_hex_address() {
        let account = Address::repeat_byte(0x11);
        let status = resolve_recipient(
            None,
            Some("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
            account,
        )
        .await;
        assert_eq!(
            status.address(),
            evm_tx::is_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed")
        );

        // Wrong checksum
        let status = resolve_recipient(
            None,
            Some("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
            account,
        )
        .await;
        assert_eq!(status, RecipientStatus::Invalid);
    }

    #[tokio::test]
    async fn test_name_lookup() {
        let resolver = StaticResolver;
        let account = Address::repeat_byte(0x11);

        assert_eq!(
            resolve_recipient(Some(&resolver), Some("alice.eth"), account).await,
            RecipientStatus::Resolved(Address::repeat_byte(0xa1))
        );
        assert_eq!(
            resolve_recipient(Some(&resolver), Some("nobody.eth"), account).await,
            RecipientStatus::Invalid
        );
        assert_eq!(
            resolve_recipient(Some(&resolver), Some("offline.eth"), account).await,
            RecipientStatus::Loading
        );
        assert_eq!(
            resolve_recipient(None, Some("alice.eth"), account).await,
            RecipientStatus::Invalid
        );
    }
}
