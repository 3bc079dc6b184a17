use crate::models::{Side, dec};
use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Canonical order payload: what the matching engine fills and what gets hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardizedOrder {
    pub side: Side,
    /// Token the order sells.
    pub token_s: Address,
    /// Token the order buys.
    pub token_b: Address,
    #[serde(with = "dec::u256")]
    pub amount_s: U256,
    #[serde(with = "dec::u256")]
    pub amount_b: U256,
    /// Fees are charged in the bought token.
    pub fee_token: Address,
    #[serde(with = "dec::u256")]
    pub fee_amount: U256,
    /// Taker fee rate that was applied, in wei (1e18 = 100%).
    #[serde(with = "dec::u256")]
    pub fee_rate: U256,
}

static ORDER_TYPEHASH: LazyLock<B256> = LazyLock::new(|| {
    keccak256(
        "Order(address owner,address tokenS,address tokenB,uint256 amountS,uint256 amountB,\
         address feeToken,uint256 feeAmount,uint64 nonce,uint32 validUntil)",
    )
});

/// A standardized order bound to an owner, ready for hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignableOrder {
    pub order: StandardizedOrder,
    pub owner: Address,
    pub nonce: u64,
    /// Unix seconds after which the order is void.
    pub valid_until: u32,
}

impl SignableOrder {
    pub fn new(order: StandardizedOrder, owner: Address, nonce: u64, valid_until: u32) -> Self {
        Self {
            order,
            owner,
            nonce,
            valid_until,
        }
    }

    /// keccak256 over the type hash followed by every field as a 32-byte word.
    pub fn hash(&self) -> B256 {
        let words = [
            *ORDER_TYPEHASH,
            self.owner.into_word(),
            self.order.token_s.into_word(),
            self.order.token_b.into_word(),
            B256::from(self.order.amount_s),
            B256::from(self.order.amount_b),
            self.order.fee_token.into_word(),
            B256::from(self.order.fee_amount),
            B256::from(U256::from(self.nonce)),
            B256::from(U256::from(self.valid_until)),
        ];
        let mut encoded = Vec::with_capacity(words.len() * 32);
        for word in &words {
            encoded.extend_from_slice(word.as_slice());
        }
        keccak256(encoded)
    }
}

/// An order with its hash and the owner's 65-byte signature over that hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOrder {
    pub order: SignableOrder,
    pub hash: B256,
    pub signature: Bytes,
}
