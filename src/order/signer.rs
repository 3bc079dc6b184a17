use crate::errors::Result;
use crate::order::types::{SignableOrder, SignedOrder};
use alloy_primitives::{Address, Bytes};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::H256;
use tracing::info;

/// Anything able to sign an order hash on behalf of its owner.
pub trait OrderSigner {
    fn address(&self) -> Address;

    fn sign_order(&self, order: SignableOrder) -> Result<SignedOrder>;
}

/// Signs order hashes with a local private key.
#[derive(Clone)]
pub struct WalletSigner {
    wallet: LocalWallet,
}

impl WalletSigner {
    pub fn new(wallet: LocalWallet) -> Self {
        Self { wallet }
    }

    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let wallet: LocalWallet = private_key.trim().parse()?;
        Ok(Self::new(wallet))
    }
}

impl OrderSigner for WalletSigner {
    fn address(&self) -> Address {
        Address::from(self.wallet.address().0)
    }

    fn sign_order(&self, order: SignableOrder) -> Result<SignedOrder> {
        let hash = order.hash();
        let signature = self.wallet.sign_hash(H256::from_slice(hash.as_slice()))?;
        info!(%hash, owner = %order.owner, "[SIGN] order signed");
        Ok(SignedOrder {
            order,
            hash,
            signature: Bytes::from(signature.to_vec()),
        })
    }
}
