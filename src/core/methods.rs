//! Provider method table
//!
//! The closed set of EIP-1193 methods the bridge answers. Anything outside this
//! table is rejected by name rather than forwarded.

pub const CHAIN_ID: &str = "eth_chainId";
pub const ACCOUNTS: &str = "eth_accounts";
pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const GET_BALANCE: &str = "eth_getBalance";
pub const BLOCK_NUMBER: &str = "eth_blockNumber";
pub const CALL: &str = "eth_call";
pub const ESTIMATE_GAS: &str = "eth_estimateGas";
pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
pub const PERSONAL_SIGN: &str = "personal_sign";
pub const SIGN_TYPED_DATA: &str = "eth_signTypedData";
pub const SIGN_TYPED_DATA_V4: &str = "eth_signTypedData_v4";
pub const GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
pub const GET_TRANSACTION_BY_HASH: &str = "eth_getTransactionByHash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    ChainId,
    Accounts,
    RequestAccounts,
    GetBalance,
    BlockNumber,
    Call,
    EstimateGas,
    SendTransaction,
    PersonalSign,
    SignTypedData,
    SignTypedDataV4,
    GetTransactionReceipt,
    GetTransactionByHash,
}

impl Method {
    pub const ALL: &'static [Method] = &[
        Method::ChainId,
        Method::Accounts,
        Method::RequestAccounts,
        Method::GetBalance,
        Method::BlockNumber,
        Method::Call,
        Method::EstimateGas,
        Method::SendTransaction,
        Method::PersonalSign,
        Method::SignTypedData,
        Method::SignTypedDataV4,
        Method::GetTransactionReceipt,
        Method::GetTransactionByHash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::ChainId => CHAIN_ID,
            Method::Accounts => ACCOUNTS,
            Method::RequestAccounts => REQUEST_ACCOUNTS,
            Method::GetBalance => GET_BALANCE,
            Method::BlockNumber => BLOCK_NUMBER,
            Method::Call => CALL,
            Method::EstimateGas => ESTIMATE_GAS,
            Method::SendTransaction => SEND_TRANSACTION,
            Method::PersonalSign => PERSONAL_SIGN,
            Method::SignTypedData => SIGN_TYPED_DATA,
            Method::SignTypedDataV4 => SIGN_TYPED_DATA_V4,
            Method::GetTransactionReceipt => GET_TRANSACTION_RECEIPT,
            Method::GetTransactionByHash => GET_TRANSACTION_BY_HASH,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == name)
    }

    /// Methods that act on behalf of the bound account.
    pub fn requires_account(&self) -> bool {
        matches!(
            self,
            Method::SendTransaction | Method::PersonalSign | Method::SignTypedData | Method::SignTypedDataV4
        )
    }

    /// Transaction lifecycle methods (send + polling), logged with their params.
    pub fn is_transaction(&self) -> bool {
        matches!(
            self,
            Method::SendTransaction | Method::GetTransactionReceipt | Method::GetTransactionByHash
        )
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_both_ways() {
        for method in Method::ALL {
            assert_eq!(Method::from_name(method.as_str()), Some(*method));
        }
        assert_eq!(Method::from_name("eth_getLogs"), None);
        assert_eq!(Method::from_name("ETH_CHAINID"), None);
    }

    #[test]
    fn signing_methods_need_an_account() {
        let signing: Vec<_> = Method::ALL.iter().filter(|m| m.requires_account()).collect();
        assert_eq!(signing.len(), 4);
        assert!(!Method::Accounts.requires_account());
        assert!(!Method::EstimateGas.requires_account());
    }
}
