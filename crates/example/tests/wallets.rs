#![deny(unused_variables, unused_mut)]

use aeternity_rs::{dev_wallets, Signer};

#[aeternity_test_helpers::test]
async fn runs_without_wallets() {
    assert_eq!(dev_wallets(0).len(), 0);
}

#[aeternity_test_helpers::test(wallets: 2)]
async fn injects_dev_wallets_in_order(first: Signer, second: Signer) {
    let expected = dev_wallets(2);
    assert_eq!(first.account_id(), expected[0].account_id());
    assert_eq!(second.account_id(), expected[1].account_id());
}
