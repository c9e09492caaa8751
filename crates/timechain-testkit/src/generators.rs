//! Proptest generators for property-based testing.

use proptest::prelude::*;

use timechain_core::{Chain, ChainConfig, HashMode};

use crate::fixtures::TestFixture;

/// Generate a hash mode.
pub fn hash_mode() -> impl Strategy<Value = HashMode> {
    prop_oneof![Just(HashMode::Unsigned), Just(HashMode::SignatureBound)]
}

/// Generate a timestamp, including pre-epoch values.
pub fn timestamp() -> impl Strategy<Value = i64> {
    -1_000_000_000_000i64..=4_000_000_000_000i64
}

/// Generate a block payload.
pub fn payload() -> impl Strategy<Value = String> {
    ".{0,48}".prop_map(String::from)
}

/// Generate a genesis sentinel.
pub fn sentinel() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("0".to_string()), "[0-9a-f]{64}"]
}

/// Parameters for generating a chain.
#[derive(Debug, Clone)]
pub struct ChainParams {
    pub config: ChainConfig,
    pub payloads: Vec<String>,
}

impl Arbitrary for ChainParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            hash_mode(),
            sentinel(),
            payload(),
            prop::collection::vec(payload(), 0..12),
        )
            .prop_map(|(mode, sentinel, genesis_data, payloads)| ChainParams {
                config: ChainConfig::default()
                    .hash_mode(mode)
                    .genesis_previous_hash(sentinel)
                    .genesis_data(genesis_data),
                payloads,
            })
            .boxed()
    }
}

/// Build the unsigned chain described by `params`.
pub fn chain_from_params(params: &ChainParams) -> Chain {
    TestFixture::with_config(params.config.clone()).chain_of(params.payloads.iter().cloned())
}
