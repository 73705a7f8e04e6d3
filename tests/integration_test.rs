use std::sync::Arc;
use std::thread;

use qrand_core::{
    numeral, BackendError, BackendErrorKind, ChainBuilder, Error, ExtractionResult,
    HadamardProtocol, Measurement, MonobitFrequency, QuantumProtocol, ReplayPlatform,
    TokenEquals, TokenLength, ValidationDecorator,
};

fn abc_platform() -> ReplayPlatform {
    ReplayPlatform::new(vec![Measurement::from_bitstring("101")
        .unwrap()
        .with_validation_token("abc")])
}

#[test]
fn end_to_end_accepts_matching_chain() {
    let chain = ValidationDecorator::new(
        ValidationDecorator::new(HadamardProtocol::new(3), TokenEquals::new("abc")),
        |token: &str| token.chars().count() == 3,
    );

    let result = chain.run(&abc_platform()).unwrap();

    let live = result.live().expect("both layers accept \"abc\"");
    assert!(chain.validate(live));
    assert_eq!(live.bitstring(), "101");
}

#[test]
fn end_to_end_outer_rejection_erases() {
    let chain = ValidationDecorator::new(
        ValidationDecorator::new(HadamardProtocol::new(3), TokenEquals::new("abc")),
        TokenLength::new(4),
    );

    let result = chain.run(&abc_platform()).unwrap();

    assert!(matches!(result, ExtractionResult::Erased(_)));
    assert!(result.live().is_none());
    assert!(result.validation_token().is_none());
}

#[test]
fn backend_failure_is_not_an_erased_result() {
    let platform = ReplayPlatform::failing(BackendError::new(
        BackendErrorKind::Unavailable,
        "connection refused",
    ));
    let chain = ChainBuilder::new(HadamardProtocol::new(3))
        .validate_with(TokenLength::new(4))
        .build()
        .unwrap();

    match chain.run(&platform) {
        Err(Error::Backend(e)) => assert_eq!(e.kind(), BackendErrorKind::Unavailable),
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[test]
fn monobit_layer_rejects_stuck_source() {
    let platform = ReplayPlatform::new(vec![Measurement::from_bitstring(&"1".repeat(64)).unwrap()]);
    let chain = ChainBuilder::new(HadamardProtocol::new(64))
        .validate_with(MonobitFrequency::new())
        .build()
        .unwrap();

    assert!(!chain.run(&platform).unwrap().is_live());
}

#[test]
fn extracted_integer_renders_as_numeral() {
    let platform = ReplayPlatform::new(vec![Measurement::from_bitstring("1000000001").unwrap()]);
    let chain = ChainBuilder::new(HadamardProtocol::new(10))
        .validate_with(MonobitFrequency::new())
        .build()
        .unwrap();

    let live = chain.run(&platform).unwrap().into_live().unwrap();
    let value = live.to_u128().unwrap();
    assert_eq!(value, 513);

    let rendered = numeral::encode_base32(value).unwrap();
    assert_eq!(numeral::decode_base32(&rendered).unwrap(), 513);
}

#[test]
fn chain_runs_concurrently() {
    let chain: Arc<dyn QuantumProtocol> = Arc::from(
        ChainBuilder::new(HadamardProtocol::new(3))
            .validate_with(TokenEquals::new("abc"))
            .build()
            .unwrap(),
    );
    let platform = Arc::new(abc_platform());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let chain = Arc::clone(&chain);
            let platform = Arc::clone(&platform);
            thread::spawn(move || chain.run(platform.as_ref()).unwrap().is_live())
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(platform.executions(), 8);
}
