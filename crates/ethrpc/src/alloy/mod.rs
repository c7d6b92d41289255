pub mod errors;
mod instrumentation;

#[cfg(any(test, feature = "test-util"))]
pub use alloy::providers::mock::Asserter;
use {
    crate::AlloyProvider,
    alloy::{
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    instrumentation::InstrumentationLayer,
    url::Url,
};

/// Creates a provider talking to the node at `url`. Every request is logged
/// under `label`.
pub fn provider(url: &Url, label: &str) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer {
            label: label.to_string(),
        })
        .http(url.clone());
    ProviderBuilder::new().connect_client(rpc).erased()
}

/// Creates a provider whose responses are scripted through the returned
/// [`Asserter`], one response per request in FIFO order.
#[cfg(any(test, feature = "test-util"))]
pub fn mock_provider() -> (AlloyProvider, Asserter) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new()
        .connect_mocked_client(asserter.clone())
        .erased();
    (provider, asserter)
}

/// Creates a provider whose requests never complete.
#[cfg(any(test, feature = "test-util"))]
pub fn unresponsive_provider() -> AlloyProvider {
    let rpc = ClientBuilder::default().transport(unresponsive::Unresponsive, true);
    ProviderBuilder::new().connect_client(rpc).erased()
}

#[cfg(any(test, feature = "test-util"))]
mod unresponsive {
    use {
        alloy::{
            rpc::json_rpc::{RequestPacket, ResponsePacket},
            transports::{TransportError, TransportFut},
        },
        std::task::{Context, Poll},
        tower::Service,
    };

    #[derive(Clone, Debug)]
    pub(super) struct Unresponsive;

    impl Service<RequestPacket> for Unresponsive {
        type Error = TransportError;
        type Future = TransportFut<'static>;
        type Response = ResponsePacket;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _: RequestPacket) -> Self::Future {
            Box::pin(std::future::pending())
        }
    }
}
