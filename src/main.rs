//! Provider binary: one JSON request on stdin, one JSON response on stdout.

use std::io::Read;
use std::process::ExitCode;

use log::error;
use terraform_provider_runscope::commands::{handle_request, ProviderRequest, ProviderResponse};
use terraform_provider_runscope::error::ProviderError;
use terraform_provider_runscope::service::ProviderService;
use terraform_provider_runscope::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let mut input = String::new();
    let response = match std::io::stdin().read_to_string(&mut input) {
        Ok(_) => match serde_json::from_str::<ProviderRequest>(&input) {
            Ok(request) => handle_request(&ProviderService::new(), request).await,
            Err(e) => ProviderResponse::error(ProviderError::decode(format!("Invalid request: {}", e))),
        },
        Err(e) => ProviderResponse::error(ProviderError::decode(format!("Failed to read request: {}", e))),
    };

    match serde_json::to_string(&response) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to encode response: {}", e);
            ExitCode::FAILURE
        }
    }
}
