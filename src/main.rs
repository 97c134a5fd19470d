use logpush_gateway::error::GatewayError;

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    logpush_gateway::app::run().await
}
