pub use hookrich::api::usage_log_handler::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    hookrich::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
