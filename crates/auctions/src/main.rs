use clap::Parser;

#[tokio::main]
async fn main() {
    let args = auctions::arguments::Arguments::parse();
    observe::tracing::initialize(&observe::Config::new(
        &args.log_filter,
        args.log_stderr_threshold.into_level(),
        args.use_json_logs,
    ));
    tracing::info!("running auctions with validated arguments:\n{}", args);
    if let Err(err) = auctions::main(args).await {
        tracing::error!(?err, "auction command failed");
        std::process::exit(1);
    }
}
