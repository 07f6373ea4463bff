use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load_from(config::CONFIG_FILE)?;

    // Tokio runtime, worker thread count from config or one per CPU core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(config::AppState::new(cfg)?);
    logger::init(&state.config)?;

    let addr = state.config.get_socket_addr()?;
    let listener = server::create_listener(addr).map_err(|e| {
        logger::log_error(&format!("Failed to bind {addr}: {e}"));
        e
    })?;

    logger::log_server_start(addr.port());

    server::run(listener, state).await;
    Ok(())
}
