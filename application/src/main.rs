use std::{io, process::ExitCode, sync::OnceLock};

use application::{Args, Config, Service};
use service::infra::Memory;
use tokio::io::AsyncWriteExt as _;
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() -> ExitCode {
    // Standard output is reserved for JSON documents.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO)
                            >= *meta.level()
                })),
        )
        .init();

    let args = Args::parse().unwrap_or_else(|e| e.exit());

    match start(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

async fn start(args: Args) -> Result<(), ()> {
    let Args { config, command } = args;

    let Config {
        store,
        service,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let memory = match store.snapshot {
        Some(path) => Memory::open(path).await.map_err(|e| {
            log::error!("failed to open `Memory` snapshot: {e}");
        })?,
        None => Memory::new(),
    };
    let service = Service::new(service.into(), memory);

    let (document, result) =
        match application::run(&service, command, tokio::io::stdin()).await {
            Ok(document) => (document, Ok(())),
            Err(e) => {
                if e.status_code.is_server_error() {
                    log::error!("command failed: {e}");
                } else {
                    log::debug!("command rejected: {e}");
                }
                (e.to_document(), Err(()))
            }
        };

    let mut output = serde_json::to_vec_pretty(&document).map_err(|e| {
        log::error!("failed to serialize output: {e}");
    })?;
    output.push(b'\n');

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&output).await.map_err(|e| {
        log::error!("failed to write output: {e}");
    })?;
    stdout.flush().await.map_err(|e| {
        log::error!("failed to flush output: {e}");
    })?;

    result
}
