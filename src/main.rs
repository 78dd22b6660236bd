use anyhow::Context;
use chrono::Utc;

use mailsift::config::ExporterConfig;
use mailsift::content::TextNormalizer;
use mailsift::output::{FileSink, OutputSink};
use mailsift::pipeline::BatchOrchestrator;
use mailsift::source::{MaildirSource, MessageSource};
use mailsift::store::DedupStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ExporterConfig::from_env().context("invalid configuration")?;
    eprintln!("mailsift v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Provider: {}", config.provider);
    eprintln!("   Maildir: {}", config.maildir.display());

    let source = MaildirSource::new(&config.maildir);
    let mut store = DedupStore::open(config.cache_path());
    eprintln!(
        "   Cache: {} UIDs, {} content hashes",
        store.processed_count(),
        store.hash_count()
    );

    let output_path = config.output_path(Utc::now());
    let mut sink = FileSink::create(&output_path)
        .with_context(|| format!("cannot create {}", output_path.display()))?;

    let mut uids = source
        .list_uids()
        .await
        .context("cannot list messages")?;
    if uids.len() > config.batch_size {
        uids.truncate(config.batch_size);
    }
    eprintln!("   Processing {} messages\n", uids.len());

    let orchestrator =
        BatchOrchestrator::new(TextNormalizer::default(), config.progress_interval);
    let stats = {
        let run = orchestrator.run(&source, &mut store, &mut sink, &uids);
        tokio::pin!(run);
        tokio::select! {
            stats = &mut run => Some(stats),
            _ = tokio::signal::ctrl_c() => None,
        }
    };

    let Some(stats) = stats else {
        eprintln!("\nInterrupted; saving state");
        mailsift::pipeline::persist_on_abort(&store, &mut sink);
        return Ok(());
    };

    sink.finalize().context("cannot finalize output")?;

    println!("{}", stats.summary());
    println!("Output written to {}", output_path.display());
    Ok(())
}
