use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use courier::command::TemplateData;
use courier::mail::{LogMailer, Mailer, SmtpMailer};
use courier::source::{LineSource, MessageSource, NatsSource};
use courier::template::{FileRenderer, Renderer};
use courier::{shutdown_signal, EnvConfig, Worker, WorkerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "courier", about = "Send account emails from queued commands")]
struct Cli {
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    /// Template root directory (overrides TEMPLATE_DIR).
    #[arg(long, global = true)]
    templates: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consume commands and send emails until interrupted.
    Run {
        /// Log emails instead of sending them.
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Read newline-delimited payloads from stdin instead of the queue.
        #[arg(long, default_value_t = false)]
        stdin: bool,
    },
    /// Render a template to stdout.
    Render {
        #[arg(value_name = "template")]
        template: String,

        #[arg(long, default_value = "123456")]
        code: String,

        #[arg(long, default_value = "User")]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Logs go to stderr so `render` output stays clean.
    let level = match cli.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = WorkerConfig::from_env().context("reading worker config")?;
    if let Some(dir) = cli.templates {
        config.template_dir = dir;
    }

    match cli.command {
        Commands::Run { dry_run: true, stdin } => serve(config, LogMailer, stdin).await,
        Commands::Run { dry_run: false, stdin } => {
            let mailer = SmtpMailer::from_env().context("configuring SMTP mailer")?;
            serve(config, mailer, stdin).await
        }
        Commands::Render {
            template,
            code,
            user,
        } => {
            let renderer = FileRenderer::new(&config.template_dir);
            let data = TemplateData {
                activation_code: code,
                user_name: user,
            };
            let html = renderer
                .render(&template, &data)
                .with_context(|| format!("rendering {template}"))?;
            println!("{html}");
            Ok(())
        }
    }
}

async fn serve<M: Mailer>(config: WorkerConfig, mailer: M, stdin: bool) -> Result<()> {
    tracing::info!(templates = %config.template_dir, "loading templates on demand");
    let worker = Worker::new(FileRenderer::new(&config.template_dir), mailer)
        .log_payloads(config.log_payloads);

    let mut source: Box<dyn MessageSource> = if stdin {
        Box::new(LineSource::stdin())
    } else {
        let nats = NatsSource::connect(&config)
            .await
            .context("connecting to message source")?;
        Box::new(nats)
    };

    worker
        .run_until(source.as_mut(), shutdown_signal())
        .await
        .context("message source failed")?;

    Ok(())
}
