use std::{process, sync::Arc};

use cms_blocks::{
    application::{
        block_by_identifier::BlockByIdentifier,
        context::{RenderContext, TracingEvents},
        filter::DirectiveFilterProvider,
    },
    config::{self, BlockArgs, Command, Settings},
    domain::stores::StoreId,
    infra::{catalog::Catalog, error::InfraError, memory::FixedStoreResolver, telemetry},
};
use thiserror::Error;
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] config::LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Render(#[from] cms_blocks::application::error::RenderError),
    #[error("failed to encode identities: {0}")]
    Encode(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_error(&error);
        process::exit(1);
    }
}

fn report_error(error: &CliError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "cms-blocks failed");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "cms-blocks failed");
    });
}

async fn run() -> Result<(), CliError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    match cli_args.command {
        Command::Render(args) => {
            let block = build_block(&settings, &args).await?;
            println!("{}", block.render().await?);
        }
        Command::Identities(args) => {
            let block = build_block(&settings, &args.block).await?;
            let identities = block.identities().await;
            if args.json {
                println!("{}", serde_json::to_string(&identities)?);
            } else {
                for identity in identities {
                    println!("{identity}");
                }
            }
        }
    }

    Ok(())
}

async fn build_block(settings: &Settings, args: &BlockArgs) -> Result<BlockByIdentifier, CliError> {
    let catalog = Catalog::load(&args.catalog).await?;
    let store = catalog.store(args.store.map(StoreId::new))?;
    let lookup = catalog.into_repository()?;

    let context = RenderContext::new(
        Arc::new(TracingEvents),
        Arc::new(settings.output.clone()),
    );

    Ok(BlockByIdentifier::new(
        Arc::new(lookup),
        Arc::new(FixedStoreResolver::new(store)),
        Arc::new(DirectiveFilterProvider::from(&settings.template)),
        context,
        args.identifier.clone(),
    ))
}
