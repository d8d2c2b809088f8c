use std::process::ExitCode;

use clap::Parser;
use policy_amender::amend::AmendmentLoop;
use policy_amender::cli::{AmendPolicyArgs, Console};
use policy_amender::core::AmendResult;
use policy_amender::graph::SnapshotTopology;
use policy_amender::logging;
use policy_amender::session::SessionReport;

fn main() -> anyhow::Result<ExitCode> {
    let args = AmendPolicyArgs::parse();

    // Initialize logging system
    let _log_guard = logging::init_logging(args.verbose, args.log_file.as_deref())?;

    tracing::info!("=== Policy Amendment Starting ===");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(async {
        let console = Console::new();
        match run(&args).await {
            Ok(report) => {
                console.print_report(&report);
                tracing::info!("=== Policy Amendment Finished ===");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{}", e);
                console.print_error(&e.to_string());
                ExitCode::from(e.exit_code())
            }
        }
    });
    // An interrupted prompt leaves a blocking stdin read behind
    runtime.shutdown_background();

    Ok(code)
}

async fn run(args: &AmendPolicyArgs) -> AmendResult<SessionReport> {
    let config = args.to_config()?;
    let topology = SnapshotTopology::from_file(&args.graph);
    let mut session = AmendmentLoop::new(config, topology, Console::new())?;
    session.operator().print_banner(session.config());
    session
        .operator()
        .print_system(&format!("Watching graph snapshot {}", args.graph.display()));

    // Ctrl+C ends the session through the normal teardown
    let token = session.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing session");
            token.cancel();
        }
    });

    session.run().await
}
