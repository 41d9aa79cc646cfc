//! CLI entry point: parses listen/solver-default/log-level flags and starts
//! the HTTP server.

use std::net::SocketAddr;

use clap::Parser;

/// Last-mile delivery planning service.
#[derive(Debug, Parser)]
#[command(name = "lastmile-planner", version, about)]
struct Cli {
    /// Address to listen on.
    #[clap(long = "listen", short = 'l', default_value = "0.0.0.0:8080")]
    listen: SocketAddr,
    /// Default solver time limit in seconds, used when a request omits
    /// `solver_settings.time_limit_seconds`.
    #[clap(long, default_value_t = lastmile_planner::problem::DEFAULT_TIME_LIMIT_SECONDS)]
    default_time_limit_seconds: f64,
    /// Default solver worker count, used when a request omits
    /// `solver_settings.max_parallel_workers`.
    #[clap(long, default_value_t = lastmile_planner::problem::DEFAULT_WORKERS)]
    default_workers: u32,
    /// Log verbosity, forwarded to `env_logger`'s filter syntax (e.g.
    /// `info`, `debug`, `lastmile_planner=debug,warn`).
    #[clap(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", &args.log_level);
    }
    pretty_env_logger::init_timed();

    log::info!(
        "starting lastmile-planner: listen={}, default_time_limit_seconds={}, default_workers={}, log_level={}",
        args.listen,
        args.default_time_limit_seconds,
        args.default_workers,
        args.log_level,
    );

    let defaults = lastmile_planner::problem::PlannerDefaults {
        time_limit_seconds: args.default_time_limit_seconds,
        workers: args.default_workers,
    };
    let app = lastmile_planner::api::router(defaults);

    axum::Server::bind(&args.listen)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
