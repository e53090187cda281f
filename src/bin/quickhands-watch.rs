use clap::{Arg, Command};
use log::{error, info};
use std::future::Future;
use std::process;
use std::time::Duration;

use quickhands_sync::config::Environment;
use quickhands_sync::prelude::*;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let matches = Command::new("quickhands-watch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Poll QuickHands notifications and report the unread count")
        .arg(
            Arg::new("user")
                .short('u')
                .long("user")
                .value_name("USER_ID")
                .help("User whose notifications are polled")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("token")
                .short('t')
                .long("token")
                .value_name("TOKEN")
                .help("Bearer token (defaults to $QUICKHANDS_TOKEN)")
                .takes_value(true),
        )
        .arg(
            Arg::new("interval")
                .short('i')
                .long("interval")
                .value_name("SECONDS")
                .help("Polling period in seconds")
                .takes_value(true),
        )
        .get_matches();

    let environment = match Environment::from_env() {
        Ok(environment) => environment,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let token = matches
        .value_of("token")
        .map(str::to_string)
        .or_else(|| std::env::var("QUICKHANDS_TOKEN").ok());
    let token = match token {
        Some(token) => token,
        None => {
            error!("no bearer token given (use --token or QUICKHANDS_TOKEN)");
            process::exit(1);
        }
    };

    let mut options = environment.client_options();
    if let Some(interval) = matches.value_of("interval") {
        match interval.parse::<u64>() {
            Ok(secs) if secs > 0 => options = options.with_poll_interval(Duration::from_secs(secs)),
            _ => {
                error!("invalid interval: {}", interval);
                process::exit(1);
            }
        }
    }

    let quickhands = QuickHands::new_with_options(options);
    let user_id = matches.value_of("user").unwrap_or_default();
    quickhands.auth().set_user_id(Some(user_id));
    quickhands
        .auth()
        .set_token_source(TokenSource::ready(StaticToken::new(&token)));

    let scope = SyncScope::new();
    let sync = quickhands.notification_sync(&scope);
    let poller = sync.start_polling();

    report_until(&sync, Duration::from_secs(1), tokio::signal::ctrl_c()).await;
    info!("interrupted, closing scope");
    scope.close();

    poller.shutdown().await;
}

/// Print the unread count whenever it changes until `shutdown` completes.
///
/// Returns the number of lines printed.
async fn report_until<F: Future>(sync: &NotificationSync, every: Duration, shutdown: F) -> usize {
    tokio::pin!(shutdown);
    let mut report = tokio::time::interval(every);
    let mut last_unread = None;
    let mut printed = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = report.tick() => {
                let unread = sync.unread_count();
                if last_unread != Some(unread) {
                    println!(
                        "{} unread of {} notifications",
                        unread,
                        sync.notifications().len()
                    );
                    last_unread = Some(unread);
                    printed += 1;
                }
            }
        }
    }

    printed
}
