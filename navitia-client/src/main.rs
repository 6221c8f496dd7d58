use std::process::ExitCode;

use futures::future::try_join;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use navitia_client::domain::Id;
use navitia_client::navitia::{ConnectionsRequest, ConnectionsResults, NavitiaConfig, Session};

const USAGE: &str = "usage: navitia-client <region> <stop_area_id> [count]";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (Some(region), Some(stop_area)) = (args.first(), args.get(1)) else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };
    let count = match args.get(2).map(|s| s.parse::<u32>()) {
        None => 10,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("invalid count: {e}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    let (region, stop_area) = match (Id::new(region.as_str()), Id::new(stop_area.as_str())) {
        (Ok(r), Ok(s)) => (r, s),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    // Get credentials from environment
    let api_key = std::env::var("NAVITIA_API_KEY").unwrap_or_else(|_| {
        tracing::warn!("NAVITIA_API_KEY not set, API calls will fail");
        String::new()
    });
    let mut config = NavitiaConfig::new(api_key);
    if let Ok(base_url) = std::env::var("NAVITIA_BASE_URL") {
        config = config.with_base_url(base_url);
    }

    let session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("failed to create Navitia session: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Ctrl-C cancels whatever has not been decoded yet
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let req = ConnectionsRequest::new().count(count);
    let scope = session.scope(region);

    let both = try_join(
        scope.departures_stop_area(&cancel, &req, &stop_area),
        scope.arrivals_stop_area(&cancel, &req, &stop_area),
    )
    .await;

    match both {
        Ok((departures, arrivals)) => {
            print_board("Departures", &departures);
            println!();
            print_board("Arrivals", &arrivals);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("request failed ({:?} stage): {e}", e.stage());
            ExitCode::FAILURE
        }
    }
}

fn print_board(title: &str, results: &ConnectionsResults) {
    println!("{title} ({}):", results.len());
    for c in &results.connections {
        let at = c
            .stop_date_time
            .as_ref()
            .and_then(|sdt| sdt.departure_date_time.or(sdt.arrival_date_time))
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string());
        println!(
            "  {at}  {:<8} {:<30} {}",
            c.display.code, c.display.direction, c.stop_point.name
        );
    }
    if let Some(rt) = results.lifecycle.round_trip() {
        println!("  (round trip {} ms)", rt.as_millis());
    }
}
