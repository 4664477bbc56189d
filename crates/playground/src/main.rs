use std::{env, error::Error};

use directions::{
    client::{DirectionsClient, OrsCredentials},
    DirectionsService,
};
use model::{path::campus_paths, route::RouteResult, waypoint::WaypointTable};
use navigation::{
    display::{path_label, step_lines},
    paths::PathNetwork,
    replay::TourReplay,
    session::{RouteOutcome, Session},
};

/// Walks a session through the campus: the tour from the given start (first
/// campus location by default), the walkway path to its second stop and,
/// with `ORS_API_KEY` set, the walking route of that leg.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let table = WaypointTable::campus();
    let set = table.campus_set();
    let start = match env::args().nth(1) {
        Some(start) => start,
        None => set
            .first()
            .map(|waypoint| waypoint.name().to_owned())
            .ok_or("no campus locations")?,
    };

    let mut session = Session::new(&table);
    log::info!("showing {} markers.", session.view().markers.len());

    let tour = session.recalculate_tour(&set, &start)?;
    println!("{}", path_label(&tour));
    if let Some(summary) = session.summary() {
        println!("{}", summary);
    }
    for step in TourReplay::new(&tour) {
        println!(
            "{:>2}. {} -> {}: {:.3} km (total {:.3} km)",
            step.step, step.from, step.to, step.leg_km, step.cumulative_km
        );
    }

    let [from, to, ..] = tour.order() else {
        return Ok(());
    };
    session.select_start(&table, from.name())?;
    session.select_destination(&table, to.name())?;

    let network = PathNetwork::new(&table, campus_paths(&table))?;
    match network.shortest_path(from.name(), to.name()) {
        Ok(found) => println!(
            "\nwalkways: {} ({:.0} m)",
            found.names().join(" -> "),
            found.distance
        ),
        Err(why) => println!("\nwalkways: {}", why),
    }

    let Some(credentials) = OrsCredentials::from_env() else {
        return Ok(());
    };
    let client = DirectionsClient::new(&credentials)?;

    // the first lookup is overtaken by the second and never drawn
    let stale = session.begin_route()?;
    let request = session.begin_route()?;
    let route = client.walking_route(&request.query).await;
    if let Ok(route) = &route {
        log::debug!("{}", serde_json::to_string_pretty(route)?);
    }
    let steps = route.as_ref().map(step_lines).unwrap_or_default();

    match session.complete_route(request.ticket, route) {
        RouteOutcome::Applied(summary) => {
            println!("\n{} -> {}: {}", from.name(), to.name(), summary);
            for line in steps {
                println!("{}", line);
            }
        }
        RouteOutcome::Failed(why) => println!("\n{} -> {}: {}", from.name(), to.name(), why),
        RouteOutcome::Superseded => {}
    }
    let late = session.complete_route(stale.ticket, Err::<RouteResult, _>("timed out"));
    log::info!("late result: {:?}", late);
    log::info!(
        "session ends with {} markers and {} path points.",
        session.view().markers.len(),
        session.view().path.len()
    );

    Ok(())
}
