//! Per-user navigation state.
//!
//! Route lookups are asynchronous and may overlap. Each lookup gets a
//! [`Ticket`] and only the result of the most recent one is applied, older
//! results are dropped when they arrive.

use std::{
    error::Error,
    fmt,
    mem,
    sync::atomic::{AtomicU64, Ordering},
};

use model::{
    route::{RouteQuery, RouteResult},
    tour::Tour,
    waypoint::{Waypoint, WaypointSet, WaypointTable},
};

use crate::{
    display::{MapViewState, RouteSummary},
    tour::nearest_neighbor_tour,
    InvalidInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    UnknownWaypoint(String),
    NoStartSelected,
    NoDestinationSelected,
    SameStartAndDestination,
}

impl Error for SessionError {}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SessionError::UnknownWaypoint(name) => write!(f, "Unknown waypoint '{}'.", name),
            SessionError::NoStartSelected => write!(f, "Please select a start location."),
            SessionError::NoDestinationSelected => write!(f, "Please select a destination."),
            SessionError::SameStartAndDestination => {
                write!(f, "Start and destination cannot be the same.")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub ticket: Ticket,
    pub query: RouteQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Applied(RouteSummary),
    /// A newer lookup was started after this one.
    Superseded,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct Session {
    view: MapViewState,
    start: Option<Waypoint>,
    destination: Option<Waypoint>,
    summary: Option<RouteSummary>,
    sequencer: RequestSequencer,
    in_flight: Option<(Ticket, Waypoint, Waypoint)>,
}

impl Session {
    /// A fresh session showing every waypoint of the table.
    pub fn new(table: &WaypointTable) -> Self {
        Self {
            view: MapViewState::new().show_waypoints(table.iter()),
            ..Default::default()
        }
    }

    pub fn view(&self) -> &MapViewState {
        &self.view
    }

    pub fn summary(&self) -> Option<RouteSummary> {
        self.summary
    }

    pub fn start(&self) -> Option<&Waypoint> {
        self.start.as_ref()
    }

    pub fn destination(&self) -> Option<&Waypoint> {
        self.destination.as_ref()
    }

    pub fn select_start(&mut self, table: &WaypointTable, name: &str) -> Result<(), SessionError> {
        self.start = Some(lookup(table, name)?);
        Ok(())
    }

    pub fn select_destination(
        &mut self,
        table: &WaypointTable,
        name: &str,
    ) -> Result<(), SessionError> {
        self.destination = Some(lookup(table, name)?);
        Ok(())
    }

    /// Starts a route lookup for the current selection. Any lookup still in
    /// flight is superseded by this one.
    pub fn begin_route(&mut self) -> Result<RouteRequest, SessionError> {
        let start = self.start.clone().ok_or(SessionError::NoStartSelected)?;
        let destination = self
            .destination
            .clone()
            .ok_or(SessionError::NoDestinationSelected)?;
        if start.name() == destination.name() {
            return Err(SessionError::SameStartAndDestination);
        }

        let ticket = self.sequencer.next();
        let query = RouteQuery {
            start: start.position(),
            end: destination.position(),
        };
        self.in_flight = Some((ticket, start, destination));
        Ok(RouteRequest { ticket, query })
    }

    /// Applies the result of a lookup if it is the most recent one.
    pub fn complete_route<E: fmt::Display>(
        &mut self,
        ticket: Ticket,
        result: Result<RouteResult, E>,
    ) -> RouteOutcome {
        if !self.sequencer.is_latest(ticket) {
            log::debug!("dropping superseded route result {:?}", ticket);
            return RouteOutcome::Superseded;
        }
        let Some((_, start, destination)) = self.in_flight.take() else {
            return RouteOutcome::Superseded;
        };

        match result {
            Ok(route) => {
                let summary = RouteSummary::for_route(&route);
                self.view = mem::take(&mut self.view).show_route(&start, &destination, &route);
                self.summary = Some(summary);
                RouteOutcome::Applied(summary)
            }
            Err(why) => {
                log::warn!("route lookup failed: {}", why);
                self.view = mem::take(&mut self.view).clear_path();
                self.summary = None;
                RouteOutcome::Failed(why.to_string())
            }
        }
    }

    /// Rebuilds the tour from scratch and replaces whatever was drawn. Also
    /// supersedes any route lookup still in flight.
    pub fn recalculate_tour(
        &mut self,
        set: &WaypointSet<'_>,
        start: &str,
    ) -> Result<Tour, InvalidInput> {
        let tour = nearest_neighbor_tour(set, start)?;
        self.sequencer.next();
        self.in_flight = None;
        self.view = mem::take(&mut self.view).show_tour(&tour);
        self.summary = Some(RouteSummary::for_tour(&tour));
        Ok(tour)
    }
}

fn lookup(table: &WaypointTable, name: &str) -> Result<Waypoint, SessionError> {
    table
        .get(name)
        .cloned()
        .ok_or_else(|| SessionError::UnknownWaypoint(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use model::ExampleData;

    use super::*;
    use crate::display::MarkerKind;

    fn selected_session(table: &WaypointTable) -> Session {
        let mut session = Session::new(table);
        session.select_start(table, "Library").unwrap();
        session.select_destination(table, "Pond").unwrap();
        session
    }

    #[test]
    fn tickets_increase() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.next();
        let second = sequencer.next();
        assert!(second > first);
        assert!(!sequencer.is_latest(first));
        assert!(sequencer.is_latest(second));
    }

    #[test]
    fn new_session_shows_all_waypoints() {
        let table = WaypointTable::campus();
        let session = Session::new(&table);
        assert_eq!(session.view().markers.len(), table.len());
        assert!(session.summary().is_none());
    }

    #[test]
    fn selection_is_validated() {
        let table = WaypointTable::campus();
        let mut session = Session::new(&table);
        assert_eq!(
            session.select_start(&table, "Atlantis"),
            Err(SessionError::UnknownWaypoint("Atlantis".to_owned()))
        );
        assert_eq!(session.begin_route(), Err(SessionError::NoStartSelected));

        session.select_start(&table, "Pond").unwrap();
        assert_eq!(session.begin_route(), Err(SessionError::NoDestinationSelected));

        session.select_destination(&table, "Pond").unwrap();
        assert_eq!(session.begin_route(), Err(SessionError::SameStartAndDestination));
    }

    #[test]
    fn latest_result_wins() {
        let table = WaypointTable::campus();
        let mut session = selected_session(&table);

        let first = session.begin_route().unwrap();
        let second = session.begin_route().unwrap();
        assert_eq!(first.query, second.query);

        let route = RouteResult::example_data();
        assert_eq!(
            session.complete_route::<String>(first.ticket, Ok(route.clone())),
            RouteOutcome::Superseded
        );
        assert!(session.summary().is_none());

        let outcome = session.complete_route::<String>(second.ticket, Ok(route.clone()));
        assert_eq!(outcome, RouteOutcome::Applied(RouteSummary::for_route(&route)));
        assert_eq!(session.view().path, route.geometry);
        assert_eq!(session.view().markers[0].kind, MarkerKind::Start);
        assert_eq!(session.view().markers[0].name, "Library");
        assert_eq!(session.view().markers[1].name, "Pond");
    }

    #[test]
    fn failed_lookup_clears_the_path() {
        let table = WaypointTable::campus();
        let mut session = selected_session(&table);
        let request = session.begin_route().unwrap();
        let outcome = session.complete_route(request.ticket, Err("service unavailable"));
        assert_eq!(outcome, RouteOutcome::Failed("service unavailable".to_owned()));
        assert!(session.view().path.is_empty());
        assert!(session.summary().is_none());
    }

    #[test]
    fn tour_supersedes_pending_route() {
        let table = WaypointTable::campus();
        let set = table.campus_set();
        let mut session = selected_session(&table);
        let request = session.begin_route().unwrap();

        let tour = session.recalculate_tour(&set, "Library").unwrap();
        assert_eq!(session.view().path.len(), set.len() + 1);
        assert_eq!(session.summary(), Some(RouteSummary::for_tour(&tour)));

        let outcome =
            session.complete_route::<String>(request.ticket, Ok(RouteResult::example_data()));
        assert_eq!(outcome, RouteOutcome::Superseded);
        assert_eq!(session.view().path.len(), set.len() + 1);
    }

    #[test]
    fn invalid_tour_keeps_the_view() {
        let table = WaypointTable::campus();
        let set = table.campus_set();
        let mut session = Session::new(&table);
        let before = session.view().clone();
        assert_eq!(
            session.recalculate_tour(&set, "Mumbai"),
            Err(InvalidInput::UnknownStart("Mumbai".to_owned()))
        );
        assert_eq!(session.view(), &before);
    }
}
