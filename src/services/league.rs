//! League-wide loading shared by every dashboard view.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::FetchError;
use crate::models::fpl::{LeagueStandings, ManagerPicks, StandingEntry};
use crate::services::fpl_api::FplApi;
use crate::services::players::PlayerDirectory;

/// Standings, player reference data and the current gameweek for one league
#[derive(Debug, Clone)]
pub struct LeagueContext {
    pub league_id: i32,
    pub gameweek: i32,
    pub standings: Arc<LeagueStandings>,
    pub directory: PlayerDirectory,
}

impl LeagueContext {
    pub async fn load(fpl: &dyn FplApi, league_id: i32) -> Result<Self, FetchError> {
        let (bootstrap, standings) =
            tokio::try_join!(fpl.bootstrap_static(), fpl.league_standings(league_id))?;

        let gameweek = bootstrap.current_gameweek();
        info!(
            league_id = league_id,
            gameweek = gameweek,
            managers = standings.standings.results.len(),
            "Loaded league context"
        );

        Ok(Self {
            league_id,
            gameweek,
            standings,
            directory: PlayerDirectory::from_bootstrap(&bootstrap),
        })
    }

    pub fn league_name(&self) -> &str {
        &self.standings.league.name
    }

    pub fn managers(&self) -> &[StandingEntry] {
        &self.standings.standings.results
    }

    /// Every manager's picks for the current gameweek
    pub async fn selections(&self, fpl: &dyn FplApi) -> Result<FanOut<ManagerPicks>, FetchError> {
        let gameweek = self.gameweek;
        fan_out(self.managers(), |manager| fpl.picks(manager.entry, gameweek)).await
    }
}

/// Per-manager results of a fan-out, in standings order
#[derive(Debug)]
pub struct FanOut<T> {
    pub results: Vec<(StandingEntry, T)>,
    /// Managers whose pipeline failed and were left out
    pub skipped: Vec<i32>,
}

/// Run `pipeline` for every manager concurrently.
///
/// A failing manager is logged and dropped so the rest of the league still
/// renders. Only when every manager fails is the last error returned, so a
/// total outage never looks like an empty league.
pub async fn fan_out<'a, T, F, Fut>(
    managers: &'a [StandingEntry],
    pipeline: F,
) -> Result<FanOut<T>, FetchError>
where
    F: Fn(&'a StandingEntry) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let futures: Vec<_> = managers
        .iter()
        .map(|manager| {
            let pending = pipeline(manager);
            async move { (manager, pending.await) }
        })
        .collect();

    let outcomes = futures_util::future::join_all(futures).await;

    let mut collected = FanOut {
        results: Vec::with_capacity(outcomes.len()),
        skipped: Vec::new(),
    };
    let mut last_error = None;

    for (manager, outcome) in outcomes {
        match outcome {
            Ok(value) => collected.results.push((manager.clone(), value)),
            Err(e) => {
                warn!(entry = manager.entry, error = %e, "Skipping manager");
                collected.skipped.push(manager.entry);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if collected.results.is_empty() => Err(e),
        _ => Ok(collected),
    }
}
