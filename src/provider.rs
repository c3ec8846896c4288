use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Result;

use crate::api::{Bootstrap, EntrySummary, Fixture, FplApi, Pick};
use crate::config::{AppConfig, DataSource};
use crate::demo_feed;
use crate::grid_export;
use crate::session::{Session, Squad};
use crate::state::{Delta, ProviderCommand};

pub trait Feed {
    fn bootstrap(&self) -> Result<Bootstrap>;
    fn fixtures(&self) -> Result<Vec<Fixture>>;
    fn entry(&self, entry_id: u32) -> Result<EntrySummary>;
    fn picks(&self, entry_id: u32, gameweek: u32) -> Result<Vec<Pick>>;
}

impl Feed for FplApi {
    fn bootstrap(&self) -> Result<Bootstrap> {
        self.fetch_bootstrap()
    }

    fn fixtures(&self) -> Result<Vec<Fixture>> {
        self.fetch_fixtures()
    }

    fn entry(&self, entry_id: u32) -> Result<EntrySummary> {
        self.fetch_entry(entry_id)
    }

    fn picks(&self, entry_id: u32, gameweek: u32) -> Result<Vec<Pick>> {
        self.fetch_picks(entry_id, gameweek)
    }
}

pub struct DemoFeed {
    bootstrap: Bootstrap,
}

impl DemoFeed {
    pub fn new(seed: u64) -> Self {
        Self {
            bootstrap: demo_feed::demo_bootstrap(seed),
        }
    }
}

impl Feed for DemoFeed {
    fn bootstrap(&self) -> Result<Bootstrap> {
        Ok(self.bootstrap.clone())
    }

    fn fixtures(&self) -> Result<Vec<Fixture>> {
        Ok(demo_feed::demo_fixtures(&self.bootstrap.teams))
    }

    fn entry(&self, entry_id: u32) -> Result<EntrySummary> {
        Ok(demo_feed::demo_entry(entry_id))
    }

    fn picks(&self, _entry_id: u32, _gameweek: u32) -> Result<Vec<Pick>> {
        Ok(demo_feed::demo_picks(&self.bootstrap))
    }
}

pub fn feed_from_config(cfg: &AppConfig) -> Box<dyn Feed + Send> {
    match cfg.source {
        DataSource::Live => Box::new(FplApi::new(cfg.api_base.clone(), cfg.http_timeout_secs)),
        DataSource::Demo => Box::new(DemoFeed::new(demo_feed::DEMO_SEED)),
    }
}

pub fn spawn_provider(
    feed: Box<dyn Feed + Send>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) {
    thread::spawn(move || {
        let mut session: Option<Session> = None;
        // Commands are handled strictly one at a time; the loop ends when the UI drops its sender.
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Refresh { entry_id } => {
                    match refresh_session(&*feed, entry_id) {
                        Ok(fresh) => {
                            session = Some(fresh.clone());
                            let _ = tx.send(Delta::SetSession(Box::new(fresh)));
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::RefreshFailed(format!("{err:#}")));
                            continue;
                        }
                    }
                    if let (Some(entry_id), Some(current)) = (entry_id, session.as_ref()) {
                        send_squad(&*feed, current, entry_id, &tx);
                    }
                }
                ProviderCommand::LoadSquad { entry_id } => match session.as_ref() {
                    Some(current) => send_squad(&*feed, current, entry_id, &tx),
                    None => {
                        let _ = tx.send(Delta::Log(
                            "[WARN] Squad requested before league data loaded".to_string(),
                        ));
                    }
                },
                ProviderCommand::Export { path, grid, squad } => {
                    let target = PathBuf::from(&path);
                    match grid_export::export_views(&target, &grid, squad.as_ref()) {
                        Ok(report) => {
                            let _ = tx.send(Delta::ExportFinished {
                                path,
                                rows: report.total_rows(),
                            });
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::ExportFailed(format!("{err:#}")));
                        }
                    }
                }
            }
        }
    });
}

pub fn refresh_session(feed: &dyn Feed, entry_id: Option<u32>) -> Result<Session> {
    let bootstrap = feed.bootstrap()?;
    let fixtures = feed.fixtures()?;
    Ok(Session::from_payloads(bootstrap, fixtures, entry_id))
}

pub fn load_squad(feed: &dyn Feed, session: &Session, entry_id: u32) -> Result<Squad> {
    let entry = feed.entry(entry_id)?;
    let gameweek = session.picks_gameweek(Some(&entry));
    let picks = feed.picks(entry_id, gameweek)?;
    let joined = session.join_picks(&picks);
    Ok(Squad {
        entry,
        gameweek,
        unresolved_picks: picks.len().saturating_sub(joined.len()),
        picks: joined,
    })
}

fn send_squad(feed: &dyn Feed, session: &Session, entry_id: u32, tx: &Sender<Delta>) {
    match load_squad(feed, session, entry_id) {
        Ok(squad) => {
            let dropped = squad.unresolved_picks;
            if dropped > 0 {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] {dropped} pick(s) referenced unknown players"
                )));
            }
            let _ = tx.send(Delta::SetSquad(Box::new(squad)));
        }
        Err(err) => {
            let _ = tx.send(Delta::SquadFailed(format!("{err:#}")));
        }
    }
}
