use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::portal_fetch;
use crate::state::{Delta, ProviderCommand};

/// Spawn the provider thread. It owns all portal I/O: it loads today's
/// card once at startup, then serves commands until the UI side hangs up.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        refresh_today(&tx);
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchToday => refresh_today(&tx),
                ProviderCommand::Search { term } => run_search(&term, &tx),
            }
        }
    });
}

fn refresh_today(tx: &Sender<Delta>) {
    match portal_fetch::fetch_today() {
        Ok(matchups) => {
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Today card loaded ({} matchups)",
                matchups.len()
            )));
            let _ = tx.send(Delta::SetToday(matchups));
        }
        Err(err) => {
            // Prior today state stays as it was.
            let _ = tx.send(Delta::Log(format!("[WARN] Today fetch error: {err}")));
            let _ = tx.send(Delta::Notice(format!(
                "Could not load today's matchups: {err:#}"
            )));
        }
    }
}

fn run_search(term: &str, tx: &Sender<Delta>) {
    match portal_fetch::search_portal(term) {
        Ok(results) => {
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Consult returned {} fighters / {} matchups",
                results.fighters.len(),
                results.matchups.len()
            )));
            let _ = tx.send(Delta::SetSearchResults(results));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Consult error: {err}")));
            let _ = tx.send(Delta::Notice(format!(
                "Could not query the portal: {err:#}"
            )));
        }
    }
}
