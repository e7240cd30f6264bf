//! Network reachability probe backing the offline banner.
//!
//! A background thread periodically attempts a short TCP connect to
//! well-known public resolvers and reports the result over a channel. The
//! probe shares no state with the rest of the app; the banner is driven
//! entirely by drained messages, and the store never sees any of this.

use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

use bevy::prelude::*;
use crossbeam_channel::{unbounded, Receiver};

const PROBE_ADDRS: &[&str] = &["1.1.1.1:53", "8.8.8.8:53"];
const PROBE_PERIOD: Duration = Duration::from_secs(5);
const PROBE_TIMEOUT: Duration = Duration::from_millis(1500);

/// Latest known connectivity, as reported by the probe thread.
#[derive(Resource, Default)]
pub struct ConnectivityStatus {
    pub offline: bool,
}

/// Receiving end of the probe channel.
#[derive(Resource)]
pub struct ConnectivityReceiver(Receiver<bool>);

#[cfg(test)]
impl ConnectivityReceiver {
    pub fn for_tests(rx: Receiver<bool>) -> Self {
        Self(rx)
    }
}

/// Starts the background probe thread and returns the channel resource.
pub fn spawn_probe() -> ConnectivityReceiver {
    let (tx, rx) = unbounded();
    thread::spawn(move || loop {
        let online = probe();
        if tx.send(online).is_err() {
            return;
        }
        thread::sleep(PROBE_PERIOD);
    });
    ConnectivityReceiver(rx)
}

fn probe() -> bool {
    PROBE_ADDRS.iter().any(|addr| {
        addr.parse::<SocketAddr>()
            .map(|a| TcpStream::connect_timeout(&a, PROBE_TIMEOUT).is_ok())
            .unwrap_or(false)
    })
}

/// Drains probe reports into the status resource, keeping the latest.
pub fn poll_connectivity(
    receiver: Res<ConnectivityReceiver>,
    mut status: ResMut<ConnectivityStatus>,
) {
    for online in receiver.0.try_iter() {
        status.offline = !online;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_online() {
        assert!(!ConnectivityStatus::default().offline);
    }

    #[test]
    fn poll_keeps_latest_report() {
        let (tx, rx) = unbounded();
        let mut app = App::new();
        app.insert_resource(ConnectivityStatus::default());
        app.insert_resource(ConnectivityReceiver::for_tests(rx));
        app.add_systems(Update, poll_connectivity);

        tx.send(true).unwrap();
        tx.send(false).unwrap();
        app.update();
        assert!(app.world().resource::<ConnectivityStatus>().offline);

        tx.send(true).unwrap();
        app.update();
        assert!(!app.world().resource::<ConnectivityStatus>().offline);
    }
}
