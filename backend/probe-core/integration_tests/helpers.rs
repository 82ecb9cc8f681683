use probe_core::client::ProbeClient;
use probe_core::session::{ProbeSession, SessionSettings};
use probe_core::suffix::SuffixGenerator;
use probe_core::target::ProbeTarget;

use std::net::TcpListener;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

pub const PROBE_PATH: &str = "/s/";
pub const PROBE_PATH_PATTERN: &str = r"^/s/[a-z0-9]{12}$";

/// Settings that retry quickly so failure tests finish fast.
pub fn fast_settings(request_count: u64) -> SessionSettings {
    SessionSettings {
        retry_initial_interval: Duration::from_millis(1),
        retry_max_interval: Duration::from_millis(5),
        ..SessionSettings::new(request_count)
    }
}

pub fn session_for(
    base_url: &str,
    client: ProbeClient,
    settings: SessionSettings,
) -> ProbeSession<StdRng> {
    let target = ProbeTarget::parse(base_url).unwrap();
    let generator = SuffixGenerator::with_rng(12, StdRng::seed_from_u64(1234));
    ProbeSession::new(client, target, generator, settings)
}

/// A localhost URL on a port with nothing listening.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/s/")
}

pub fn output_lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
