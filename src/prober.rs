use std::future::Future;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;

use crate::types::Verdict;

/// Connect timeout applied to every probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Decides whether a port is reachable.
pub trait Prober: Send + Sync {
    fn probe(&self, port: u16) -> impl Future<Output = Verdict> + Send;
}

/// Plain TCP connect prober.
///
/// - One connect attempt per call, bounded by `timeout`.
/// - A connect that succeeds is `Open` and the stream is dropped right away.
/// - Refused, unreachable, unresolvable and timed out are all `Closed`.
#[derive(Debug, Clone)]
pub struct TcpProber {
    host: String,
    timeout: Duration,
}

impl TcpProber {
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            timeout,
        }
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new("localhost", PROBE_TIMEOUT)
    }
}

impl Prober for TcpProber {
    async fn probe(&self, port: u16) -> Verdict {
        let connect = TcpStream::connect((self.host.as_str(), port));
        match time::timeout(self.timeout, connect).await {
            Ok(Ok(_stream)) => Verdict::Open,
            Ok(Err(e)) => {
                tracing::trace!(port, error = %e, "connect failed");
                Verdict::Closed
            }
            Err(_) => {
                tracing::trace!(port, "connect timed out");
                Verdict::Closed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn listener_is_open() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let prober = TcpProber::new("127.0.0.1", PROBE_TIMEOUT);
        assert_eq!(prober.probe(port).await, Verdict::Open);
    }

    #[tokio::test]
    async fn nothing_listening_is_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let prober = TcpProber::new("127.0.0.1", PROBE_TIMEOUT);
        let start = std::time::Instant::now();
        assert_eq!(prober.probe(port).await, Verdict::Closed);
        assert!(start.elapsed() <= PROBE_TIMEOUT + Duration::from_millis(500));
    }

    #[tokio::test]
    async fn unresolvable_host_is_closed() {
        let prober = TcpProber::new("host.invalid", Duration::from_millis(500));
        assert_eq!(prober.probe(80).await, Verdict::Closed);
    }
}
