//! Asset reachability probe.
//!
//! A HEAD request decides whether a 3D asset can be opened at all, before the
//! gallery commits to showing the modal. Any non-2xx status and any transport
//! error both come back as `false`.

use std::time::Duration;

use url::Url;

pub trait AssetProbe: Send + Sync {
    fn check_reachable(&self, asset: &str) -> bool;
}

/// HEAD-based probe. Relative references are joined onto `base`.
pub struct HttpProbe {
    base: Url,
    client: Option<reqwest::blocking::Client>,
}

impl HttpProbe {
    pub fn new(origin: &str, timeout: Duration) -> Result<Self, url::ParseError> {
        let base = Url::parse(origin)?;
        let client = match reqwest::blocking::Client::builder()
            .user_agent(concat!("ar-gallery/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
        {
            Ok(client) => Some(client),
            // Every probe then reports unreachable.
            Err(e) => {
                log::warn!("Probe client unavailable: {}", e);
                None
            }
        };
        Ok(Self { base, client })
    }

    fn resolve(&self, asset: &str) -> Option<Url> {
        self.base.join(asset).ok()
    }
}

impl AssetProbe for HttpProbe {
    fn check_reachable(&self, asset: &str) -> bool {
        let (Some(client), Some(url)) = (&self.client, self.resolve(asset)) else {
            log::debug!("Probe skipped, unresolvable asset: {}", asset);
            return false;
        };

        match client.head(url.as_str()).send() {
            Ok(resp) if resp.status().is_success() => {
                log::debug!("Probe OK {}: {}", resp.status(), url);
                true
            }
            Ok(resp) => {
                log::debug!("Probe failed {}: {}", resp.status(), url);
                false
            }
            Err(e) => {
                log::debug!("Probe error {}: {}", url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    /// Serve one canned response per connection, in order, and return the
    /// request lines received.
    fn scripted_server(responses: Vec<String>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 2048];
                let n = stream.read(&mut buf).unwrap();
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                stream.write_all(response.as_bytes()).unwrap();
                requests.push(request.lines().next().unwrap_or_default().to_string());
            }
            requests
        });
        (origin, handle)
    }

    fn reply(status_line: &str, extra_headers: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\n{}Content-Length: 0\r\nConnection: close\r\n\r\n",
            status_line, extra_headers
        )
    }

    /// Serve one canned response and return the request line it received.
    fn one_shot_server(status_line: &'static str) -> (String, thread::JoinHandle<String>) {
        let (origin, server) = scripted_server(vec![reply(status_line, "")]);
        let handle = thread::spawn(move || server.join().unwrap().remove(0));
        (origin, handle)
    }

    #[test]
    fn success_status_is_reachable() {
        let (origin, server) = one_shot_server("200 OK");
        let probe = HttpProbe::new(&origin, Duration::from_secs(5)).unwrap();
        assert!(probe.check_reachable("/models/pizza.glb"));
        assert_eq!(server.join().unwrap(), "HEAD /models/pizza.glb HTTP/1.1");
    }

    #[test]
    fn not_found_is_unreachable() {
        let (origin, server) = one_shot_server("404 Not Found");
        let probe = HttpProbe::new(&origin, Duration::from_secs(5)).unwrap();
        assert!(!probe.check_reachable("models/missing.glb"));
        server.join().unwrap();
    }

    #[test]
    fn connection_refused_is_unreachable() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let probe = HttpProbe::new(&format!("http://127.0.0.1:{}", port), Duration::from_secs(2))
            .unwrap();
        assert!(!probe.check_reachable("/models/pizza.glb"));
    }

    #[test]
    fn stalled_server_times_out_as_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let (release, held) = mpsc::channel::<()>();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            // Hold the connection open without answering.
            let _ = held.recv();
        });

        let probe = HttpProbe::new(&origin, Duration::from_millis(200)).unwrap();
        let started = Instant::now();
        assert!(!probe.check_reachable("/models/pizza.glb"));
        assert!(started.elapsed() < Duration::from_secs(5));

        release.send(()).unwrap();
        server.join().unwrap();
    }

    #[test]
    fn redirect_to_existing_asset_is_reachable() {
        let (origin, server) = scripted_server(vec![
            reply("302 Found", "Location: /final.glb\r\n"),
            reply("200 OK", ""),
        ]);
        let probe = HttpProbe::new(&origin, Duration::from_secs(5)).unwrap();
        assert!(probe.check_reachable("/models/moved.glb"));

        let requests = server.join().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains(" /models/moved.glb "));
        assert!(requests[1].contains(" /final.glb "));
    }

    #[test]
    fn redirect_to_missing_asset_is_unreachable() {
        let (origin, server) = scripted_server(vec![
            reply("301 Moved Permanently", "Location: /gone.glb\r\n"),
            reply("404 Not Found", ""),
        ]);
        let probe = HttpProbe::new(&origin, Duration::from_secs(5)).unwrap();
        assert!(!probe.check_reachable("/models/old.glb"));
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn rejects_non_url_origin() {
        assert!(HttpProbe::new("not a url", Duration::from_secs(1)).is_err());
    }
}
