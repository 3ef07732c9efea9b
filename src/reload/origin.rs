//! Origin check for WebSocket handshakes.
//!
//! Only the preview page served over HTTP may drive the server. Other pages
//! open in the same browser could otherwise connect and send `quit` or
//! `open`.

use std::net::{IpAddr, SocketAddr};

use url::{Host, Url};

/// Origins allowed to open a WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedOrigin {
    page: SocketAddr,
}

impl AllowedOrigin {
    /// Allow the page served at `page` (`http://{page}`).
    pub const fn for_page(page: SocketAddr) -> Self {
        Self { page }
    }

    /// Check the handshake `Origin` header. A missing header is rejected.
    ///
    /// The scheme must be `http` and the port that of the page. The host must
    /// be the bound address, or any loopback name when bound to loopback.
    /// When bound to all interfaces any host is accepted.
    pub fn allows(&self, origin: Option<&str>) -> bool {
        let Some(url) = origin.and_then(|o| Url::parse(o).ok()) else {
            return false;
        };
        if url.scheme() != "http" || url.port_or_known_default() != Some(self.page.port()) {
            return false;
        }

        let bound = self.page.ip();
        if bound.is_unspecified() {
            return true;
        }
        match url.host() {
            Some(Host::Ipv4(ip)) => self.host_ip_allowed(IpAddr::V4(ip)),
            Some(Host::Ipv6(ip)) => self.host_ip_allowed(IpAddr::V6(ip)),
            Some(Host::Domain(name)) => bound.is_loopback() && name.eq_ignore_ascii_case("localhost"),
            None => false,
        }
    }

    fn host_ip_allowed(&self, ip: IpAddr) -> bool {
        let bound = self.page.ip();
        ip == bound || (ip.is_loopback() && bound.is_loopback())
    }
}
