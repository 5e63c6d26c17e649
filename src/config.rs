use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Application-level constants
pub const APP_NAME: &str = "Image Denoiser";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest request body accepted by the upload endpoint. Requests beyond
/// this are refused before any bytes are decoded.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Filter applied when the form omits the `method` field.
pub const DEFAULT_METHOD: &str = "gaussian";

/// Strength applied when the form omits the `strength` field.
pub const DEFAULT_STRENGTH: u32 = 5;

/// Port used when `PORT` is unset or unparseable.
pub const DEFAULT_PORT: u16 = 8080;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info"
}

/// Bind address for the HTTP server: all interfaces, port taken from the
/// `PORT` environment variable (deployment platforms inject it).
pub fn bind_addr() -> SocketAddr {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_strength_is_odd() {
        // The default must never trip the odd-kernel check of the
        // default method.
        assert_eq!(DEFAULT_STRENGTH % 2, 1);
    }

    #[test]
    fn bind_addr_listens_on_all_interfaces() {
        assert!(bind_addr().ip().is_unspecified());
    }

    #[test]
    fn upload_cap_fits_photo_uploads() {
        assert!(MAX_UPLOAD_BYTES >= 10 * 1024 * 1024);
    }
}
