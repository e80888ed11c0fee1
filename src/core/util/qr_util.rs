use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::render::svg;
use qrcode::QrCode;

pub struct QrUtil;

impl QrUtil {
    pub const DATA_URL_PREFIX: &'static str = "data:image/svg+xml;base64,";

    /// Gate-scanner URL carried by a visit pass.
    pub fn verify_url(public_base_url: &str, token: &str) -> String {
        format!(
            "{}/api/v1/visit-requests/verify/{}",
            public_base_url.trim_end_matches('/'),
            urlencoding::encode(token)
        )
    }

    pub fn render_svg(payload: &str) -> Result<String> {
        let code = QrCode::new(payload.as_bytes())
            .map_err(|e| anyhow!("Failed to encode QR payload: {e}"))?;

        Ok(code
            .render::<svg::Color<'_>>()
            .min_dimensions(240, 240)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build())
    }

    /// Render `payload` as an embeddable `data:` URL.
    pub fn render_data_url(payload: &str) -> Result<String> {
        let svg = Self::render_svg(payload)?;
        Ok(format!("{}{}", Self::DATA_URL_PREFIX, STANDARD.encode(svg)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_url_trims_trailing_slash() {
        assert_eq!(
            QrUtil::verify_url("https://estate.example.com/", "abc"),
            "https://estate.example.com/api/v1/visit-requests/verify/abc"
        );
    }

    #[test]
    fn data_url_wraps_svg() {
        let url = QrUtil::render_data_url("https://estate.example.com/x").unwrap();
        assert!(url.starts_with(QrUtil::DATA_URL_PREFIX));

        let encoded = &url[QrUtil::DATA_URL_PREFIX.len()..];
        let svg = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
    }
}
