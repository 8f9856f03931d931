use url::Url;

/// URL of a QR image encoding `payload`, in the query format of the
/// qrserver.com `create-qr-code` endpoint: `?size=<n>x<n>&data=<payload>`.
pub fn qr_code_url(base: &Url, payload: &str, size: u32) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("size", &format!("{size}x{size}"))
        .append_pair("data", payload);
    url
}
