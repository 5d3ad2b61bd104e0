use reqwest::Url;

use crate::domain::BouquetId;

const WHATSAPP_ENDPOINT: &str = "https://wa.me/";

/// Links handed to the user once a bouquet has been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub view_url: String,
    pub message: String,
    pub whatsapp_url: String,
}

impl ShareLink {
    pub fn new(base_url: &str, id: BouquetId) -> Self {
        let view_url = view_url(base_url, id);
        let message = share_message(&view_url);
        let whatsapp_url = Url::parse_with_params(WHATSAPP_ENDPOINT, [("text", message.as_str())])
            .map(String::from)
            .unwrap_or_else(|_| WHATSAPP_ENDPOINT.to_string());
        Self {
            view_url,
            message,
            whatsapp_url,
        }
    }
}

pub fn view_url(base_url: &str, id: BouquetId) -> String {
    format!("{}/bouquet/{}", base_url.trim_end_matches('/'), id)
}

pub fn share_message(view_url: &str) -> String {
    format!(
        "🌸 I made a beautiful digital bouquet just for you! 💐\n\nClick here to see it: {view_url}\n\nMade with love on Bloomy 🌺"
    )
}
