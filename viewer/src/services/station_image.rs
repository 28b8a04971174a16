use crate::http::{self, ApiClient};
use crate::model::StationImage;
use tracing::{debug, error};

/// Fetches the station photo list shown on the About page.
#[derive(Debug, Clone)]
pub struct StationImageService {
    api: ApiClient,
}

impl StationImageService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// A failed fetch degrades to an empty gallery.
    pub async fn images(&self) -> Vec<StationImage> {
        debug!("requesting station images");

        match self.api.get(http::STATION_IMAGES).await {
            Ok(images) => images,
            Err(e) => {
                error!("station image request failed: {}", e);
                Vec::new()
            }
        }
    }
}
