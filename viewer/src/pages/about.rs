use crate::errors::Result;
use crate::http::ApiClient;
use crate::model::StationImage;
use crate::render;
use crate::services::station_image::StationImageService;

/// About page: static station description plus the photo gallery fetched
/// from the backend.
pub async fn run(api: ApiClient) -> Result<()> {
    let service = StationImageService::new(api);
    let images = service.images().await;
    println!("{}", render_about(&images));
    Ok(())
}

fn render_about(images: &[StationImage]) -> String {
    let mut out = String::new();
    out.push_str(&render::page_shell("About"));
    out.push('\n');
    out.push_str(
        "  A solar-powered weather station on a LoRa radio link. The station\n\
         \x20 reports temperature, humidity, barometric pressure and gas\n\
         \x20 resistance; the receiver records signal quality (RSSI/SNR) and\n\
         \x20 timestamps every packet.\n\
         \n\
         \x20 Commands: latest (current reading, --watch to poll), trends\n\
         \x20 (charts over 24h/7d/30d), debug (read-only SQL console).\n",
    );

    if !images.is_empty() {
        out.push('\n');
        out.push_str("  Station gallery:\n");
        for image in images {
            match &image.caption {
                Some(caption) => out.push_str(&format!("   - {} ({})\n", image.src, caption)),
                None => out.push_str(&format!("   - {}\n", image.src)),
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_images_skips_gallery() {
        let out = render_about(&[]);
        assert!(out.contains("About"));
        assert!(!out.contains("Station gallery"));
    }

    #[test]
    fn test_render_with_images() {
        let images = vec![
            StationImage {
                src: "/img/station-1.jpg".to_string(),
                caption: Some("Mast view".to_string()),
            },
            StationImage {
                src: "/img/station-2.jpg".to_string(),
                caption: None,
            },
        ];

        let out = render_about(&images);
        assert!(out.contains("Station gallery"));
        assert!(out.contains("/img/station-1.jpg (Mast view)"));
        assert!(out.contains("/img/station-2.jpg"));
    }
}
